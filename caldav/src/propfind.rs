// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Scheduling properties served on principal resources (RFC 6638).

use std::fmt;
use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::DavError;
use crate::resolver::DefaultCalendarResolver;
use crate::store::{CollectionStore, PrincipalDirectory};
use crate::types::{Href, Principal};
use crate::xml::{Namespace, ns};

/// Properties this crate can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropName {
    /// `C:schedule-default-calendar-URL`
    ScheduleDefaultCalendarUrl,
    /// `C:calendar-user-address-set`
    CalendarUserAddressSet,
}

impl PropName {
    /// Returns the XML element local name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ScheduleDefaultCalendarUrl => "schedule-default-calendar-URL",
            Self::CalendarUserAddressSet => "calendar-user-address-set",
        }
    }

    const fn namespace(self) -> Namespace {
        match self {
            Self::ScheduleDefaultCalendarUrl | Self::CalendarUserAddressSet => Namespace::CalDav,
        }
    }

    /// Parses a property name in Clark notation, e.g.
    /// `{urn:ietf:params:xml:ns:caldav}schedule-default-calendar-URL`.
    #[must_use]
    pub fn from_clark(clark: &str) -> Option<Self> {
        let rest = clark.strip_prefix('{')?;
        let (namespace, name) = rest.split_once('}')?;
        if namespace != ns::CALDAV {
            return None;
        }
        match name {
            "schedule-default-calendar-URL" => Some(Self::ScheduleDefaultCalendarUrl),
            "calendar-user-address-set" => Some(Self::CalendarUserAddressSet),
            _ => None,
        }
    }
}

/// Value of a resolved property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropValue {
    /// A single `DAV:href`.
    Href(Href),
    /// Zero or more `DAV:href` elements.
    HrefSet(Vec<Href>),
}

/// Node targeted by a property query.
#[derive(Debug, Clone)]
pub enum PropFindTarget {
    /// A principal resource.
    Principal(Principal),
    /// Any other resource.
    Resource(Href),
}

/// A property query on a single resource and the values resolved so far.
#[derive(Debug, Clone)]
pub struct PropFind {
    path: Href,
    requested: Vec<PropName>,
    found: Vec<(PropName, PropValue)>,
}

impl PropFind {
    /// Creates a query on `path` for the given properties.
    #[must_use]
    pub fn new(path: Href, requested: impl IntoIterator<Item = PropName>) -> Self {
        let mut names: Vec<PropName> = Vec::new();
        for name in requested {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self {
            path,
            requested: names,
            found: Vec::new(),
        }
    }

    /// Whether `name` was requested and has no value yet.
    #[must_use]
    pub fn is_pending(&self, name: PropName) -> bool {
        self.requested.contains(&name) && self.get(name).is_none()
    }

    /// Records a value for `name` if it is pending; otherwise it is ignored.
    pub fn handle(&mut self, name: PropName, value: PropValue) {
        if self.is_pending(name) {
            self.found.push((name, value));
        }
    }

    /// Returns the value recorded for `name`.
    #[must_use]
    pub fn get(&self, name: PropName) -> Option<&PropValue> {
        self.found.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Requested properties that have no value.
    pub fn unresolved(&self) -> impl Iterator<Item = PropName> + '_ {
        self.requested.iter().copied().filter(|&n| self.get(n).is_none())
    }

    /// Serializes the result as a `DAV:multistatus` document.
    ///
    /// Found properties go in a `200 OK` propstat and unresolved ones in a
    /// `404 Not Found` propstat; an empty propstat is left out.
    ///
    /// # Errors
    ///
    /// Returns an error if XML writing fails.
    pub fn to_multistatus_xml(&self) -> Result<String, DavError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        let mut multistatus = BytesStart::new("D:multistatus");
        multistatus.push_attribute(("xmlns:D", ns::DAV));
        multistatus.push_attribute(("xmlns:C", ns::CALDAV));
        writer.write_event(Event::Start(multistatus))?;
        writer.write_event(Event::Start(BytesStart::new("D:response")))?;
        write_text_element(&mut writer, "D:href", self.path.as_str())?;

        if !self.found.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("D:propstat")))?;
            writer.write_event(Event::Start(BytesStart::new("D:prop")))?;
            for (name, value) in &self.found {
                let qname = qualified(*name);
                writer.write_event(Event::Start(BytesStart::new(qname.as_str())))?;
                match value {
                    PropValue::Href(href) => write_text_element(&mut writer, "D:href", href)?,
                    PropValue::HrefSet(hrefs) => {
                        for href in hrefs {
                            write_text_element(&mut writer, "D:href", href)?;
                        }
                    }
                }
                writer.write_event(Event::End(BytesEnd::new(qname.as_str())))?;
            }
            writer.write_event(Event::End(BytesEnd::new("D:prop")))?;
            write_text_element(&mut writer, "D:status", "HTTP/1.1 200 OK")?;
            writer.write_event(Event::End(BytesEnd::new("D:propstat")))?;
        }

        let unresolved: Vec<PropName> = self.unresolved().collect();
        if !unresolved.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("D:propstat")))?;
            writer.write_event(Event::Start(BytesStart::new("D:prop")))?;
            for name in unresolved {
                writer.write_event(Event::Empty(BytesStart::new(qualified(name).as_str())))?;
            }
            writer.write_event(Event::End(BytesEnd::new("D:prop")))?;
            write_text_element(&mut writer, "D:status", "HTTP/1.1 404 Not Found")?;
            writer.write_event(Event::End(BytesEnd::new("D:propstat")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("D:response")))?;
        writer.write_event(Event::End(BytesEnd::new("D:multistatus")))?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| DavError::Xml(format!("UTF-8 error: {e}")))
    }
}

fn qualified(name: PropName) -> String {
    format!("{}:{}", name.namespace().prefix(), name.name())
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    tag: &str,
    text: &str,
) -> Result<(), DavError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Fills scheduling properties of principal resources.
#[derive(Clone, Copy)]
pub struct ScheduleProperties<'a> {
    directory: &'a dyn PrincipalDirectory,
    resolver: DefaultCalendarResolver<'a>,
}

impl fmt::Debug for ScheduleProperties<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleProperties")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl<'a> ScheduleProperties<'a> {
    /// Creates a handler over the given directory and collection store.
    #[must_use]
    pub fn new(directory: &'a dyn PrincipalDirectory, store: &'a dyn CollectionStore) -> Self {
        Self {
            directory,
            resolver: DefaultCalendarResolver::new(directory, store),
        }
    }

    /// Returns the calendar user addresses of `principal`; a principal the
    /// directory knows no addresses for has an empty set.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory lookup fails.
    pub async fn addresses_for_principal(
        &self,
        principal: &Principal,
    ) -> Result<Vec<String>, DavError> {
        Ok(self
            .directory
            .addresses_for_principal(principal)
            .await?
            .unwrap_or_default())
    }

    /// Resolves pending scheduling properties of `target` into `prop_find`.
    ///
    /// Non-principal targets are left untouched. A principal without a default
    /// calendar leaves `schedule-default-calendar-URL` unresolved.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the collection store fails.
    pub async fn prop_find(
        &self,
        prop_find: &mut PropFind,
        target: &PropFindTarget,
    ) -> Result<(), DavError> {
        let PropFindTarget::Principal(principal) = target else {
            return Ok(());
        };

        if prop_find.is_pending(PropName::ScheduleDefaultCalendarUrl) {
            if let Some(href) = self.resolver.resolve(principal).await? {
                prop_find.handle(PropName::ScheduleDefaultCalendarUrl, PropValue::Href(href));
            }
        }

        if prop_find.is_pending(PropName::CalendarUserAddressSet) {
            let addresses = self.addresses_for_principal(principal).await?;
            prop_find.handle(
                PropName::CalendarUserAddressSet,
                PropValue::HrefSet(addresses.into_iter().map(Href::new).collect()),
            );
        }

        Ok(())
    }
}
