// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Request builders for `CalDAV` operations.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::error::DavError;
use crate::xml::Namespace;

/// PROPFIND request builder.
#[derive(Debug)]
pub struct PropFindRequest {
    props: Vec<Prop>,
}

/// Properties to request in PROPFIND.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prop {
    /// Resource type.
    ResourceType,
    /// Sharing state (`DAV:share-access`).
    ShareAccess,
    /// Read-only flag (`oc:read-only`).
    ReadOnly,
    /// Supported calendar components.
    SupportedCalendarComponents,
    /// Calendar home set.
    CalendarHomeSet,
    /// Calendar user address set.
    CalendarUserAddressSet,
}

impl Prop {
    /// Properties requested when looking for a default calendar.
    pub const DEFAULT_CALENDAR_PROPS: [Self; 4] = [
        Self::ResourceType,
        Self::ShareAccess,
        Self::ReadOnly,
        Self::SupportedCalendarComponents,
    ];

    /// Returns the XML element local name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ResourceType => "resourcetype",
            Self::ShareAccess => "share-access",
            Self::ReadOnly => "read-only",
            Self::SupportedCalendarComponents => "supported-calendar-component-set",
            Self::CalendarHomeSet => "calendar-home-set",
            Self::CalendarUserAddressSet => "calendar-user-address-set",
        }
    }

    const fn namespace(self) -> Namespace {
        match self {
            Self::ResourceType | Self::ShareAccess => Namespace::Dav,
            Self::ReadOnly => Namespace::OwnCloud,
            Self::SupportedCalendarComponents
            | Self::CalendarHomeSet
            | Self::CalendarUserAddressSet => Namespace::CalDav,
        }
    }
}

/// Value of the `Depth` request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// The resource itself.
    Zero,
    /// The resource and its immediate children.
    One,
}

impl Depth {
    /// Returns the header value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
        }
    }
}

impl PropFindRequest {
    /// Creates a new PROPFIND request.
    #[must_use]
    pub fn new() -> Self {
        Self { props: Vec::new() }
    }

    /// Adds a property to the request.
    pub fn add_property(&mut self, prop: Prop) -> &mut Self {
        if !self.props.contains(&prop) {
            self.props.push(prop);
        }
        self
    }

    /// Builds the XML body for the PROPFIND request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, DavError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        // <D:propfind xmlns:D="DAV:" ...>
        let mut propfind = BytesStart::new("D:propfind");
        propfind.push_attribute(("xmlns:D", Namespace::Dav.uri()));
        for namespace in [Namespace::CalDav, Namespace::OwnCloud] {
            if self.props.iter().any(|p| p.namespace() == namespace) {
                propfind.push_attribute((namespace.xmlns_attr().as_str(), namespace.uri()));
            }
        }
        writer.write_event(Event::Start(propfind))?;

        writer.write_event(Event::Start(BytesStart::new("D:prop")))?;

        for prop in &self.props {
            // Namespaces already declared on propfind
            let qname = format!("{}:{}", prop.namespace().prefix(), prop.name());
            writer.write_event(Event::Start(BytesStart::new(qname.as_str())))?;
            writer.write_event(Event::End(BytesEnd::new(qname.as_str())))?;
        }

        writer.write_event(Event::End(BytesEnd::new("D:prop")))?;
        writer.write_event(Event::End(BytesEnd::new("D:propfind")))?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| DavError::Xml(format!("UTF-8 error: {e}")))
    }
}

impl Default for PropFindRequest {
    fn default() -> Self {
        Self::new()
    }
}
