// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Response parsers for WebDAV/CalDAV operations.

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;

use crate::error::DavError;
use crate::types::{CalendarChild, Href, ResourceType, ShareAccess};
use crate::xml::read_element_text;

/// `WebDAV` multistatus response.
#[derive(Debug, Clone)]
pub struct MultiStatusResponse {
    /// The response items.
    pub responses: Vec<ResponseItem>,
}

/// Individual response in multistatus.
#[derive(Debug, Clone)]
pub struct ResponseItem {
    /// The href the response is about.
    pub href: Href,
    /// Property groups, one per status.
    pub prop_stats: Vec<PropStat>,
    /// Response-level status, when the server sent one instead of propstats.
    pub status: Option<String>,
}

/// Property stat with status and value.
#[derive(Debug, Clone)]
pub struct PropStat {
    /// Properties reported under this status.
    pub props: Properties,
    /// Status line, e.g. `HTTP/1.1 200 OK`.
    pub status: String,
}

/// WebDAV/CalDAV properties.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    /// `DAV:resourcetype`
    pub resource_type: Option<ResourceType>,
    /// `DAV:share-access`
    pub share_access: Option<ShareAccess>,
    /// `oc:read-only`
    pub read_only: Option<bool>,
    /// `C:supported-calendar-component-set`
    pub supported_calendar_components: Option<Vec<String>>,
    /// `C:calendar-home-set`
    pub calendar_home_set: Option<Href>,
    /// `C:calendar-user-address-set`
    pub calendar_user_address_set: Option<Vec<String>>,
}

impl Properties {
    /// Fills properties that are unset here from `other`.
    fn merge(&mut self, other: &Self) {
        if self.resource_type.is_none() {
            self.resource_type.clone_from(&other.resource_type);
        }
        self.share_access = self.share_access.or(other.share_access);
        self.read_only = self.read_only.or(other.read_only);
        if self.supported_calendar_components.is_none() {
            self.supported_calendar_components
                .clone_from(&other.supported_calendar_components);
        }
        if self.calendar_home_set.is_none() {
            self.calendar_home_set.clone_from(&other.calendar_home_set);
        }
        if self.calendar_user_address_set.is_none() {
            self.calendar_user_address_set
                .clone_from(&other.calendar_user_address_set);
        }
    }
}

/// Whether a status line such as `HTTP/1.1 200 OK` reports success.
fn is_success(status: &str) -> bool {
    status
        .split_whitespace()
        .nth(1)
        .is_some_and(|code| code.starts_with('2'))
}

/// `oc:read-only` is serialized as `1`/`0` by some servers and `true`/`false` by others.
fn parse_flag(text: &str) -> bool {
    matches!(text.trim(), "1" | "true")
}

impl ResponseItem {
    /// Returns the properties reported with a success status, merged across propstats.
    ///
    /// Properties listed under `404 Not Found` (or any other failure) are left unset.
    #[must_use]
    pub fn found_props(&self) -> Properties {
        let mut props = Properties::default();
        for prop_stat in self.prop_stats.iter().filter(|p| is_success(&p.status)) {
            props.merge(&prop_stat.props);
        }
        props
    }
}

impl MultiStatusResponse {
    /// Parses multistatus response from XML.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails.
    #[expect(clippy::too_many_lines)]
    pub fn from_xml(xml: &str) -> Result<Self, DavError> {
        let mut reader = quick_xml::NsReader::from_str(xml);
        reader.config_mut().check_end_names = true;

        let mut responses = Vec::new();
        let mut current_response: Option<ResponseItem> = None;
        let mut current_prop_stats: Vec<PropStat> = Vec::new();
        let mut current_props: Properties = Properties::default();
        let mut in_prop = false;
        let mut in_response = false;
        let mut in_propstat = false;

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::End(ref e) if e.name().local_name().into_inner() == b"multistatus" => break,
                Event::Eof => break,

                Event::Start(ref e) => match e.name().local_name().into_inner() {
                    b"response" => {
                        in_response = true;
                        current_response = Some(ResponseItem {
                            href: Href::new(String::new()),
                            prop_stats: Vec::new(),
                            status: None,
                        });
                    }
                    b"href" if in_response && !in_propstat => {
                        let href = read_element_text(&mut reader)?;
                        if let Some(ref mut resp) = current_response {
                            resp.href = Href::new(href);
                        }
                    }
                    b"propstat" if in_response => {
                        in_propstat = true;
                        current_props = Properties::default();
                    }
                    b"prop" if in_propstat => in_prop = true,

                    b"resourcetype" if in_prop => {
                        let mut tokens = Vec::new();
                        loop {
                            match reader.read_event_into(&mut buf)? {
                                Event::End(ref e)
                                    if e.name().local_name().into_inner() == b"resourcetype" =>
                                {
                                    break;
                                }
                                Event::Start(ref e) | Event::Empty(ref e) => {
                                    let (namespace, local) = reader.resolve_element(e.name());
                                    let namespace = match namespace {
                                        ResolveResult::Bound(ns) => {
                                            Some(String::from_utf8_lossy(ns.as_ref()).into_owned())
                                        }
                                        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
                                    };
                                    tokens.push(ResourceType::token(
                                        namespace.as_deref(),
                                        &String::from_utf8_lossy(local.into_inner()),
                                    ));
                                }
                                Event::Eof => {
                                    return Err(DavError::Xml("Unexpected EOF".to_string()));
                                }
                                _ => {}
                            }
                        }
                        current_props.resource_type = Some(ResourceType::new(tokens));
                    }
                    b"share-access" if in_prop => {
                        loop {
                            match reader.read_event_into(&mut buf)? {
                                Event::End(ref e)
                                    if e.name().local_name().into_inner() == b"share-access" =>
                                {
                                    break;
                                }
                                Event::Start(ref e) | Event::Empty(ref e) => {
                                    let name = e.name().local_name().into_inner();
                                    if let Some(access) = ShareAccess::from_name(name) {
                                        current_props.share_access = Some(access);
                                    } else {
                                        tracing::warn!(
                                            value = %String::from_utf8_lossy(name),
                                            "ignoring unknown share-access value"
                                        );
                                    }
                                }
                                Event::Eof => {
                                    return Err(DavError::Xml("Unexpected EOF".to_string()));
                                }
                                _ => {}
                            }
                        }
                    }
                    b"read-only" if in_prop => {
                        let text = read_element_text(&mut reader)?;
                        current_props.read_only = Some(parse_flag(&text));
                    }
                    b"calendar-home-set" if in_prop => loop {
                        match reader.read_event_into(&mut buf)? {
                            Event::End(ref e)
                                if e.name().local_name().into_inner() == b"calendar-home-set" =>
                            {
                                break;
                            }
                            Event::Start(ref e) if e.name().local_name().into_inner() == b"href" => {
                                let href = read_element_text(&mut reader)?;
                                if current_props.calendar_home_set.is_none() {
                                    current_props.calendar_home_set = Some(Href::new(href));
                                }
                            }
                            Event::Eof => {
                                return Err(DavError::Xml("Unexpected EOF".to_string()));
                            }
                            _ => {}
                        }
                    },
                    b"calendar-user-address-set" if in_prop => {
                        let mut addresses = Vec::new();
                        loop {
                            match reader.read_event_into(&mut buf)? {
                                Event::End(ref e)
                                    if e.name().local_name().into_inner()
                                        == b"calendar-user-address-set" =>
                                {
                                    break;
                                }
                                Event::Start(ref e)
                                    if e.name().local_name().into_inner() == b"href" =>
                                {
                                    addresses.push(read_element_text(&mut reader)?);
                                }
                                Event::Eof => {
                                    return Err(DavError::Xml("Unexpected EOF".to_string()));
                                }
                                _ => {}
                            }
                        }
                        current_props.calendar_user_address_set = Some(addresses);
                    }
                    b"supported-calendar-component-set" if in_prop => {
                        let mut components = Vec::new();
                        loop {
                            match reader.read_event_into(&mut buf)? {
                                Event::End(ref e)
                                    if e.name().local_name().into_inner()
                                        == b"supported-calendar-component-set" =>
                                {
                                    break;
                                }
                                Event::Start(ref e) | Event::Empty(ref e)
                                    if e.name().local_name().into_inner() == b"comp" =>
                                {
                                    if let Ok(Some(name_attr)) = e.try_get_attribute("name") {
                                        let name = std::str::from_utf8(&name_attr.value)
                                            .map_err(|e| {
                                                DavError::Xml(format!("UTF-8 error: {e}"))
                                            })?
                                            .to_string();
                                        components.push(name);
                                    }
                                }
                                Event::Eof => {
                                    return Err(DavError::Xml("Unexpected EOF".to_string()));
                                }
                                _ => {}
                            }
                        }
                        current_props.supported_calendar_components = Some(components);
                    }
                    b"status" if in_propstat => {
                        let status = read_element_text(&mut reader)?;
                        current_prop_stats.push(PropStat {
                            props: current_props.clone(),
                            status,
                        });
                    }
                    b"status" if in_response => {
                        let status = read_element_text(&mut reader)?;
                        if let Some(ref mut resp) = current_response {
                            resp.status = Some(status);
                        }
                    }
                    _ => {}
                },

                // Empty property elements carry an empty value
                Event::Empty(ref e) if in_prop => match e.name().local_name().into_inner() {
                    b"resourcetype" => current_props.resource_type = Some(ResourceType::default()),
                    b"supported-calendar-component-set" => {
                        current_props.supported_calendar_components = Some(Vec::new());
                    }
                    b"calendar-user-address-set" => {
                        current_props.calendar_user_address_set = Some(Vec::new());
                    }
                    _ => {}
                },

                Event::End(ref e) => match e.name().local_name().into_inner() {
                    b"response" if in_response => {
                        in_response = false;
                        if let Some(mut resp) = current_response.take() {
                            resp.prop_stats.append(&mut current_prop_stats);
                            responses.push(resp);
                        }
                    }
                    b"propstat" if in_propstat => {
                        in_propstat = false;
                    }
                    b"prop" => {
                        in_prop = false;
                    }
                    _ => {}
                },
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { responses })
    }

    /// Converts multistatus response to calendar home children.
    ///
    /// Responses for `collection` itself are skipped, as are responses whose
    /// response-level status is a failure (e.g. a child that vanished while
    /// listing); the remaining ones keep the order the server sent them in.
    #[must_use]
    pub fn into_children(self, collection: &Href) -> Vec<CalendarChild> {
        self.responses
            .into_iter()
            .filter(|response| !response.href.same_collection(collection))
            .filter(|response| {
                let failed = response.status.as_deref().is_some_and(|s| !is_success(s));
                if failed {
                    tracing::debug!(
                        href = %response.href,
                        status = ?response.status,
                        "skipping failed response"
                    );
                }
                !failed
            })
            .map(|response| {
                let props = response.found_props();
                CalendarChild {
                    href: response.href,
                    resource_type: props.resource_type,
                    share_access: props.share_access,
                    read_only: props.read_only,
                    supported_components: props.supported_calendar_components,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_success() {
        assert!(is_success("HTTP/1.1 200 OK"));
        assert!(is_success("HTTP/1.1 207 Multi-Status"));
        assert!(!is_success("HTTP/1.1 404 Not Found"));
        assert!(!is_success("garbage"));
    }

    #[test]
    fn read_only_flag_values() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" true "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn merge_keeps_first_value() {
        let mut a = Properties {
            read_only: Some(false),
            ..Properties::default()
        };
        let b = Properties {
            read_only: Some(true),
            share_access: Some(ShareAccess::Read),
            ..Properties::default()
        };
        a.merge(&b);
        assert_eq!(a.read_only, Some(false));
        assert_eq!(a.share_access, Some(ShareAccess::Read));
    }
}
