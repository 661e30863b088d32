// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::ops::Deref;

use crate::xml;

/// Resource href (path).
///
/// A `Href` represents the path to a resource on a `CalDAV` server,
/// such as `/calendars/alice/personal/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Href(String);

impl Href {
    /// Creates a new `Href` from a string.
    #[must_use]
    pub const fn new(href: String) -> Self {
        Self(href)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares two hrefs ignoring a trailing slash.
    #[must_use]
    pub fn same_collection(&self, other: &Self) -> bool {
        self.0.trim_end_matches('/') == other.0.trim_end_matches('/')
    }
}

impl Deref for Href {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Href {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Href {
    fn from(href: String) -> Self {
        Self(href)
    }
}

impl From<&str> for Href {
    fn from(href: &str) -> Self {
        Self(href.to_string())
    }
}

/// Principal URL naming a user or resource, e.g. `principals/users/alice`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal(String);

impl Principal {
    /// Creates a new `Principal` from a string.
    #[must_use]
    pub const fn new(url: String) -> Self {
        Self(url)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Principal {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Principal {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl From<&str> for Principal {
    fn from(url: &str) -> Self {
        Self(url.to_string())
    }
}

/// Sharing state of a resource, as reported by `DAV:share-access`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareAccess {
    /// The resource is not shared.
    NotShared,
    /// The resource is owned by the current principal and shared with others.
    SharedOwner,
    /// The resource is shared to the current principal read-only.
    Read,
    /// The resource is shared to the current principal read-write.
    ReadWrite,
    /// The share was revoked or never accepted.
    NoAccess,
}

impl ShareAccess {
    /// Returns the XML element name in the `DAV:` namespace.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NotShared => "not-shared",
            Self::SharedOwner => "shared-owner",
            Self::Read => "read",
            Self::ReadWrite => "read-write",
            Self::NoAccess => "no-access",
        }
    }

    /// Parses an XML element local name.
    #[must_use]
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"not-shared" => Some(Self::NotShared),
            b"shared-owner" => Some(Self::SharedOwner),
            b"read" => Some(Self::Read),
            b"read-write" => Some(Self::ReadWrite),
            b"no-access" => Some(Self::NoAccess),
            _ => None,
        }
    }

    /// Whether the current principal owns the resource.
    #[must_use]
    pub const fn is_owned(self) -> bool {
        matches!(self, Self::NotShared | Self::SharedOwner)
    }
}

impl fmt::Display for ShareAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resource type tokens from `DAV:resourcetype`.
///
/// Tokens in the `DAV:` namespace, or in no namespace, are kept by local name
/// (`collection`); any other namespace is kept in Clark notation
/// (`{urn:ietf:params:xml:ns:caldav}calendar`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceType(Vec<String>);

impl ResourceType {
    /// The `C:calendar` token.
    pub const CALENDAR: &'static str = "{urn:ietf:params:xml:ns:caldav}calendar";

    /// Creates a resource type from its tokens.
    #[must_use]
    pub const fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    /// Resource type of a calendar collection: `DAV:collection` and `C:calendar`.
    #[must_use]
    pub fn calendar() -> Self {
        Self(vec!["collection".to_string(), Self::CALENDAR.to_string()])
    }

    /// Formats the token for an element in `namespace`.
    #[must_use]
    pub fn token(namespace: Option<&str>, local: &str) -> String {
        match namespace {
            Some(ns) if ns != xml::ns::DAV => format!("{{{ns}}}{local}"),
            _ => local.to_string(),
        }
    }

    /// Whether the given token is present.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    /// Whether this is a `CalDAV` calendar collection.
    #[must_use]
    pub fn is_calendar(&self) -> bool {
        self.contains(Self::CALENDAR)
    }
}

impl<S: Into<String>> FromIterator<S> for ResourceType {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// One immediate child of a calendar home, with the properties needed to
/// pick a default calendar.
///
/// Every property is optional: `None` means the store did not report it.
#[derive(Debug, Clone)]
pub struct CalendarChild {
    /// The href of the child.
    pub href: Href,
    /// Resource type tokens.
    pub resource_type: Option<ResourceType>,
    /// Sharing state.
    pub share_access: Option<ShareAccess>,
    /// Read-only flag (`oc:read-only`).
    pub read_only: Option<bool>,
    /// Supported component types (VEVENT, VTODO, etc.); `None` means unrestricted.
    pub supported_components: Option<Vec<String>>,
}

impl CalendarChild {
    /// Creates a child with no reported properties.
    #[must_use]
    pub const fn new(href: Href) -> Self {
        Self {
            href,
            resource_type: None,
            share_access: None,
            read_only: None,
            supported_components: None,
        }
    }

    /// Sets the resource type.
    #[must_use]
    pub fn with_resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    /// Sets the sharing state.
    #[must_use]
    pub const fn with_share_access(mut self, share_access: ShareAccess) -> Self {
        self.share_access = Some(share_access);
        self
    }

    /// Sets the read-only flag.
    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    /// Sets the supported component set.
    #[must_use]
    pub fn with_supported_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_components = Some(components.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn href_same_collection_ignores_trailing_slash() {
        let a = Href::from("/calendars/alice/");
        let b = Href::from("/calendars/alice");
        assert!(a.same_collection(&b));
        assert!(!a.same_collection(&Href::from("/calendars/alice/personal/")));
    }

    #[test]
    fn share_access_ownership() {
        assert!(ShareAccess::NotShared.is_owned());
        assert!(ShareAccess::SharedOwner.is_owned());
        assert!(!ShareAccess::Read.is_owned());
        assert!(!ShareAccess::ReadWrite.is_owned());
        assert!(!ShareAccess::NoAccess.is_owned());
    }

    #[test]
    fn share_access_names_parse_back() {
        for access in [
            ShareAccess::NotShared,
            ShareAccess::SharedOwner,
            ShareAccess::Read,
            ShareAccess::ReadWrite,
            ShareAccess::NoAccess,
        ] {
            assert_eq!(ShareAccess::from_name(access.name().as_bytes()), Some(access));
        }
        assert_eq!(ShareAccess::from_name(b"owner"), None);
    }

    #[test]
    fn resource_type_is_calendar() {
        assert!(ResourceType::calendar().is_calendar());

        let rt: ResourceType = ["collection", ResourceType::CALENDAR].into_iter().collect();
        assert!(rt.is_calendar());

        let rt: ResourceType = ["collection", "schedule-inbox"].into_iter().collect();
        assert!(!rt.is_calendar());
    }

    #[test]
    fn resource_type_calendar_needs_caldav_namespace() {
        let rt: ResourceType = ["collection", "calendar"].into_iter().collect();
        assert!(!rt.is_calendar());

        let rt = ResourceType::new(vec![
            ResourceType::token(Some("DAV:"), "collection"),
            ResourceType::token(Some("urn:example:other"), "calendar"),
        ]);
        assert!(rt.contains("collection"));
        assert!(rt.contains("{urn:example:other}calendar"));
        assert!(!rt.is_calendar());

        assert_eq!(
            ResourceType::token(Some("urn:ietf:params:xml:ns:caldav"), "calendar"),
            ResourceType::CALENDAR
        );
    }
}
