// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::types::Href;

/// Errors raised while talking to the directory or the collection store.
///
/// A principal without a calendar home, or a home without a qualifying
/// calendar, is not an error: those cases resolve to `Ok(None)`.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DavError {
    /// HTTP layer error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// XML parsing/writing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Authentication or authorization error.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(Href),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backing store failed to answer a listing or lookup.
    #[error("Backing store failure: {0}")]
    BackingStore(String),
}

impl From<reqwest::Error> for DavError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<quick_xml::Error> for DavError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

impl From<std::io::Error> for DavError {
    fn from(e: std::io::Error) -> Self {
        Self::Xml(format!("IO error: {e}"))
    }
}
