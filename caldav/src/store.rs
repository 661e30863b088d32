// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Collaborators the resolver reads from: the principal directory and the
//! collection store.

use async_trait::async_trait;

use crate::config::HomeSetLayout;
use crate::error::DavError;
use crate::request::Prop;
use crate::types::{CalendarChild, Href, Principal};

/// Looks up calendar-related facts about principals.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Returns the calendar home of `principal`, or `None` if it has none.
    async fn calendar_home_for_principal(
        &self,
        principal: &Principal,
    ) -> Result<Option<Href>, DavError>;

    /// Returns the calendar user addresses of `principal` (e.g. `mailto:` URIs).
    async fn addresses_for_principal(
        &self,
        principal: &Principal,
    ) -> Result<Option<Vec<String>>, DavError>;
}

/// Lists collections in the backing store.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Lists the immediate children of `collection` with the given properties,
    /// in the order the store returns them.
    async fn list_children(
        &self,
        collection: &Href,
        props: &[Prop],
    ) -> Result<Vec<CalendarChild>, DavError>;
}

/// Directory that derives calendar homes from principal paths.
///
/// Only principals of exactly the form `<principal_prefix>/<id>` have a home;
/// deeper paths such as `principals/users/alice/calendar-proxy-read` do not.
#[derive(Debug, Clone, Default)]
pub struct TemplateDirectory {
    layout: HomeSetLayout,
}

impl TemplateDirectory {
    /// Creates a directory for the given layout.
    #[must_use]
    pub const fn new(layout: HomeSetLayout) -> Self {
        Self { layout }
    }

    /// Computes the calendar home path for `principal`.
    #[must_use]
    pub fn home_for(&self, principal: &Principal) -> Option<Href> {
        let prefix = self.layout.principal_prefix.trim_matches('/');
        let root = self.layout.calendar_root.trim_matches('/');

        let id = principal
            .as_str()
            .trim_matches('/')
            .strip_prefix(prefix)?
            .strip_prefix('/')?;
        if id.is_empty() || id.contains('/') {
            return None;
        }

        Some(Href::new(format!("/{root}/{id}/")))
    }
}

#[async_trait]
impl PrincipalDirectory for TemplateDirectory {
    async fn calendar_home_for_principal(
        &self,
        principal: &Principal,
    ) -> Result<Option<Href>, DavError> {
        Ok(self.home_for(principal))
    }

    async fn addresses_for_principal(
        &self,
        _principal: &Principal,
    ) -> Result<Option<Vec<String>>, DavError> {
        Ok(None)
    }
}
