// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Default scheduling calendar resolution.
//!
//! The default calendar of a principal is the first child of its calendar
//! home that is a calendar, is writable, is owned by the principal and can
//! hold events.

use std::fmt;

use crate::error::DavError;
use crate::request::Prop;
use crate::store::{CollectionStore, PrincipalDirectory};
use crate::types::{CalendarChild, Href, Principal, ShareAccess};

/// Why a calendar home child was not picked as the default calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The resource type is missing or does not contain `calendar`.
    NotACalendar,
    /// The calendar is read-only, e.g. a generated birthday calendar.
    ReadOnly,
    /// The calendar belongs to someone else and is shared with the principal.
    SharedWithPrincipal(ShareAccess),
    /// The supported component set excludes `VEVENT`.
    NoEventSupport,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotACalendar => f.write_str("not a calendar"),
            Self::ReadOnly => f.write_str("read-only"),
            Self::SharedWithPrincipal(access) => write!(f, "shared with principal ({access})"),
            Self::NoEventSupport => f.write_str("does not support VEVENT"),
        }
    }
}

/// Component name of calendar events.
const VEVENT: &str = "VEVENT";

fn check_calendar(child: &CalendarChild) -> Result<(), Rejection> {
    match &child.resource_type {
        Some(rt) if rt.is_calendar() => Ok(()),
        _ => Err(Rejection::NotACalendar),
    }
}

fn check_writable(child: &CalendarChild) -> Result<(), Rejection> {
    match child.read_only {
        Some(true) => Err(Rejection::ReadOnly),
        _ => Ok(()),
    }
}

fn check_owned(child: &CalendarChild) -> Result<(), Rejection> {
    match child.share_access {
        Some(access) if !access.is_owned() => Err(Rejection::SharedWithPrincipal(access)),
        _ => Ok(()),
    }
}

fn check_supports_events(child: &CalendarChild) -> Result<(), Rejection> {
    match &child.supported_components {
        Some(components) if !components.iter().any(|c| c.eq_ignore_ascii_case(VEVENT)) => {
            Err(Rejection::NoEventSupport)
        }
        _ => Ok(()),
    }
}

/// Applies the default-calendar checks in order and reports the first failure.
///
/// # Errors
///
/// Returns the [`Rejection`] of the first failing check.
pub fn evaluate(child: &CalendarChild) -> Result<(), Rejection> {
    check_calendar(child)?;
    check_writable(child)?;
    check_owned(child)?;
    check_supports_events(child)
}

/// Picks the first qualifying child in listing order.
#[must_use]
pub fn select_default(children: &[CalendarChild]) -> Option<&CalendarChild> {
    children.iter().find(|child| match evaluate(child) {
        Ok(()) => true,
        Err(reason) => {
            tracing::trace!(href = %child.href, %reason, "skipping calendar home child");
            false
        }
    })
}

/// Resolves the default scheduling calendar of a principal.
#[derive(Clone, Copy)]
pub struct DefaultCalendarResolver<'a> {
    directory: &'a dyn PrincipalDirectory,
    store: &'a dyn CollectionStore,
}

impl fmt::Debug for DefaultCalendarResolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultCalendarResolver").finish_non_exhaustive()
    }
}

impl<'a> DefaultCalendarResolver<'a> {
    /// Creates a resolver reading homes from `directory` and listings from `store`.
    #[must_use]
    pub fn new(directory: &'a dyn PrincipalDirectory, store: &'a dyn CollectionStore) -> Self {
        Self { directory, store }
    }

    /// Returns the href of the principal's default calendar.
    ///
    /// A principal without a calendar home, or a home without a qualifying
    /// calendar, yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory lookup or the listing fails.
    #[tracing::instrument(skip_all, fields(principal = %principal))]
    pub async fn resolve(&self, principal: &Principal) -> Result<Option<Href>, DavError> {
        let Some(home) = self.directory.calendar_home_for_principal(principal).await? else {
            tracing::debug!("principal has no calendar home");
            return Ok(None);
        };

        let children = self
            .store
            .list_children(&home, &Prop::DEFAULT_CALENDAR_PROPS)
            .await?;
        tracing::debug!(%home, count = children.len(), "listed calendar home");

        let default = select_default(&children).map(|child| child.href.clone());
        match &default {
            Some(href) => tracing::debug!(%href, "found default calendar"),
            None => tracing::debug!("no qualifying calendar in home"),
        }
        Ok(default)
    }
}
