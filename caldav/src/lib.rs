// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Default scheduling calendar resolution for `CalDAV` servers (RFC 6638).

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(clippy::single_match_else, clippy::match_bool)]

mod client;
mod config;
mod error;
mod http;
mod propfind;
mod request;
mod resolver;
mod response;
mod store;
mod types;
mod xml;

pub use crate::client::CalDavClient;
pub use crate::config::{AuthMethod, CalDavConfig, HomeSetLayout};
pub use crate::error::DavError;
pub use crate::propfind::{PropFind, PropFindTarget, PropName, PropValue, ScheduleProperties};
pub use crate::request::{Depth, Prop, PropFindRequest};
pub use crate::resolver::{DefaultCalendarResolver, Rejection, evaluate, select_default};
pub use crate::response::{MultiStatusResponse, PropStat, Properties, ResponseItem};
pub use crate::store::{CollectionStore, PrincipalDirectory, TemplateDirectory};
pub use crate::types::{CalendarChild, Href, Principal, ResourceType, ShareAccess};
