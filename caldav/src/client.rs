// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `CalDAV` client backing the directory and collection store over HTTP.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::CalDavConfig;
use crate::error::DavError;
use crate::http::HttpClient;
use crate::request::{Depth, Prop, PropFindRequest};
use crate::response::{MultiStatusResponse, Properties, ResponseItem};
use crate::store::{CollectionStore, PrincipalDirectory};
use crate::types::{CalendarChild, Href, Principal};

/// `CalDAV` client reading principals and calendar homes from a remote server.
///
/// # Example
///
/// ```ignore
/// use schedcal_caldav::{AuthMethod, CalDavClient, CalDavConfig, DefaultCalendarResolver};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CalDavConfig {
///     base_url: "https://caldav.example.com/remote.php/dav".to_string(),
///     auth: AuthMethod::Basic {
///         username: "alice".to_string(),
///         password: "pass".to_string(),
///     },
///     ..Default::default()
/// };
///
/// let client = CalDavClient::new(config)?;
/// let resolver = DefaultCalendarResolver::new(&client, &client);
/// let default = resolver.resolve(&"principals/users/alice".into()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CalDavClient {
    http: Arc<HttpClient>,
}

impl CalDavClient {
    /// Creates a new `CalDAV` client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: CalDavConfig) -> Result<Self, DavError> {
        let http = HttpClient::new(config)?;
        Ok(Self {
            http: Arc::new(http),
        })
    }

    /// Fetches properties of a principal resource, `None` if the principal doesn't exist.
    async fn principal_props(
        &self,
        principal: &Principal,
        prop: Prop,
    ) -> Result<Option<Properties>, DavError> {
        let href = Href::new(principal.as_str().to_string());
        let mut propfind = PropFindRequest::new();
        propfind.add_property(prop);

        let xml = match self.http.propfind(&href, &propfind, Depth::Zero).await {
            Ok(xml) => xml,
            Err(DavError::NotFound(_)) => {
                tracing::debug!(%principal, "principal not found on server");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let multistatus = MultiStatusResponse::from_xml(&xml)?;
        Ok(multistatus
            .responses
            .first()
            .map(ResponseItem::found_props))
    }
}

#[async_trait]
impl PrincipalDirectory for CalDavClient {
    async fn calendar_home_for_principal(
        &self,
        principal: &Principal,
    ) -> Result<Option<Href>, DavError> {
        let props = self.principal_props(principal, Prop::CalendarHomeSet).await?;
        Ok(props.and_then(|p| p.calendar_home_set))
    }

    async fn addresses_for_principal(
        &self,
        principal: &Principal,
    ) -> Result<Option<Vec<String>>, DavError> {
        let props = self
            .principal_props(principal, Prop::CalendarUserAddressSet)
            .await?;
        Ok(props.and_then(|p| p.calendar_user_address_set))
    }
}

#[async_trait]
impl CollectionStore for CalDavClient {
    async fn list_children(
        &self,
        collection: &Href,
        props: &[Prop],
    ) -> Result<Vec<CalendarChild>, DavError> {
        let mut propfind = PropFindRequest::new();
        for &prop in props {
            propfind.add_property(prop);
        }

        let xml = self.http.propfind(collection, &propfind, Depth::One).await?;
        let multistatus = MultiStatusResponse::from_xml(&xml)?;
        Ok(multistatus.into_children(collection))
    }
}
