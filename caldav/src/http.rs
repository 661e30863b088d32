// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with authentication and PROPFIND handling.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};

use crate::config::{AuthMethod, CalDavConfig};
use crate::error::DavError;
use crate::request::{Depth, PropFindRequest};
use crate::types::Href;

/// HTTP client for `CalDAV` operations.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    config: CalDavConfig,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or invalid, or if HTTP client
    /// creation fails.
    pub fn new(config: CalDavConfig) -> Result<Self, DavError> {
        if config.base_url.is_empty() {
            return Err(DavError::Config("base_url must not be empty".to_string()));
        }

        let mut base_url = Url::parse(&config.base_url).map_err(|e| {
            DavError::Config(format!("Invalid base_url {}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DavError::Config(format!(
                "base_url {} cannot be a base",
                config.base_url
            )));
        }
        // Relative hrefs resolve below the base path, not beside its last segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Resolves an href against the base URL.
    ///
    /// Absolute paths such as `/remote.php/dav/calendars/alice/` replace the
    /// base path, as servers report them; relative ones are appended to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the href cannot be joined onto the base URL.
    pub fn full_url(&self, href: &str) -> Result<Url, DavError> {
        self.base_url
            .join(href)
            .map_err(|e| DavError::Http(format!("Invalid href {href}: {e}")))
    }

    /// Builds a request with authentication headers.
    pub fn build_request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut req = self.client.request(method, url);

        match &self.config.auth {
            AuthMethod::Basic { username, password } => {
                req = req.basic_auth(username, Some(password));
            }
            AuthMethod::Bearer { token } => {
                req = req.bearer_auth(token);
            }
            AuthMethod::None => {}
        }

        req
    }

    /// Sends a PROPFIND for `href` and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns [`DavError::NotFound`] on 404, and other errors if the request
    /// fails or the server answers with an error status.
    pub async fn propfind(
        &self,
        href: &Href,
        request: &PropFindRequest,
        depth: Depth,
    ) -> Result<String, DavError> {
        let url = self.full_url(href.as_str())?;
        let body = request.build()?;
        let method = Method::from_bytes(b"PROPFIND")
            .map_err(|e| DavError::Http(format!("Invalid method: {e}")))?;

        tracing::debug!(%url, depth = depth.as_str(), "sending PROPFIND");
        let resp = self
            .execute(
                href,
                self.build_request(method, url)
                    .header("Content-Type", "application/xml; charset=utf-8")
                    .header("Depth", depth.as_str())
                    .body(body),
            )
            .await?;

        Ok(resp.text().await?)
    }

    /// Executes a request and checks for HTTP errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns an error status code.
    pub async fn execute(&self, href: &Href, req: RequestBuilder) -> Result<Response, DavError> {
        let resp = req.send().await?;

        match resp.status() {
            StatusCode::OK | StatusCode::MULTI_STATUS => Ok(resp),
            StatusCode::NOT_FOUND => Err(DavError::NotFound(href.clone())),
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(DavError::Auth(format!("{status} for {href}")))
            }
            status => {
                let text = resp
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read response".to_string());
                Err(DavError::Http(format!("{status}: {text}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpClient {
        HttpClient::new(CalDavConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn full_url_keeps_base_path_once() {
        let http = client("https://dav.example.com/remote.php/dav");

        assert_eq!(
            http.full_url("/remote.php/dav/calendars/alice/").unwrap().as_str(),
            "https://dav.example.com/remote.php/dav/calendars/alice/"
        );
        assert_eq!(
            http.full_url("principals/users/alice").unwrap().as_str(),
            "https://dav.example.com/remote.php/dav/principals/users/alice"
        );
    }

    #[test]
    fn full_url_on_host_root() {
        let http = client("http://127.0.0.1:8080/");

        assert_eq!(
            http.full_url("/calendars/alice/").unwrap().as_str(),
            "http://127.0.0.1:8080/calendars/alice/"
        );
        assert_eq!(
            http.full_url("principals/users/alice/").unwrap().as_str(),
            "http://127.0.0.1:8080/principals/users/alice/"
        );
    }

    #[test]
    fn full_url_accepts_absolute_href() {
        let http = client("https://dav.example.com/dav/");

        assert_eq!(
            http.full_url("https://other.example.com/calendars/alice/")
                .unwrap()
                .as_str(),
            "https://other.example.com/calendars/alice/"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = HttpClient::new(CalDavConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(err, DavError::Config(_)));
    }
}
