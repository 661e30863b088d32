// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Client integration tests with wiremock.

use schedcal_caldav::{
    AuthMethod, CalDavClient, CalDavConfig, CollectionStore, DavError, DefaultCalendarResolver,
    Href, Principal, PrincipalDirectory, Prop, ShareAccess,
};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRINCIPAL_PROPS: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:multistatus xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:response>
    <D:href>/principals/users/alice/</D:href>
    <D:propstat>
      <D:prop>
        <C:calendar-home-set>
          <D:href>/calendars/alice/</D:href>
        </C:calendar-home-set>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"#;

const HOME_LISTING: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:multistatus xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav" xmlns:OC="http://owncloud.org/ns">
  <D:response>
    <D:href>/calendars/alice/</D:href>
    <D:propstat>
      <D:prop>
        <D:resourcetype><D:collection/></D:resourcetype>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/calendars/alice/birthdays/</D:href>
    <D:propstat>
      <D:prop>
        <D:resourcetype><D:collection/><C:calendar/></D:resourcetype>
        <OC:read-only>1</OC:read-only>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
  <D:response>
    <D:href>/calendars/alice/personal/</D:href>
    <D:propstat>
      <D:prop>
        <D:resourcetype><D:collection/><C:calendar/></D:resourcetype>
        <D:share-access><D:not-shared/></D:share-access>
        <C:supported-calendar-component-set>
          <C:comp name="VEVENT"/>
        </C:supported-calendar-component-set>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"#;

fn client_for(server: &MockServer) -> CalDavClient {
    let config = CalDavConfig {
        base_url: server.uri(),
        auth: AuthMethod::Basic {
            username: "alice".to_string(),
            password: "secret".to_string(),
        },
        ..Default::default()
    };
    CalDavClient::new(config).expect("Failed to create client")
}

async fn mount_principal(server: &MockServer) {
    Mock::given(method("PROPFIND"))
        .and(path("/principals/users/alice/"))
        .and(header("Depth", "0"))
        .and(body_string_contains("calendar-home-set"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(PRINCIPAL_PROPS, "application/xml"))
        .mount(server)
        .await;
}

async fn mount_home(server: &MockServer) {
    Mock::given(method("PROPFIND"))
        .and(path("/calendars/alice/"))
        .and(header("Content-Type", "application/xml; charset=utf-8"))
        .and(header("Depth", "1"))
        .and(body_string_contains("share-access"))
        .and(body_string_contains("read-only"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(HOME_LISTING, "application/xml"))
        .mount(server)
        .await;
}

#[tokio::test]
#[ignore = "require network"]
async fn client_calendar_home_for_principal() {
    let mock_server = MockServer::start().await;
    mount_principal(&mock_server).await;

    let client = client_for(&mock_server);
    let home = client
        .calendar_home_for_principal(&Principal::from("/principals/users/alice/"))
        .await
        .expect("Failed to look up calendar home");

    assert_eq!(home, Some(Href::from("/calendars/alice/")));
}

#[tokio::test]
#[ignore = "require network"]
async fn client_missing_principal_has_no_home() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .and(path("/principals/users/ghost/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let home = client
        .calendar_home_for_principal(&Principal::from("/principals/users/ghost/"))
        .await
        .expect("404 should not be an error");

    assert_eq!(home, None);
}

#[tokio::test]
#[ignore = "require network"]
async fn client_list_children_skips_home() {
    let mock_server = MockServer::start().await;
    mount_home(&mock_server).await;

    let client = client_for(&mock_server);
    let children = client
        .list_children(&Href::from("/calendars/alice/"), &Prop::DEFAULT_CALENDAR_PROPS)
        .await
        .expect("Failed to list children");

    assert_eq!(children.len(), 2);
    assert_eq!(children[0].href.as_str(), "/calendars/alice/birthdays/");
    assert_eq!(children[0].read_only, Some(true));
    assert_eq!(children[1].href.as_str(), "/calendars/alice/personal/");
    assert_eq!(children[1].share_access, Some(ShareAccess::NotShared));
}

#[tokio::test]
#[ignore = "require network"]
async fn client_resolves_default_calendar() {
    let mock_server = MockServer::start().await;
    mount_principal(&mock_server).await;
    mount_home(&mock_server).await;

    let client = client_for(&mock_server);
    let resolver = DefaultCalendarResolver::new(&client, &client);
    let default = resolver
        .resolve(&Principal::from("/principals/users/alice/"))
        .await
        .expect("Failed to resolve");

    assert_eq!(default, Some(Href::from("/calendars/alice/personal/")));
}

#[tokio::test]
#[ignore = "require network"]
async fn client_base_url_with_path_prefix() {
    let mock_server = MockServer::start().await;
    let principal_props =
        PRINCIPAL_PROPS.replace("/calendars/alice/", "/remote.php/dav/calendars/alice/");
    let home_listing =
        HOME_LISTING.replace("/calendars/alice/", "/remote.php/dav/calendars/alice/");
    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/dav/principals/users/alice"))
        .and(header("Depth", "0"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(principal_props, "application/xml"))
        .mount(&mock_server)
        .await;
    Mock::given(method("PROPFIND"))
        .and(path("/remote.php/dav/calendars/alice/"))
        .and(header("Depth", "1"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(home_listing, "application/xml"))
        .mount(&mock_server)
        .await;

    let client = CalDavClient::new(CalDavConfig {
        base_url: format!("{}/remote.php/dav", mock_server.uri()),
        ..Default::default()
    })
    .expect("Failed to create client");
    let resolver = DefaultCalendarResolver::new(&client, &client);
    let default = resolver
        .resolve(&Principal::from("principals/users/alice"))
        .await
        .expect("Failed to resolve");

    assert_eq!(
        default,
        Some(Href::from("/remote.php/dav/calendars/alice/personal/"))
    );
}

#[tokio::test]
#[ignore = "require network"]
async fn client_listing_failure_is_an_error() {
    let mock_server = MockServer::start().await;
    mount_principal(&mock_server).await;
    Mock::given(method("PROPFIND"))
        .and(path("/calendars/alice/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let resolver = DefaultCalendarResolver::new(&client, &client);
    let err = resolver
        .resolve(&Principal::from("/principals/users/alice/"))
        .await
        .unwrap_err();

    assert!(matches!(err, DavError::Http(ref msg) if msg.contains("500")));
}

#[tokio::test]
#[ignore = "require network"]
async fn client_unauthorized_is_auth_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .calendar_home_for_principal(&Principal::from("/principals/users/alice/"))
        .await
        .unwrap_err();

    assert!(matches!(err, DavError::Auth(_)));
}

#[test]
fn client_rejects_empty_base_url() {
    let err = CalDavClient::new(CalDavConfig::default()).unwrap_err();

    assert!(matches!(err, DavError::Config(_)));
}
