//! Share documents POSTed to calendar collections.

use http::StatusCode;

use calshare_core::traits::{CalendarBackend, ShareStorage};
use calshare_core::types::SharePermissions;

use crate::helpers::{SHARE_BOB_READ, TestApp};

#[tokio::test]
async fn test_owner_shares_calendar_read_only() {
    let app = TestApp::new();

    let response = app
        .share("alice", "/calendars/alice/personal", SHARE_BOB_READ)
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.headers["x-dav-sharing"], "applied");
    assert!(response.body.is_empty());

    let grants = app
        .state
        .backend
        .store
        .get_grants(app.personal_calendar("alice"))
        .await
        .unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].principal, "principals/bob");
    assert_eq!(grants[0].permissions, SharePermissions::READ);
}

#[tokio::test]
async fn test_shared_calendar_appears_in_sharee_home() {
    let app = TestApp::new();
    app.share("alice", "/calendars/alice/personal", SHARE_BOB_READ)
        .await;

    let records = app
        .state
        .backend
        .store
        .calendars_for_principal("principals/bob")
        .await
        .unwrap();
    let shared = records
        .iter()
        .find(|r| r.is_shared())
        .expect("shared calendar missing");
    assert_eq!(shared.uri, "personal_shared_by_alice");
    assert!(shared.read_only);
}

#[tokio::test]
async fn test_text_plain_is_not_intercepted() {
    let app = TestApp::new();
    let auth = TestApp::basic("alice");

    let response = app
        .request(
            "POST",
            "/calendars/alice/personal",
            &[("Authorization", auth.as_str()), ("Content-Type", "text/plain")],
            crate::helpers::SHARE_BOB_READ,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
    assert!(!response.headers.contains_key("x-dav-sharing"));
    assert!(app
        .state
        .backend
        .store
        .get_grants(app.personal_calendar("alice"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_removal_is_idempotent() {
    let app = TestApp::new();
    app.share("alice", "/calendars/alice/personal", SHARE_BOB_READ)
        .await;

    let remove = r#"<o:share xmlns:d="DAV:" xmlns:o="http://owncloud.org/ns">
  <o:remove><d:href>mailto:bob@example.com</d:href></o:remove>
</o:share>"#;

    for _ in 0..2 {
        let response = app
            .share("alice", "/calendars/alice/personal", remove)
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        assert!(app
            .state
            .backend
            .store
            .get_grants(app.personal_calendar("alice"))
            .await
            .unwrap()
            .is_empty());
    }
}

#[tokio::test]
async fn test_non_owner_cannot_share() {
    let app = TestApp::new();

    let response = app
        .share("carol", "/calendars/alice/personal", SHARE_BOB_READ)
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.body.contains("need-privileges"), "{}", response.body);
}

#[tokio::test]
async fn test_sharee_cannot_reshare() {
    let app = TestApp::new();
    let read_write = r#"<o:share xmlns:d="DAV:" xmlns:o="http://owncloud.org/ns">
  <o:set><d:href>principal:principals/bob</d:href></o:set>
</o:share>"#;
    app.share("alice", "/calendars/alice/personal", read_write)
        .await;

    let reshare = r#"<o:share xmlns:d="DAV:" xmlns:o="http://owncloud.org/ns">
  <o:set><d:href>mailto:carol@example.com</d:href><o:read/></o:set>
</o:share>"#;
    let response = app
        .share("bob", "/calendars/bob/personal_shared_by_alice", reshare)
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let grants = app
        .state
        .backend
        .store
        .get_grants(app.personal_calendar("alice"))
        .await
        .unwrap();
    assert_eq!(grants.len(), 1);
}

#[tokio::test]
async fn test_malformed_share_document() {
    let app = TestApp::new();
    let body = r#"<o:share xmlns:o="http://owncloud.org/ns"><o:set>"#;

    let response = app
        .share("alice", "/calendars/alice/personal", body)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_path_falls_through() {
    let app = TestApp::new();

    let response = app
        .share("alice", "/calendars/alice/missing", SHARE_BOB_READ)
        .await;

    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
}
