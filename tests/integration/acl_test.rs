//! ACL discovery through `PROPFIND` of `{DAV:}acl`.

use http::StatusCode;

use crate::helpers::{SHARE_BOB_READ, TestApp};

const ACL_PROPFIND: &str = r#"<?xml version="1.0"?>
<d:propfind xmlns:d="DAV:"><d:prop><d:acl/></d:prop></d:propfind>"#;

async fn acl_of(app: &TestApp, user: &str, path: &str) -> (StatusCode, String) {
    let auth = TestApp::basic(user);
    let response = app
        .request(
            "PROPFIND",
            path,
            &[
                ("Authorization", auth.as_str()),
                ("Depth", "0"),
                ("Content-Type", "application/xml"),
            ],
            ACL_PROPFIND,
        )
        .await;
    (response.status, response.body)
}

#[tokio::test]
async fn test_owner_holds_protected_write() {
    let app = TestApp::new();
    let (status, body) = acl_of(&app, "alice", "/calendars/alice/personal").await;

    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert!(body.contains("<D:href>/principals/alice/</D:href>"));
    assert!(body.contains("<D:href>/principals/alice/calendar-proxy-write/</D:href>"));
    assert!(body.contains("<D:write/>"));
    assert!(body.contains("<D:protected/>"));
}

#[tokio::test]
async fn test_read_only_sharee_gets_read_and_no_write() {
    let app = TestApp::new();
    let response = app
        .share("alice", "/calendars/alice/personal", SHARE_BOB_READ)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let (status, body) = acl_of(&app, "bob", "/calendars/bob/personal_shared_by_alice").await;

    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert!(body.contains("<D:href>/principals/bob/</D:href>"), "{body}");
    assert!(body.contains("<D:read/>"));
    assert!(!body.contains("<D:write/>"), "{body}");
}

#[tokio::test]
async fn test_stranger_sees_empty_acl() {
    let app = TestApp::new();
    let (status, body) = acl_of(&app, "carol", "/calendars/alice/personal").await;

    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert!(!body.contains("<D:ace>"));
}

#[tokio::test]
async fn test_depth_one_is_not_answered() {
    let app = TestApp::new();
    let auth = TestApp::basic("alice");
    let response = app
        .request(
            "PROPFIND",
            "/calendars/alice/personal",
            &[("Authorization", auth.as_str()), ("Depth", "1")],
            ACL_PROPFIND,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
}
