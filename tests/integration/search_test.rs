//! `calendar-search` reports.

use http::StatusCode;

use calshare_store::ObjectProperty;

use crate::helpers::{SHARE_BOB_READ, TestApp};

const SEARCH_STANDUP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<nc:calendar-search xmlns:nc="http://nextcloud.com/ns" xmlns:d="DAV:">
  <nc:filter>
    <nc:comp-filter name="VEVENT"/>
    <nc:prop-filter name="SUMMARY"/>
    <nc:search-term>standup</nc:search-term>
  </nc:filter>
  <nc:limit>10</nc:limit>
</nc:calendar-search>"#;

fn seed_objects(app: &TestApp) {
    let calendar = app.personal_calendar("alice");
    let engine = &app.state.backend.engine;
    engine
        .put_object(
            calendar,
            "standup.ics",
            "VEVENT",
            vec![ObjectProperty::new("SUMMARY", "Team standup")],
        )
        .unwrap();
    engine
        .put_object(
            calendar,
            "lunch.ics",
            "VEVENT",
            vec![ObjectProperty::new("SUMMARY", "Lunch")],
        )
        .unwrap();
}

async fn search(app: &TestApp, user: &str, body: &str) -> (StatusCode, String) {
    let auth = TestApp::basic(user);
    let response = app
        .request(
            "REPORT",
            &format!("/calendars/{user}"),
            &[
                ("Authorization", auth.as_str()),
                ("Content-Type", "application/xml"),
            ],
            body,
        )
        .await;
    (response.status, response.body)
}

#[tokio::test]
async fn test_search_returns_matching_objects() {
    let app = TestApp::new();
    seed_objects(&app);

    let (status, body) = search(&app, "alice", SEARCH_STANDUP).await;

    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert!(body.contains("/calendars/alice/personal/standup.ics"), "{body}");
    assert!(!body.contains("lunch.ics"));
}

#[tokio::test]
async fn test_sharee_search_covers_shared_calendars() {
    let app = TestApp::new();
    seed_objects(&app);

    let (_, body) = search(&app, "bob", SEARCH_STANDUP).await;
    assert!(!body.contains("standup.ics"));

    app.share("alice", "/calendars/alice/personal", SHARE_BOB_READ)
        .await;

    let (status, body) = search(&app, "bob", SEARCH_STANDUP).await;
    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert!(
        body.contains("/calendars/bob/personal_shared_by_alice/standup.ics"),
        "{body}"
    );
}

#[tokio::test]
async fn test_comp_filter_without_name_is_bad_request() {
    let app = TestApp::new();
    let body = r#"<nc:calendar-search xmlns:nc="http://nextcloud.com/ns">
  <nc:filter><nc:comp-filter/><nc:search-term>x</nc:search-term></nc:filter>
</nc:calendar-search>"#;

    let (status, body) = search(&app, "alice", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("valid-filter"));
}

#[tokio::test]
async fn test_non_numeric_offset_is_bad_request() {
    let app = TestApp::new();
    let body = r#"<nc:calendar-search xmlns:nc="http://nextcloud.com/ns">
  <nc:filter>
    <nc:comp-filter name="VEVENT"/>
    <nc:search-term>x</nc:search-term>
  </nc:filter>
  <nc:offset>ten</nc:offset>
</nc:calendar-search>"#;

    let (status, _) = search(&app, "alice", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
