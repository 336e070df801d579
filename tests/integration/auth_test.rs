//! Authentication, sessions, and CSRF protection of share requests.

use http::StatusCode;

use calshare_core::traits::ShareStorage;

use crate::helpers::{SHARE_BOB_READ, TestApp};

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let response = app.request("GET", "/health", &[], "").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["data"]["status"], "ok");
    assert_eq!(response.json()["data"]["accounts"], 3);
}

#[tokio::test]
async fn test_dav_requires_credentials() {
    let app = TestApp::new();

    let response = app
        .request("PROPFIND", "/calendars/alice/personal", &[], "")
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers["www-authenticate"],
        "Basic realm=\"calshare\""
    );

    let wrong = format!(
        "Basic {}",
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, "alice:nope")
    );
    let response = app
        .request(
            "PROPFIND",
            "/calendars/alice/personal",
            &[("Authorization", wrong.as_str())],
            "",
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_post_without_csrf_token_is_rejected() {
    let app = TestApp::new();
    let (cookie, _token) = app.login("alice").await;

    let response = app
        .request(
            "POST",
            "/calendars/alice/personal",
            &[
                ("Cookie", cookie.as_str()),
                ("Content-Type", "application/xml"),
            ],
            SHARE_BOB_READ,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("forbidden"), "{}", response.body);
    assert!(app
        .state
        .backend
        .store
        .get_grants(app.personal_calendar("alice"))
        .await
        .unwrap()
        .is_empty());

    let response = app
        .request(
            "POST",
            "/calendars/alice/personal",
            &[
                ("Cookie", cookie.as_str()),
                ("Content-Type", "application/xml"),
                ("requesttoken", "forged"),
            ],
            SHARE_BOB_READ,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_post_with_csrf_token_is_applied() {
    let app = TestApp::new();
    let (cookie, token) = app.login("alice").await;

    let response = app
        .request(
            "POST",
            "/calendars/alice/personal",
            &[
                ("Cookie", cookie.as_str()),
                ("Content-Type", "application/xml"),
                ("requesttoken", token.as_str()),
            ],
            SHARE_BOB_READ,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(
        app.state
            .backend
            .store
            .get_grants(app.personal_calendar("alice"))
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_csrftoken_endpoint_returns_login_token() {
    let app = TestApp::new();
    let (cookie, token) = app.login("bob").await;

    let response = app
        .request("GET", "/csrftoken", &[("Cookie", cookie.as_str())], "")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["data"]["token"], token.as_str());
    assert_eq!(response.json()["data"]["header"], "requesttoken");

    let response = app.request("GET", "/csrftoken", &[], "").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::new();
    let (cookie, _token) = app.login("bob").await;

    let response = app
        .request("POST", "/logout", &[("Cookie", cookie.as_str())], "")
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/csrftoken", &[("Cookie", cookie.as_str())], "")
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let app = TestApp::new();
    let wrong = format!(
        "Basic {}",
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, "bob:wrong")
    );

    let response = app
        .request("POST", "/login", &[("Authorization", wrong.as_str())], "")
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error"], "UNAUTHORIZED");
}
