//! Router-shape tests that never touch the database.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = TestApp::offline().await;

    let response = app.request("GET", "/api/no-such-route", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_route_without_token_returns_401() {
    let app = TestApp::offline().await;

    let response = app.request("GET", "/api/users/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "AUTHENTICATION_ERROR");
}

#[tokio::test]
async fn garbage_bearer_token_returns_401() {
    let app = TestApp::offline().await;

    let response = app
        .request("GET", "/api/users/me", None, Some("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_route_without_token_returns_401() {
    let app = TestApp::offline().await;

    let response = app
        .request("GET", "/api/admin/analytics/overview", None, None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_with_invalid_email_returns_400() {
    let app = TestApp::offline().await;

    // Validation runs before any repository call, so the lazy pool is
    // never exercised.
    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "not-an-email", "password": "S3curePass!" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn login_without_credentials_returns_400() {
    let app = TestApp::offline().await;

    let response = app
        .request("POST", "/api/auth/login", Some(json!({})), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = TestApp::offline().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "degraded");
    assert_eq!(response.body["data"]["database"], "unavailable");
    assert_eq!(response.body["data"]["cache"], "connected");
}
