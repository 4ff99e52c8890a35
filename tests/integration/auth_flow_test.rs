//! Registration, verification, and login flows against a live database.

use http::StatusCode;
use serde_json::json;

use prepdeck_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore]
async fn email_registration_requires_verification_before_login() {
    let app = TestApp::connect().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "alice@example.com",
                "password": "S3curePass!",
                "display_name": "Alice"
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "pending");
    assert!(
        response.body["data"]["password_hash"].is_null(),
        "Password hash must never be serialized"
    );

    // Login is refused until the email is verified
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "alice@example.com", "password": "S3curePass!" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let code = app.latest_otp("alice@example.com").await;
    let response = app
        .request(
            "POST",
            "/api/auth/verify-email",
            Some(json!({ "email": "alice@example.com", "code": code })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "active");
    assert_eq!(response.body["data"]["email_verified"], true);

    let token = app.login("alice@example.com", "S3curePass!").await;

    let response = app
        .request("GET", "/api/users/me", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["email"], "alice@example.com");
    assert_eq!(response.body["data"]["role"], "student");
}

#[tokio::test]
#[ignore]
async fn duplicate_email_registration_is_rejected() {
    let app = TestApp::connect().await;
    app.create_test_user("bob@example.com", "S3curePass!", UserRole::Student)
        .await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "bob@example.com", "password": "S3curePass!" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");
}

#[tokio::test]
#[ignore]
async fn phone_registration_flow_logs_the_user_in() {
    let app = TestApp::connect().await;

    let response = app
        .request(
            "POST",
            "/api/auth/start-registration",
            Some(json!({ "phone": "+15551230001" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["target"], "+15551230001");

    let code = app.latest_otp("+15551230001").await;
    let response = app
        .request(
            "POST",
            "/api/auth/complete-registration",
            Some(json!({
                "phone": "+15551230001",
                "code": code,
                "display_name": "Carol"
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let token = response.body["data"]["access_token"]
        .as_str()
        .expect("access token")
        .to_string();
    assert_eq!(response.body["data"]["user"]["status"], "active");
    assert_eq!(response.body["data"]["user"]["phone_verified"], true);

    // The session token issued at registration works immediately
    let response = app
        .request("GET", "/api/users/me", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["phone"], "+15551230001");
}

#[tokio::test]
#[ignore]
async fn wrong_otp_code_is_rejected() {
    let app = TestApp::connect().await;

    app.request(
        "POST",
        "/api/auth/start-registration",
        Some(json!({ "phone": "+15551230002" })),
        None,
    )
    .await;

    let response = app
        .request(
            "POST",
            "/api/auth/complete-registration",
            Some(json!({ "phone": "+15551230002", "code": "000000" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn verification_code_is_single_use() {
    let app = TestApp::connect().await;

    app.request(
        "POST",
        "/api/auth/register",
        Some(json!({ "email": "henry@example.com", "password": "S3curePass!" })),
        None,
    )
    .await;
    let code = app.latest_otp("henry@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/verify-email",
            Some(json!({ "email": "henry@example.com", "code": code })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    // Replaying the consumed code must fail
    let response = app
        .request(
            "POST",
            "/api/auth/verify-email",
            Some(json!({ "email": "henry@example.com", "code": code })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "AUTHENTICATION_ERROR");
}

#[tokio::test]
#[ignore]
async fn expired_verification_code_is_rejected() {
    let app = TestApp::connect().await;

    app.request(
        "POST",
        "/api/auth/register",
        Some(json!({ "email": "iris@example.com", "password": "S3curePass!" })),
        None,
    )
    .await;
    let code = app.latest_otp("iris@example.com").await;

    sqlx::query("UPDATE otps SET expires_at = NOW() - INTERVAL '1 minute' WHERE target = $1")
        .bind("iris@example.com")
        .execute(&app.db_pool)
        .await
        .expect("Failed to expire code");

    let response = app
        .request(
            "POST",
            "/api/auth/verify-email",
            Some(json!({ "email": "iris@example.com", "code": code })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(
        response.body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("expired"),
        "Expected an expiry rejection, got: {:?}",
        response.body
    );
}

#[tokio::test]
#[ignore]
async fn login_with_wrong_password_fails() {
    let app = TestApp::connect().await;
    app.create_test_user("dave@example.com", "S3curePass!", UserRole::Student)
        .await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "dave@example.com", "password": "WrongPass!" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "AUTHENTICATION_ERROR");
}

#[tokio::test]
#[ignore]
async fn logout_invalidates_the_session() {
    let app = TestApp::connect().await;
    app.create_test_user("erin@example.com", "S3curePass!", UserRole::Student)
        .await;
    let token = app.login("erin@example.com", "S3curePass!").await;

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/users/me", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn logout_all_devices_ends_every_session() {
    let app = TestApp::connect().await;
    app.create_test_user("frank@example.com", "S3curePass!", UserRole::Instructor)
        .await;

    // Instructors are not limited to a single session
    let first = app.login("frank@example.com", "S3curePass!").await;
    let second = app.login("frank@example.com", "S3curePass!").await;

    let response = app
        .request("GET", "/api/auth/sessions", None, Some(&second))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(2));

    let response = app
        .request("POST", "/api/auth/logout-all-devices", None, Some(&second))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    for token in [&first, &second] {
        let response = app
            .request("GET", "/api/users/me", None, Some(token))
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
#[ignore]
async fn student_second_login_replaces_first_session() {
    let app = TestApp::connect().await;
    app.create_test_user("grace@example.com", "S3curePass!", UserRole::Student)
        .await;

    let first = app.login("grace@example.com", "S3curePass!").await;
    let second = app.login("grace@example.com", "S3curePass!").await;

    let response = app
        .request("GET", "/api/users/me", None, Some(&first))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/users/me", None, Some(&second))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}
