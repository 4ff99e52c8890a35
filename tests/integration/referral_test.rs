//! Referral lifecycle flows against a live database.

use http::StatusCode;
use serde_json::json;

use prepdeck_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore]
async fn generate_code_is_idempotent_per_user() {
    let app = TestApp::connect().await;
    app.create_test_user("ref1@example.com", "S3curePass!", UserRole::Student)
        .await;
    let token = app.login("ref1@example.com", "S3curePass!").await;

    let first = app
        .request("POST", "/api/referrals/generate-code", None, Some(&token))
        .await;
    assert_eq!(first.status, StatusCode::OK, "{:?}", first.body);
    let code = first.body["data"]["code"].as_str().expect("code").to_string();
    assert_eq!(code.len(), app.config.referral.code_length);

    let second = app
        .request("POST", "/api/referrals/generate-code", None, Some(&token))
        .await;
    assert_eq!(second.body["data"]["code"], code.as_str());
}

#[tokio::test]
#[ignore]
async fn full_referral_lifecycle_pays_out_subscription_days() {
    let app = TestApp::connect().await;
    app.create_test_user("referrer@example.com", "S3curePass!", UserRole::Student)
        .await;
    let referee_id = app
        .create_test_user("referee@example.com", "S3curePass!", UserRole::Student)
        .await;
    app.create_test_user("admin@example.com", "S3curePass!", UserRole::Admin)
        .await;

    let referrer_token = app.login("referrer@example.com", "S3curePass!").await;
    let referee_token = app.login("referee@example.com", "S3curePass!").await;
    let admin_token = app.login("admin@example.com", "S3curePass!").await;

    let response = app
        .request(
            "POST",
            "/api/referrals/generate-code",
            None,
            Some(&referrer_token),
        )
        .await;
    let code = response.body["data"]["code"].as_str().expect("code").to_string();

    let response = app
        .request(
            "POST",
            "/api/referrals/apply-code",
            Some(json!({ "code": code })),
            Some(&referee_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "PENDING");

    let response = app
        .request(
            "POST",
            &format!("/api/admin/referrals/{referee_id}/complete"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "COMPLETED");

    // Both sides now hold an unclaimed reward
    let response = app
        .request("GET", "/api/referrals/me", None, Some(&referrer_token))
        .await;
    let rewards = response.body["data"]["rewards"].as_array().expect("rewards");
    assert_eq!(rewards.len(), 1);
    assert_eq!(rewards[0]["recipient"], "REFERRER");
    assert_eq!(rewards[0]["claimed"], false);
    let reward_id = rewards[0]["id"].as_str().expect("reward id").to_string();

    let response = app
        .request(
            "POST",
            &format!("/api/referrals/claim-reward/{reward_id}"),
            None,
            Some(&referrer_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["reward"]["claimed"], true);

    // The payout landed as an active subscription
    let response = app
        .request("GET", "/api/subscriptions/me", None, Some(&referrer_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["active"]["status"], "ACTIVE");

    // A second claim is refused in the envelope, not as an error
    let response = app
        .request(
            "POST",
            &format!("/api/referrals/claim-reward/{reward_id}"),
            None,
            Some(&referrer_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
#[ignore]
async fn own_code_cannot_be_applied() {
    let app = TestApp::connect().await;
    app.create_test_user("selfref@example.com", "S3curePass!", UserRole::Student)
        .await;
    let token = app.login("selfref@example.com", "S3curePass!").await;

    let response = app
        .request("POST", "/api/referrals/generate-code", None, Some(&token))
        .await;
    let code = response.body["data"]["code"].as_str().expect("code").to_string();

    let response = app
        .request(
            "POST",
            "/api/referrals/apply-code",
            Some(json!({ "code": code })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn a_user_can_only_be_referred_once() {
    let app = TestApp::connect().await;
    app.create_test_user("r1@example.com", "S3curePass!", UserRole::Student)
        .await;
    app.create_test_user("r2@example.com", "S3curePass!", UserRole::Student)
        .await;
    app.create_test_user("referee2@example.com", "S3curePass!", UserRole::Student)
        .await;

    let mut codes = Vec::new();
    for email in ["r1@example.com", "r2@example.com"] {
        let token = app.login(email, "S3curePass!").await;
        let response = app
            .request("POST", "/api/referrals/generate-code", None, Some(&token))
            .await;
        codes.push(response.body["data"]["code"].as_str().expect("code").to_string());
    }

    let token = app.login("referee2@example.com", "S3curePass!").await;
    let response = app
        .request(
            "POST",
            "/api/referrals/apply-code",
            Some(json!({ "code": codes[0] })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "POST",
            "/api/referrals/apply-code",
            Some(json!({ "code": codes[1] })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn unknown_code_returns_404() {
    let app = TestApp::connect().await;
    app.create_test_user("nobody@example.com", "S3curePass!", UserRole::Student)
        .await;
    let token = app.login("nobody@example.com", "S3curePass!").await;

    let response = app
        .request(
            "POST",
            "/api/referrals/apply-code",
            Some(json!({ "code": "NOPE1234" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn completing_a_referral_requires_admin() {
    let app = TestApp::connect().await;
    let referee_id = app
        .create_test_user("plain@example.com", "S3curePass!", UserRole::Student)
        .await;
    let token = app.login("plain@example.com", "S3curePass!").await;

    let response = app
        .request(
            "POST",
            &format!("/api/admin/referrals/{referee_id}/complete"),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
