//! Admin surface flows against a live database.

use http::StatusCode;
use serde_json::json;

use prepdeck_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore]
async fn analytics_overview_requires_admin() {
    let app = TestApp::connect().await;
    app.create_test_user("admin1@example.com", "S3curePass!", UserRole::Admin)
        .await;
    app.create_test_user("plebe@example.com", "S3curePass!", UserRole::Student)
        .await;

    let student_token = app.login("plebe@example.com", "S3curePass!").await;
    let response = app
        .request(
            "GET",
            "/api/admin/analytics/overview",
            None,
            Some(&student_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let admin_token = app.login("admin1@example.com", "S3curePass!").await;
    let response = app
        .request(
            "GET",
            "/api/admin/analytics/overview",
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["total_users"], 2);
    assert_eq!(response.body["data"]["users_by_role"]["student"], 1);
}

#[tokio::test]
#[ignore]
async fn admin_can_list_and_filter_users() {
    let app = TestApp::connect().await;
    app.create_test_user("admin2@example.com", "S3curePass!", UserRole::Admin)
        .await;
    app.create_test_user("s1@example.com", "S3curePass!", UserRole::Student)
        .await;
    app.create_test_user("s2@example.com", "S3curePass!", UserRole::Student)
        .await;
    let token = app.login("admin2@example.com", "S3curePass!").await;

    let response = app
        .request("GET", "/api/admin/users?per_page=10", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["total_items"], 3);

    let response = app
        .request("GET", "/api/admin/users?role=student", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_items"], 2);
}

#[tokio::test]
#[ignore]
async fn suspending_a_user_blocks_their_login() {
    let app = TestApp::connect().await;
    app.create_test_user("admin3@example.com", "S3curePass!", UserRole::Admin)
        .await;
    let target_id = app
        .create_test_user("victim@example.com", "S3curePass!", UserRole::Student)
        .await;
    let admin_token = app.login("admin3@example.com", "S3curePass!").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/users/{target_id}/status"),
            Some(json!({ "status": "suspended" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "suspended");

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "victim@example.com", "password": "S3curePass!" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn admin_can_change_a_user_role() {
    let app = TestApp::connect().await;
    app.create_test_user("admin4@example.com", "S3curePass!", UserRole::Admin)
        .await;
    let target_id = app
        .create_test_user("promote@example.com", "S3curePass!", UserRole::Student)
        .await;
    let token = app.login("admin4@example.com", "S3curePass!").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/users/{target_id}/role"),
            Some(json!({ "role": "instructor" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["role"], "instructor");
}

#[tokio::test]
#[ignore]
async fn exam_paper_lifecycle_controls_student_visibility() {
    let app = TestApp::connect().await;
    app.create_test_user("admin5@example.com", "S3curePass!", UserRole::Admin)
        .await;
    app.create_test_user("examinee@example.com", "S3curePass!", UserRole::Student)
        .await;
    let admin_token = app.login("admin5@example.com", "S3curePass!").await;
    let student_token = app.login("examinee@example.com", "S3curePass!").await;

    let response = app
        .request(
            "POST",
            "/api/admin/exams",
            Some(json!({
                "title": "Algebra Mock 1",
                "description": "Linear equations",
                "subject": "Mathematics",
                "duration_minutes": 60
            })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let paper_id = response.body["data"]["id"].as_str().expect("paper id").to_string();
    assert_eq!(response.body["data"]["is_published"], false);

    let response = app
        .request(
            "POST",
            &format!("/api/admin/exams/{paper_id}/questions"),
            Some(json!({
                "prompt": "2 + 2 = ?",
                "options": ["3", "4", "5"],
                "correct_option": 1,
                "marks": 2,
                "explanation": "Basic arithmetic",
                "position": 1
            })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    // Unpublished papers are invisible to students
    let response = app
        .request(
            "GET",
            &format!("/api/exams/{paper_id}"),
            None,
            Some(&student_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/exams/{paper_id}"),
            Some(json!({ "is_published": true })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let response = app
        .request("GET", "/api/exams", None, Some(&student_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_items"], 1);

    // The student projection never exposes the answer key
    let response = app
        .request(
            "GET",
            &format!("/api/exams/{paper_id}"),
            None,
            Some(&student_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let questions = response.body["data"]["questions"]
        .as_array()
        .expect("questions array");
    assert_eq!(questions.len(), 1);
    assert!(questions[0].get("correct_option").is_none());

    // Staff see the full rows
    let response = app
        .request(
            "GET",
            &format!("/api/exams/{paper_id}"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let full = response.body["data"]["full_questions"]
        .as_array()
        .expect("full question rows");
    assert_eq!(full[0]["correct_option"], 1);
}

#[tokio::test]
#[ignore]
async fn admin_can_end_all_sessions_for_a_user() {
    let app = TestApp::connect().await;
    app.create_test_user("admin6@example.com", "S3curePass!", UserRole::Admin)
        .await;
    let target_id = app
        .create_test_user("kickme@example.com", "S3curePass!", UserRole::Student)
        .await;
    let admin_token = app.login("admin6@example.com", "S3curePass!").await;
    let user_token = app.login("kickme@example.com", "S3curePass!").await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/admin/sessions/users/{target_id}"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["count"], 1);

    let response = app
        .request("GET", "/api/users/me", None, Some(&user_token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn session_cleanup_reports_a_count() {
    let app = TestApp::connect().await;
    app.create_test_user("admin7@example.com", "S3curePass!", UserRole::Admin)
        .await;
    let token = app.login("admin7@example.com", "S3curePass!").await;

    let response = app
        .request("POST", "/api/admin/sessions/cleanup", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert!(response.body["data"]["count"].is_u64());
}
