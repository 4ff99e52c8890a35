//! Lesson progress and badge flows against a live database.

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use prepdeck_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore]
async fn initialize_then_update_tracks_progress() {
    let app = TestApp::connect().await;
    app.create_test_user("student1@example.com", "S3curePass!", UserRole::Student)
        .await;
    let token = app.login("student1@example.com", "S3curePass!").await;
    let lesson_id = Uuid::new_v4();

    let response = app
        .request(
            "POST",
            &format!("/api/student/lesson-progress/{lesson_id}/initialize"),
            Some(json!({ "total_content": 10, "total_topics": 4 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "NOT_STARTED");
    assert_eq!(response.body["data"]["progress"], 0.0);

    let response = app
        .request(
            "POST",
            &format!("/api/student/lesson-progress/{lesson_id}/update"),
            Some(json!({ "content_completed": 5, "time_spent_seconds": 600 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    // 5/10 content at 60% weight, no topics done
    assert_eq!(response.body["data"]["progress"]["progress"], 30.0);
    assert_eq!(response.body["data"]["progress"]["status"], "IN_PROGRESS");

    let response = app
        .request(
            "GET",
            &format!("/api/student/lesson-progress/{lesson_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["content_completed"], 5);
    assert_eq!(response.body["data"]["time_spent_seconds"], 600);
}

#[tokio::test]
#[ignore]
async fn completing_a_lesson_awards_the_completion_badge() {
    let app = TestApp::connect().await;
    app.create_test_user("student2@example.com", "S3curePass!", UserRole::Student)
        .await;
    let token = app.login("student2@example.com", "S3curePass!").await;
    let lesson_id = Uuid::new_v4();

    app.request(
        "POST",
        &format!("/api/student/lesson-progress/{lesson_id}/initialize"),
        Some(json!({ "total_content": 4, "total_topics": 2 })),
        Some(&token),
    )
    .await;

    let response = app
        .request(
            "POST",
            &format!("/api/student/lesson-progress/{lesson_id}/update"),
            Some(json!({
                "content_completed": 4,
                "topics_completed": 2,
                "attempts": 1,
                "time_spent_seconds": 3600,
                "score": 80.0
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["progress"]["progress"], 100.0);
    assert_eq!(response.body["data"]["progress"]["status"], "COMPLETED");
    assert!(
        response.body["data"]["progress"]["completed_at"].is_string(),
        "completed_at must be stamped on completion"
    );

    let new_badges = response.body["data"]["new_badges"]
        .as_array()
        .expect("new_badges array");
    assert!(
        new_badges
            .iter()
            .any(|b| b["badge_type"] == "COMPLETION"),
        "Expected a COMPLETION badge, got: {new_badges:?}"
    );

    // Earned badges endpoint shows the same award
    let response = app
        .request("GET", "/api/student/badges/earned", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response.body["data"]
            .as_array()
            .expect("badges array")
            .iter()
            .any(|b| b["badge_type"] == "COMPLETION")
    );
}

#[tokio::test]
#[ignore]
async fn badges_are_not_awarded_twice() {
    let app = TestApp::connect().await;
    app.create_test_user("student3@example.com", "S3curePass!", UserRole::Student)
        .await;
    let token = app.login("student3@example.com", "S3curePass!").await;
    let lesson_id = Uuid::new_v4();

    app.request(
        "POST",
        &format!("/api/student/lesson-progress/{lesson_id}/initialize"),
        Some(json!({ "total_content": 2, "total_topics": 1 })),
        Some(&token),
    )
    .await;

    let complete = json!({
        "content_completed": 2,
        "topics_completed": 1,
        "time_spent_seconds": 3600
    });
    let first = app
        .request(
            "POST",
            &format!("/api/student/lesson-progress/{lesson_id}/update"),
            Some(complete.clone()),
            Some(&token),
        )
        .await;
    assert!(!first.body["data"]["new_badges"].as_array().unwrap().is_empty());

    let second = app
        .request(
            "POST",
            &format!("/api/student/lesson-progress/{lesson_id}/update"),
            Some(complete),
            Some(&token),
        )
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert!(
        second.body["data"]["new_badges"].as_array().unwrap().is_empty(),
        "Re-reporting a completed lesson must not re-award badges"
    );
}

#[tokio::test]
#[ignore]
async fn negative_update_values_are_rejected() {
    let app = TestApp::connect().await;
    app.create_test_user("student4@example.com", "S3curePass!", UserRole::Student)
        .await;
    let token = app.login("student4@example.com", "S3curePass!").await;
    let lesson_id = Uuid::new_v4();

    let response = app
        .request(
            "POST",
            &format!("/api/student/lesson-progress/{lesson_id}/update"),
            Some(json!({ "content_completed": -1 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn progress_for_unknown_lesson_returns_404() {
    let app = TestApp::connect().await;
    app.create_test_user("student5@example.com", "S3curePass!", UserRole::Student)
        .await;
    let token = app.login("student5@example.com", "S3curePass!").await;

    let response = app
        .request(
            "GET",
            &format!("/api/student/lesson-progress/{}", Uuid::new_v4()),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn leaderboard_ranks_students_by_progress() {
    let app = TestApp::connect().await;
    app.create_test_user("leader1@example.com", "S3curePass!", UserRole::Student)
        .await;
    app.create_test_user("leader2@example.com", "S3curePass!", UserRole::Student)
        .await;
    let lesson_id = Uuid::new_v4();

    for (email, content_done) in [("leader1@example.com", 4), ("leader2@example.com", 1)] {
        let token = app.login(email, "S3curePass!").await;
        app.request(
            "POST",
            &format!("/api/student/lesson-progress/{lesson_id}/initialize"),
            Some(json!({ "total_content": 4, "total_topics": 0 })),
            Some(&token),
        )
        .await;
        app.request(
            "POST",
            &format!("/api/student/lesson-progress/{lesson_id}/update"),
            Some(json!({ "content_completed": content_done })),
            Some(&token),
        )
        .await;
    }

    let token = app.login("leader1@example.com", "S3curePass!").await;
    let response = app
        .request("GET", "/api/student/leaderboard?limit=10", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let rows = response.body["data"].as_array().expect("leaderboard rows");
    assert_eq!(rows.len(), 2);
}
