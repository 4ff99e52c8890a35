//! Student lesson progress and badge handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use prepdeck_database::repositories::lesson_progress::LeaderboardRow;
use prepdeck_entity::lesson::{LessonBadge, LessonProgress, ProgressUpdate};
use prepdeck_service::lesson::ProgressReport;

use crate::dto::request::{BadgeQuery, InitializeProgressBody, LeaderboardQuery};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/student/lesson-progress/{lesson_id}/initialize
pub async fn initialize_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(lesson_id): Path<Uuid>,
    Json(body): Json<InitializeProgressBody>,
) -> Result<Json<ApiResponse<LessonProgress>>, ApiError> {
    let progress = state
        .lesson_service
        .initialize(
            auth.context(),
            lesson_id,
            body.total_content,
            body.total_topics,
        )
        .await?;
    Ok(Json(ApiResponse::ok(progress)))
}

/// POST /api/student/lesson-progress/{lesson_id}/update
pub async fn update_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(lesson_id): Path<Uuid>,
    Json(update): Json<ProgressUpdate>,
) -> Result<Json<ApiResponse<ProgressReport>>, ApiError> {
    let report = state
        .lesson_service
        .record_progress(auth.context(), lesson_id, &update)
        .await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// GET /api/student/lesson-progress
pub async fn my_progress(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<LessonProgress>>>, ApiError> {
    let progress = state.lesson_service.my_progress(auth.context()).await?;
    Ok(Json(ApiResponse::ok(progress)))
}

/// GET /api/student/lesson-progress/{lesson_id}
pub async fn lesson_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<ApiResponse<LessonProgress>>, ApiError> {
    let progress = state
        .lesson_service
        .progress(auth.context(), lesson_id)
        .await?;
    Ok(Json(ApiResponse::ok(progress)))
}

/// GET /api/student/badges/earned[?lesson_id]
pub async fn earned_badges(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<BadgeQuery>,
) -> Result<Json<ApiResponse<Vec<LessonBadge>>>, ApiError> {
    let badges = state
        .lesson_service
        .earned_badges(auth.context(), query.lesson_id)
        .await?;
    Ok(Json(ApiResponse::ok(badges)))
}

/// GET /api/student/leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<ApiResponse<Vec<LeaderboardRow>>>, ApiError> {
    let rows = state.lesson_service.leaderboard(query.limit).await?;
    Ok(Json(ApiResponse::ok(rows)))
}
