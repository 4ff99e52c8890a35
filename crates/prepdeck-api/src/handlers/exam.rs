//! Exam browsing handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use prepdeck_core::types::pagination::{PageRequest, PageResponse};
use prepdeck_entity::exam::ExamPaper;
use prepdeck_service::exam::PaperWithQuestions;

use crate::dto::request::ExamListQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/exams
pub async fn list_exams(
    State(state): State<AppState>,
    Query(query): Query<ExamListQuery>,
) -> Result<Json<ApiResponse<PageResponse<ExamPaper>>>, ApiError> {
    let page = PageRequest::new(query.page, query.per_page);
    let papers = state
        .exam_service
        .list_published(&page, query.subject.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(papers)))
}

/// GET /api/exams/{id}
pub async fn get_exam(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(paper_id): Path<Uuid>,
) -> Result<Json<ApiResponse<PaperWithQuestions>>, ApiError> {
    let paper = state
        .exam_service
        .get_paper(auth.context(), paper_id)
        .await?;
    Ok(Json(ApiResponse::ok(paper)))
}
