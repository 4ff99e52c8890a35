//! Admin exam content handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use prepdeck_core::error::AppError;
use prepdeck_core::types::pagination::{PageRequest, PageResponse};
use prepdeck_entity::exam::{CreateQuestion, ExamPaper, Question};

use crate::dto::request::{AddQuestionBody, CreatePaperBody, PublishBody};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/admin/exams
pub async fn list_papers(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<ExamPaper>>>, ApiError> {
    let page: PageRequest = pagination.into_page_request();
    let papers = state.exam_service.list_all(auth.context(), &page).await?;
    Ok(Json(ApiResponse::ok(papers)))
}

/// POST /api/admin/exams
pub async fn create_paper(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreatePaperBody>,
) -> Result<Json<ApiResponse<ExamPaper>>, ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let paper = state
        .exam_service
        .create_paper(
            auth.context(),
            &body.title,
            body.description,
            &body.subject,
            body.duration_minutes,
        )
        .await?;
    Ok(Json(ApiResponse::ok(paper)))
}

/// PUT /api/admin/exams/{id}
pub async fn set_published(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(paper_id): Path<Uuid>,
    Json(body): Json<PublishBody>,
) -> Result<Json<ApiResponse<ExamPaper>>, ApiError> {
    let paper = state
        .exam_service
        .set_published(auth.context(), paper_id, body.is_published)
        .await?;
    Ok(Json(ApiResponse::ok(paper)))
}

/// DELETE /api/admin/exams/{id}
pub async fn delete_paper(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(paper_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .exam_service
        .delete_paper(auth.context(), paper_id)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Paper deleted"))))
}

/// POST /api/admin/exams/{id}/questions
pub async fn add_question(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(paper_id): Path<Uuid>,
    Json(body): Json<AddQuestionBody>,
) -> Result<Json<ApiResponse<Question>>, ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let question = state
        .exam_service
        .add_question(
            auth.context(),
            CreateQuestion {
                paper_id,
                prompt: body.prompt,
                options: body.options,
                correct_option: body.correct_option,
                marks: body.marks,
                explanation: body.explanation,
                position: body.position,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(question)))
}

/// DELETE /api/admin/questions/{id}
pub async fn delete_question(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(question_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .exam_service
        .delete_question(auth.context(), question_id)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Question deleted",
    ))))
}
