//! Admin session oversight handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use prepdeck_core::types::pagination::{PageRequest, PageResponse};
use prepdeck_entity::session::UserSession;

use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/admin/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<UserSession>>>, ApiError> {
    let page: PageRequest = pagination.into_page_request();
    let sessions = state
        .session_admin_service
        .list_active(auth.context(), &page)
        .await?;
    Ok(Json(ApiResponse::ok(sessions)))
}

/// POST /api/admin/sessions/cleanup
pub async fn cleanup(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.session_admin_service.cleanup(auth.context()).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// DELETE /api/admin/sessions/users/{id}
pub async fn end_user_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state
        .session_admin_service
        .end_user_sessions(auth.context(), user_id)
        .await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}
