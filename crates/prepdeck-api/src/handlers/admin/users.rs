//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use prepdeck_core::types::pagination::{PageRequest, PageResponse};
use prepdeck_entity::user::User;

use crate::dto::request::{AdminUserQuery, UpdateRoleBody, UpdateStatusBody};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AdminUserQuery>,
) -> Result<Json<ApiResponse<PageResponse<User>>>, ApiError> {
    let page = PageRequest::new(query.page, query.per_page);
    let users = state
        .admin_user_service
        .list_users(auth.context(), &page, query.role)
        .await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .admin_user_service
        .get_user(auth.context(), user_id)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/admin/users/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .admin_user_service
        .update_status(auth.context(), user_id, body.status)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/admin/users/{id}/role
pub async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateRoleBody>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .admin_user_service
        .update_role(auth.context(), user_id, body.role)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}
