//! Admin analytics handlers.

use axum::Json;
use axum::extract::{Query, State};

use prepdeck_database::repositories::analytics::DailyCountRow;
use prepdeck_service::analytics::{DashboardOverview, EngagementReport};

use crate::dto::request::SignupSeriesQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/admin/analytics/overview
pub async fn overview(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<DashboardOverview>>, ApiError> {
    let snapshot = state.analytics_service.overview(auth.context()).await?;
    Ok(Json(ApiResponse::ok(snapshot)))
}

/// GET /api/admin/analytics/signups?days=N
pub async fn signups(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SignupSeriesQuery>,
) -> Result<Json<ApiResponse<Vec<DailyCountRow>>>, ApiError> {
    let series = state
        .analytics_service
        .signup_series(auth.context(), query.days)
        .await?;
    Ok(Json(ApiResponse::ok(series)))
}

/// GET /api/admin/analytics/engagement
pub async fn engagement(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<EngagementReport>>, ApiError> {
    let report = state.analytics_service.engagement(auth.context()).await?;
    Ok(Json(ApiResponse::ok(report)))
}
