//! Subscription and plan handlers.

use axum::Json;
use axum::extract::State;

use prepdeck_entity::subscription::Plan;
use prepdeck_service::subscription::SubscriptionOverview;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/subscriptions/me
pub async fn my_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<SubscriptionOverview>>, ApiError> {
    let overview = state
        .subscription_service
        .my_subscription(auth.context())
        .await?;
    Ok(Json(ApiResponse::ok(overview)))
}

/// GET /api/plans
pub async fn plans(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Plan>>>, ApiError> {
    let plans = state.subscription_service.plans().await?;
    Ok(Json(ApiResponse::ok(plans)))
}
