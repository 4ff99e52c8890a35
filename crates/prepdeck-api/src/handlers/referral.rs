//! Referral handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use prepdeck_core::error::AppError;
use prepdeck_database::repositories::referral::ReferralLeaderboardRow;
use prepdeck_entity::referral::{Referral, ReferralCode};
use prepdeck_service::referral::{ClaimOutcome, MyReferrals};

use crate::dto::request::{ApplyCodeBody, LeaderboardQuery};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/referrals/generate-code
pub async fn generate_code(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<ReferralCode>>, ApiError> {
    let code = state.referral_service.generate_code(auth.context()).await?;
    Ok(Json(ApiResponse::ok(code)))
}

/// POST /api/referrals/apply-code
pub async fn apply_code(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ApplyCodeBody>,
) -> Result<Json<ApiResponse<Referral>>, ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let referral = state
        .referral_service
        .apply_code(auth.context(), &body.code)
        .await?;
    Ok(Json(ApiResponse::ok(referral)))
}

/// GET /api/referrals/me
pub async fn my_referrals(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MyReferrals>>, ApiError> {
    let mine = state.referral_service.my_referrals(auth.context()).await?;
    Ok(Json(ApiResponse::ok(mine)))
}

/// POST /api/referrals/claim-reward/{reward_id}
///
/// Claim rule failures come back as a 200 with `success: false` so the
/// client can show the reason inline.
pub async fn claim_reward(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(reward_id): Path<Uuid>,
) -> Result<Json<ClaimOutcome>, ApiError> {
    let outcome = state
        .referral_service
        .claim_reward(auth.context(), reward_id)
        .await?;
    Ok(Json(outcome))
}

/// GET /api/referrals/leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<ApiResponse<Vec<ReferralLeaderboardRow>>>, ApiError> {
    let rows = state.referral_service.leaderboard(query.limit).await?;
    Ok(Json(ApiResponse::ok(rows)))
}
