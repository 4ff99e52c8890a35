//! Admin referral handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use prepdeck_entity::referral::Referral;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/admin/referrals/{referee_id}/complete
///
/// Marks a referral converted once the referee meets the qualifying
/// action, creating rewards for both sides.
pub async fn complete_referral(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(referee_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Referral>>, ApiError> {
    auth.context().require_admin().map_err(ApiError::from)?;
    let referral = state.referral_service.complete_referral(referee_id).await?;
    Ok(Json(ApiResponse::ok(referral)))
}
