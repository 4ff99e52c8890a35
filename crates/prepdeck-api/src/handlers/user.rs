//! User self-service handlers.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use prepdeck_core::error::AppError;
use prepdeck_entity::user::User;

use crate::dto::request::{
    ChangePasswordBody, ConfirmCodeBody, EmailChangeBody, PhoneChangeBody, UpdateProfileBody,
};
use crate::dto::response::{ApiResponse, MessageResponse, OtpIssuedResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.user_service.me(auth.context()).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/users/me
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpdateProfileBody>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .user_service
        .update_me(auth.context(), body.display_name)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/users/me/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ChangePasswordBody>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    state
        .user_service
        .change_password(
            auth.context(),
            body.current_password.as_deref(),
            &body.new_password,
        )
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password changed",
    ))))
}

/// POST /api/users/me/email-change/request
pub async fn request_email_change(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<EmailChangeBody>,
) -> Result<Json<ApiResponse<OtpIssuedResponse>>, ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let otp = state
        .user_service
        .request_email_change(auth.context(), &body.new_email)
        .await?;
    Ok(Json(ApiResponse::ok(OtpIssuedResponse {
        message: "Verification code sent to the new address".to_string(),
        target: otp.target.clone(),
        expires_at: otp.expires_at,
    })))
}

/// POST /api/users/me/email-change/confirm
pub async fn confirm_email_change(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ConfirmCodeBody>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let user = state
        .user_service
        .confirm_email_change(auth.context(), &body.code)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/users/me/phone-change/request
pub async fn request_phone_change(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<PhoneChangeBody>,
) -> Result<Json<ApiResponse<OtpIssuedResponse>>, ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let otp = state
        .user_service
        .request_phone_change(auth.context(), &body.new_phone)
        .await?;
    Ok(Json(ApiResponse::ok(OtpIssuedResponse {
        message: "Verification code sent to the new number".to_string(),
        target: otp.target.clone(),
        expires_at: otp.expires_at,
    })))
}

/// POST /api/users/me/phone-change/confirm
pub async fn confirm_phone_change(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ConfirmCodeBody>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let user = state
        .user_service
        .confirm_phone_change(auth.context(), &body.code)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}
