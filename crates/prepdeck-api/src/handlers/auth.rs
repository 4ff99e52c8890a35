//! Auth handlers — registration, login, verification, sessions.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use validator::Validate;

use prepdeck_auth::OtpUsage;
use prepdeck_core::error::AppError;
use prepdeck_entity::otp::{Otp, OtpKind};
use prepdeck_entity::session::UserSession;
use prepdeck_entity::user::User;
use prepdeck_service::auth::service::{
    AuthResponse, ClientInfo, CompleteRegistrationRequest, LoginRequest, RegisterRequest,
};

use crate::dto::request::{
    CompleteRegistrationBody, GoogleOAuthBody, LoginBody, OtpUsageQuery, RegisterBody,
    SendEmailOtpBody, SendPhoneOtpBody, StartRegistrationBody, VerifyEmailBody,
};
use crate::dto::response::{ApiResponse, CountResponse, MessageResponse, OtpIssuedResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Builds client metadata from request headers.
fn client_info(headers: &HeaderMap) -> ClientInfo {
    ClientInfo {
        device_info: headers
            .get("x-device-info")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        ip_address: headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or(v).trim().to_string()),
        user_agent: headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    }
}

fn otp_issued(otp: &Otp) -> OtpIssuedResponse {
    OtpIssuedResponse {
        message: "Verification code sent".to_string(),
        target: otp.target.clone(),
        expires_at: otp.expires_at,
    }
}

fn validated<T: Validate>(body: &T) -> Result<(), ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(())
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    validated(&body)?;
    let user = state
        .auth_service
        .register(RegisterRequest {
            email: body.email,
            password: body.password,
            display_name: body.display_name,
        })
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/auth/start-registration
pub async fn start_registration(
    State(state): State<AppState>,
    Json(body): Json<StartRegistrationBody>,
) -> Result<Json<ApiResponse<OtpIssuedResponse>>, ApiError> {
    validated(&body)?;
    let otp = state.auth_service.start_registration(&body.phone).await?;
    Ok(Json(ApiResponse::ok(otp_issued(&otp))))
}

/// POST /api/auth/complete-registration
pub async fn complete_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CompleteRegistrationBody>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    validated(&body)?;
    let result = state
        .auth_service
        .complete_registration(
            CompleteRegistrationRequest {
                phone: body.phone,
                code: body.code,
                display_name: body.display_name,
                password: body.password,
            },
            client_info(&headers),
        )
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LoginBody>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let result = state
        .auth_service
        .login(
            LoginRequest {
                email: body.email,
                password: body.password,
                phone: body.phone,
                otp_code: body.otp_code,
            },
            client_info(&headers),
        )
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/auth/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    Json(body): Json<VerifyEmailBody>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    validated(&body)?;
    let user = state
        .auth_service
        .verify_email(&body.email, &body.code)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/auth/send-email-otp
pub async fn send_email_otp(
    State(state): State<AppState>,
    Json(body): Json<SendEmailOtpBody>,
) -> Result<Json<ApiResponse<OtpIssuedResponse>>, ApiError> {
    validated(&body)?;
    let otp = state.auth_service.send_email_otp(&body.email).await?;
    Ok(Json(ApiResponse::ok(otp_issued(&otp))))
}

/// POST /api/auth/send-phone-otp
pub async fn send_phone_otp(
    State(state): State<AppState>,
    Json(body): Json<SendPhoneOtpBody>,
) -> Result<Json<ApiResponse<OtpIssuedResponse>>, ApiError> {
    validated(&body)?;
    let otp = state.auth_service.send_phone_otp(&body.phone).await?;
    Ok(Json(ApiResponse::ok(otp_issued(&otp))))
}

/// POST /api/auth/send-login-otp
pub async fn send_login_otp(
    State(state): State<AppState>,
    Json(body): Json<SendPhoneOtpBody>,
) -> Result<Json<ApiResponse<OtpIssuedResponse>>, ApiError> {
    validated(&body)?;
    let otp = state.auth_service.send_login_otp(&body.phone).await?;
    Ok(Json(ApiResponse::ok(otp_issued(&otp))))
}

/// POST /api/auth/oauth/google
pub async fn google_oauth(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<GoogleOAuthBody>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    validated(&body)?;
    let result = state
        .auth_service
        .google_sign_in(&body.code, client_info(&headers))
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/auth/otp-usage-stats?channel=EMAIL|PHONE
pub async fn otp_usage_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OtpUsageQuery>,
) -> Result<Json<ApiResponse<OtpUsage>>, ApiError> {
    let kind = match query.channel.to_uppercase().as_str() {
        "EMAIL" => OtpKind::Email,
        "PHONE" => OtpKind::Phone,
        other => {
            return Err(
                AppError::validation(format!("Unknown channel '{other}', use EMAIL or PHONE"))
                    .into(),
            );
        }
    };
    let usage = state.auth_service.otp_usage(auth.context(), kind).await?;
    Ok(Json(ApiResponse::ok(usage)))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.auth_service.logout(auth.context()).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// POST /api/auth/logout-all-devices
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.auth_service.logout_all(auth.context()).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /api/auth/sessions
pub async fn sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<UserSession>>>, ApiError> {
    let sessions = state.auth_service.sessions(auth.context()).await?;
    Ok(Json(ApiResponse::ok(sessions)))
}
