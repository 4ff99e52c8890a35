//! Registration, login, and verification flows.
//!
//! All flows that end in a logged-in user converge on
//! [`AuthService::establish_session`]: session row first, then the JWT
//! that embeds the session token, then the last-login stamp.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use prepdeck_auth::{
    GoogleOAuth, JwtEncoder, OtpEngine, OtpUsage, PasswordHasher, PasswordValidator,
    SessionManager,
};
use prepdeck_core::error::AppError;
use prepdeck_core::result::AppResult;
use prepdeck_database::repositories::UserRepository;
use prepdeck_entity::otp::{Otp, OtpKind};
use prepdeck_entity::session::UserSession;
use prepdeck_entity::user::{CreateUser, User, UserRole, UserStatus};

use crate::context::RequestContext;

/// Client metadata captured at login time, before any context exists.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ClientInfo {
    /// Free-form device description reported by the client.
    pub device_info: Option<String>,
    /// IP address of the request origin.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
}

/// Result of a flow that ends with a logged-in user.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthResponse {
    /// Signed bearer token embedding the session token.
    pub access_token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// The authenticated user.
    pub user: User,
}

/// Data for email registration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegisterRequest {
    /// Email address to register with.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Optional display name.
    pub display_name: Option<String>,
}

/// Data for completing a phone registration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CompleteRegistrationRequest {
    /// Phone number the code was sent to.
    pub phone: String,
    /// The verification code.
    pub code: String,
    /// Optional display name.
    pub display_name: Option<String>,
    /// Optional password; phone-only accounts may log in by code alone.
    pub password: Option<String>,
}

/// Data for login. Either `email`+`password` or `phone`+`otp_code`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    /// Email address, for password login.
    pub email: Option<String>,
    /// Password, for password login.
    pub password: Option<String>,
    /// Phone number, for code login.
    pub phone: Option<String>,
    /// One-time code, for code login.
    pub otp_code: Option<String>,
}

/// Handles registration, login, verification, and session operations.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// One-time password engine.
    otp_engine: Arc<OtpEngine>,
    /// Session lifecycle manager.
    sessions: Arc<SessionManager>,
    /// JWT encoder.
    jwt_encoder: Arc<JwtEncoder>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password validator.
    validator: Arc<PasswordValidator>,
    /// Google OAuth client.
    google: Arc<GoogleOAuth>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        otp_engine: Arc<OtpEngine>,
        sessions: Arc<SessionManager>,
        jwt_encoder: Arc<JwtEncoder>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        google: Arc<GoogleOAuth>,
    ) -> Self {
        Self {
            user_repo,
            otp_engine,
            sessions,
            jwt_encoder,
            hasher,
            validator,
            google,
        }
    }

    /// Registers a new email account.
    ///
    /// The account starts PENDING and cannot log in until the email is
    /// verified; a verification code is dispatched to the address.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<User> {
        let email = normalize_email(&req.email);
        validate_email(&email)?;
        self.validator.validate(&req.password)?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let password_hash = self.hasher.hash_password(&req.password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                email: Some(email.clone()),
                phone: None,
                password_hash: Some(password_hash),
                display_name: req.display_name,
                role: UserRole::Student,
                status: UserStatus::Pending,
                google_id: None,
            })
            .await?;

        info!(user_id = %user.id, "User registered, pending email verification");

        self.otp_engine
            .issue(&user.id.to_string(), OtpKind::Email, &email)
            .await?;

        Ok(user)
    }

    /// Verifies a registration email code and activates the account.
    pub async fn verify_email(&self, email: &str, code: &str) -> AppResult<User> {
        let email = normalize_email(email);
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid verification code"))?;

        self.otp_engine
            .verify(&user.id.to_string(), code, OtpKind::Email)
            .await?;

        self.user_repo.mark_email_verified(user.id).await?;
        let user = if user.status == UserStatus::Pending {
            self.user_repo
                .update_status(user.id, UserStatus::Active)
                .await?
        } else {
            user
        };

        info!(user_id = %user.id, "Email verified");
        Ok(user)
    }

    /// Starts a phone registration by sending a code to an unregistered
    /// number.
    ///
    /// No account exists yet, so the issuance is keyed off the phone
    /// number itself and runs under the tighter anonymous limits.
    pub async fn start_registration(&self, phone: &str) -> AppResult<Otp> {
        let phone = normalize_phone(phone);
        validate_phone(&phone)?;

        if self.user_repo.find_by_phone(&phone).await?.is_some() {
            return Err(AppError::conflict("Phone number is already registered"));
        }

        self.otp_engine
            .issue(&Otp::anonymous_owner(&phone), OtpKind::Phone, &phone)
            .await
    }

    /// Completes a phone registration: verifies the code, creates the
    /// account, and logs the new user in.
    pub async fn complete_registration(
        &self,
        req: CompleteRegistrationRequest,
        client: ClientInfo,
    ) -> AppResult<AuthResponse> {
        let phone = normalize_phone(&req.phone);
        validate_phone(&phone)?;

        self.otp_engine
            .verify(&Otp::anonymous_owner(&phone), &req.code, OtpKind::Phone)
            .await?;

        if self.user_repo.find_by_phone(&phone).await?.is_some() {
            return Err(AppError::conflict("Phone number is already registered"));
        }

        let password_hash = match &req.password {
            Some(password) => {
                self.validator.validate(password)?;
                Some(self.hasher.hash_password(password)?)
            }
            None => None,
        };

        let user = self
            .user_repo
            .create(&CreateUser {
                email: None,
                phone: Some(phone),
                password_hash,
                display_name: req.display_name,
                role: UserRole::Student,
                status: UserStatus::Active,
                google_id: None,
            })
            .await?;
        self.user_repo.mark_phone_verified(user.id).await?;

        info!(user_id = %user.id, "Phone registration completed");

        self.establish_session(user, client).await
    }

    /// Logs a user in with email+password or phone+code.
    pub async fn login(&self, req: LoginRequest, client: ClientInfo) -> AppResult<AuthResponse> {
        match (&req.email, &req.password, &req.phone, &req.otp_code) {
            (Some(email), Some(password), _, _) => {
                self.login_with_password(email, password, client).await
            }
            (_, _, Some(phone), Some(code)) => self.login_with_code(phone, code, client).await,
            _ => Err(AppError::validation(
                "Provide email and password, or phone and code",
            )),
        }
    }

    async fn login_with_password(
        &self,
        email: &str,
        password: &str,
        client: ClientInfo,
    ) -> AppResult<AuthResponse> {
        let email = normalize_email(email);
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid email or password"))?;

        let Some(hash) = user.password_hash.as_deref() else {
            return Err(AppError::authentication("Invalid email or password"));
        };
        if !self.hasher.verify_password(password, hash)? {
            return Err(AppError::authentication("Invalid email or password"));
        }

        check_login_allowed(&user)?;
        self.establish_session(user, client).await
    }

    async fn login_with_code(
        &self,
        phone: &str,
        code: &str,
        client: ClientInfo,
    ) -> AppResult<AuthResponse> {
        let phone = normalize_phone(phone);
        let user = self
            .user_repo
            .find_by_phone(&phone)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid phone number or code"))?;

        self.otp_engine
            .verify(&user.id.to_string(), code, OtpKind::Phone)
            .await?;

        check_login_allowed(&user)?;
        self.establish_session(user, client).await
    }

    /// Sends an email verification code to a registered address.
    pub async fn send_email_otp(&self, email: &str) -> AppResult<Otp> {
        let email = normalize_email(email);
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found("No account found for this email"))?;

        self.otp_engine
            .issue(&user.id.to_string(), OtpKind::Email, &email)
            .await
    }

    /// Sends a phone verification code to a registered number.
    pub async fn send_phone_otp(&self, phone: &str) -> AppResult<Otp> {
        let phone = normalize_phone(phone);
        let user = self
            .user_repo
            .find_by_phone(&phone)
            .await?
            .ok_or_else(|| AppError::not_found("No account found for this phone number"))?;

        self.otp_engine
            .issue(&user.id.to_string(), OtpKind::Phone, &phone)
            .await
    }

    /// Sends a login code to a registered number.
    ///
    /// Same kind as phone verification; the code is consumed by the
    /// phone+code login arm.
    pub async fn send_login_otp(&self, phone: &str) -> AppResult<Otp> {
        self.send_phone_otp(phone).await
    }

    /// Signs a user in via a Google authorization code.
    ///
    /// Matches an existing account by Google ID first, then by email
    /// (linking the Google ID); otherwise creates a fresh ACTIVE account.
    pub async fn google_sign_in(&self, code: &str, client: ClientInfo) -> AppResult<AuthResponse> {
        let profile = self.google.exchange_code(code).await?;

        if let Some(user) = self.user_repo.find_by_google_id(&profile.id).await? {
            check_login_allowed(&user)?;
            return self.establish_session(user, client).await;
        }

        let email = normalize_email(&profile.email);
        if let Some(user) = self.user_repo.find_by_email(&email).await? {
            check_login_allowed(&user)?;
            self.user_repo.link_google_id(user.id, &profile.id).await?;
            if profile.verified_email && !user.email_verified {
                self.user_repo.mark_email_verified(user.id).await?;
            }
            info!(user_id = %user.id, "Linked Google account");
            return self.establish_session(user, client).await;
        }

        let user = self
            .user_repo
            .create(&CreateUser {
                email: Some(email),
                phone: None,
                password_hash: None,
                display_name: profile.name.clone(),
                role: UserRole::Student,
                status: UserStatus::Active,
                google_id: Some(profile.id.clone()),
            })
            .await?;
        if profile.verified_email {
            self.user_repo.mark_email_verified(user.id).await?;
        }

        info!(user_id = %user.id, "User created via Google sign-in");
        self.establish_session(user, client).await
    }

    /// Logs out the current device.
    pub async fn logout(&self, ctx: &RequestContext) -> AppResult<()> {
        self.sessions.invalidate(&ctx.session_token).await?;
        info!(user_id = %ctx.user_id, "Logged out");
        Ok(())
    }

    /// Logs out every device. Returns the number of sessions ended.
    pub async fn logout_all(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.sessions.invalidate_all(ctx.user_id).await
    }

    /// Lists the current user's live sessions.
    pub async fn sessions(&self, ctx: &RequestContext) -> AppResult<Vec<UserSession>> {
        self.sessions.list_active(ctx.user_id).await
    }

    /// Reports the current user's code-request usage for a channel.
    pub async fn otp_usage(&self, ctx: &RequestContext, kind: OtpKind) -> AppResult<OtpUsage> {
        self.otp_engine
            .usage_stats(&ctx.user_id.to_string(), kind)
            .await
    }

    /// Creates a session and JWT for an authenticated user.
    async fn establish_session(&self, user: User, client: ClientInfo) -> AppResult<AuthResponse> {
        let session = self
            .sessions
            .create(
                &user,
                client.device_info,
                client.ip_address,
                client.user_agent,
            )
            .await?;
        let token = self.jwt_encoder.generate_token(&user, &session.token)?;

        self.user_repo.update_last_login(user.id).await?;
        info!(user_id = %user.id, session_id = %session.id, "Login successful");

        Ok(AuthResponse {
            access_token: token.access_token,
            expires_at: token.expires_at,
            user,
        })
    }
}

/// Rejects logins for accounts that are not ACTIVE.
fn check_login_allowed(user: &User) -> AppResult<()> {
    match user.status {
        UserStatus::Active => Ok(()),
        UserStatus::Pending => Err(AppError::authentication(
            "Account is not verified yet. Check your email for the verification code.",
        )),
        UserStatus::Suspended => Err(AppError::authorization("Account is suspended")),
    }
}

/// Lowercases and trims an email address.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Strips whitespace from a phone number.
fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Checks the minimal shape of an email address.
fn validate_email(email: &str) -> AppResult<()> {
    let valid = email.contains('@')
        && !email.starts_with('@')
        && !email.ends_with('@')
        && email.rsplit('@').next().is_some_and(|d| d.contains('.'));
    if valid {
        Ok(())
    } else {
        Err(AppError::validation("Invalid email format"))
    }
}

/// Checks an E.164-style phone number: optional `+`, 8 to 15 digits.
fn validate_phone(phone: &str) -> AppResult<()> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let valid = (8..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(AppError::validation("Invalid phone number format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_requires_domain_dot() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("user@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("no-at-sign").is_err());
    }

    #[test]
    fn email_normalization_lowercases() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }

    #[test]
    fn phone_validation_accepts_e164() {
        assert!(validate_phone("+84912345678").is_ok());
        assert!(validate_phone("0912345678").is_ok());
        assert!(validate_phone("+1-555-0100").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("+1234567890123456").is_err());
    }

    #[test]
    fn phone_normalization_strips_spaces() {
        assert_eq!(normalize_phone(" +84 912 345 678 "), "+84912345678");
    }

    #[test]
    fn pending_accounts_cannot_log_in() {
        let mut user = test_user();
        assert!(check_login_allowed(&user).is_ok());
        user.status = UserStatus::Pending;
        let err = check_login_allowed(&user).unwrap_err();
        assert_eq!(err.kind, prepdeck_core::error::ErrorKind::Authentication);
        user.status = UserStatus::Suspended;
        let err = check_login_allowed(&user).unwrap_err();
        assert_eq!(err.kind, prepdeck_core::error::ErrorKind::Authorization);
    }

    fn test_user() -> User {
        User {
            id: uuid::Uuid::new_v4(),
            email: Some("student@example.com".to_string()),
            phone: None,
            password_hash: None,
            display_name: None,
            role: UserRole::Student,
            status: UserStatus::Active,
            email_verified: true,
            phone_verified: false,
            google_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        }
    }
}
