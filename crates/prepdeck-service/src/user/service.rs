//! Profile self-service: the `me` surface.
//!
//! Email and phone changes are two-step: an OTP is sent to the NEW
//! address under a change-specific channel, and the switch happens only
//! when that code verifies. The old address keeps working until then.

use std::sync::Arc;

use tracing::info;

use prepdeck_auth::{OtpEngine, PasswordHasher, PasswordValidator};
use prepdeck_core::error::AppError;
use prepdeck_core::result::AppResult;
use prepdeck_database::repositories::UserRepository;
use prepdeck_entity::otp::{Otp, OtpKind};
use prepdeck_entity::user::{UpdateUser, User};

use crate::context::RequestContext;

/// Handles profile reads and self-service updates.
#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    otp_engine: Arc<OtpEngine>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        otp_engine: Arc<OtpEngine>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            user_repo,
            otp_engine,
            hasher,
            validator,
        }
    }

    /// Returns the current user's profile.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<User> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the current user's display name.
    pub async fn update_me(
        &self,
        ctx: &RequestContext,
        display_name: Option<String>,
    ) -> AppResult<User> {
        self.user_repo
            .update(&UpdateUser {
                id: ctx.user_id,
                email: None,
                phone: None,
                display_name,
            })
            .await
    }

    /// Changes the current user's password.
    ///
    /// Accounts without a password (OAuth or phone-only) may set one
    /// without providing a current password.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: Option<&str>,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.me(ctx).await?;

        if let Some(hash) = user.password_hash.as_deref() {
            let current = current_password
                .ok_or_else(|| AppError::validation("Current password is required"))?;
            if !self.hasher.verify_password(current, hash)? {
                return Err(AppError::authentication("Current password is incorrect"));
            }
        }

        self.validator.validate(new_password)?;
        let new_hash = self.hasher.hash_password(new_password)?;
        self.user_repo.update_password(user.id, &new_hash).await?;
        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Starts an email change by sending a code to the new address.
    pub async fn request_email_change(
        &self,
        ctx: &RequestContext,
        new_email: &str,
    ) -> AppResult<Otp> {
        let new_email = new_email.trim().to_lowercase();
        if let Some(existing) = self.user_repo.find_by_email(&new_email).await?
            && existing.id != ctx.user_id
        {
            return Err(AppError::conflict("Email is already in use"));
        }

        self.otp_engine
            .issue(&ctx.user_id.to_string(), OtpKind::EmailChange, &new_email)
            .await
    }

    /// Confirms an email change with the code sent to the new address.
    ///
    /// The new address comes from the OTP row's target, so the confirmed
    /// address is exactly the one the code was delivered to.
    pub async fn confirm_email_change(&self, ctx: &RequestContext, code: &str) -> AppResult<User> {
        let target = self
            .verified_change_target(ctx, code, OtpKind::EmailChange)
            .await?;
        self.user_repo.change_email(ctx.user_id, &target).await?;
        info!(user_id = %ctx.user_id, "Email changed");
        self.me(ctx).await
    }

    /// Starts a phone change by sending a code to the new number.
    pub async fn request_phone_change(
        &self,
        ctx: &RequestContext,
        new_phone: &str,
    ) -> AppResult<Otp> {
        let new_phone: String = new_phone.chars().filter(|c| !c.is_whitespace()).collect();
        if let Some(existing) = self.user_repo.find_by_phone(&new_phone).await?
            && existing.id != ctx.user_id
        {
            return Err(AppError::conflict("Phone number is already in use"));
        }

        self.otp_engine
            .issue(&ctx.user_id.to_string(), OtpKind::PhoneChange, &new_phone)
            .await
    }

    /// Confirms a phone change with the code sent to the new number.
    pub async fn confirm_phone_change(&self, ctx: &RequestContext, code: &str) -> AppResult<User> {
        let target = self
            .verified_change_target(ctx, code, OtpKind::PhoneChange)
            .await?;
        self.user_repo.change_phone(ctx.user_id, &target).await?;
        info!(user_id = %ctx.user_id, "Phone number changed");
        self.me(ctx).await
    }

    /// Verifies a change code and returns the target it was sent to.
    async fn verified_change_target(
        &self,
        ctx: &RequestContext,
        code: &str,
        kind: OtpKind,
    ) -> AppResult<String> {
        let otp = self
            .otp_engine
            .verify(&ctx.user_id.to_string(), code, kind)
            .await?;
        Ok(otp.target)
    }
}
