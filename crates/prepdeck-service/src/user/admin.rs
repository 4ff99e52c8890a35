//! Admin user management.

use std::sync::Arc;

use tracing::info;

use prepdeck_core::error::AppError;
use prepdeck_core::result::AppResult;
use prepdeck_core::types::pagination::{PageRequest, PageResponse};
use prepdeck_database::repositories::UserRepository;
use prepdeck_entity::user::{User, UserRole, UserStatus};
use uuid::Uuid;

use crate::context::RequestContext;

/// Admin operations over user accounts.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    user_repo: Arc<UserRepository>,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Lists users, optionally filtered by role.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
        role: Option<UserRole>,
    ) -> AppResult<PageResponse<User>> {
        ctx.require_admin()?;
        match role {
            Some(role) => self.user_repo.find_by_role(role, page).await,
            None => self.user_repo.find_all(page).await,
        }
    }

    /// Returns one user by ID.
    pub async fn get_user(&self, ctx: &RequestContext, user_id: Uuid) -> AppResult<User> {
        ctx.require_admin()?;
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Changes a user's account status.
    ///
    /// Suspending an account blocks new logins; live sessions end at
    /// their natural expiry or via the admin session endpoints.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        status: UserStatus,
    ) -> AppResult<User> {
        ctx.require_admin()?;
        if user_id == ctx.user_id && status == UserStatus::Suspended {
            return Err(AppError::validation("You cannot suspend your own account"));
        }
        let user = self.user_repo.update_status(user_id, status).await?;
        info!(admin_id = %ctx.user_id, user_id = %user_id, status = %status, "User status changed");
        Ok(user)
    }

    /// Changes a user's role.
    pub async fn update_role(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        role: UserRole,
    ) -> AppResult<User> {
        ctx.require_admin()?;
        if user_id == ctx.user_id && role != UserRole::Admin {
            return Err(AppError::validation("You cannot demote your own account"));
        }
        let user = self.user_repo.update_role(user_id, role).await?;
        info!(admin_id = %ctx.user_id, user_id = %user_id, role = ?role, "User role changed");
        Ok(user)
    }
}
