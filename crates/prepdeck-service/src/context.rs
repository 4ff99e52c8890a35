//! Request context carrying the authenticated user and session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use prepdeck_core::error::AppError;
use prepdeck_core::result::AppResult;
use prepdeck_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted by the API layer after JWT decoding and session validation,
/// then passed into service methods so that every operation knows *who*
/// is acting and from *which* session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The opaque session token the request authenticated with.
    pub session_token: String,
    /// The user's role at the time the JWT was issued.
    pub role: UserRole,
    /// The user's email (convenience field from JWT claims).
    pub email: Option<String>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: Uuid,
        session_token: String,
        role: UserRole,
        email: Option<String>,
    ) -> Self {
        Self {
            user_id,
            session_token,
            role,
            email,
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fails with an authorization error unless the current user is an admin.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::authorization("Administrator access required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: UserRole) -> RequestContext {
        RequestContext::new(Uuid::new_v4(), "token".to_string(), role, None)
    }

    #[test]
    fn require_admin_rejects_students_and_instructors() {
        assert!(ctx(UserRole::Admin).require_admin().is_ok());
        assert!(ctx(UserRole::Student).require_admin().is_err());
        assert!(ctx(UserRole::Instructor).require_admin().is_err());
    }
}
