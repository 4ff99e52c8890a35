//! Session creation, validation, and invalidation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;
use tracing::{debug, info};
use uuid::Uuid;

use prepdeck_core::config::SessionConfig;
use prepdeck_core::result::AppResult;
use prepdeck_database::repositories::SessionRepository;
use prepdeck_entity::session::model::CreateSession;
use prepdeck_entity::session::UserSession;
use prepdeck_entity::user::User;

/// Manages the session lifecycle.
///
/// A session is one logged-in device: created at login, touched on every
/// validated request, and deactivated by logout, supersession, or the
/// expiry sweep. Students hold at most one live session; creating a new
/// one deactivates the rest. Expiry is absolute from creation; activity
/// updates `last_activity_at` but never extends `expires_at`.
#[derive(Debug, Clone)]
pub struct SessionManager {
    repo: Arc<SessionRepository>,
    config: SessionConfig,
}

impl SessionManager {
    /// Creates a manager from session configuration and the repository.
    pub fn new(config: SessionConfig, repo: Arc<SessionRepository>) -> Self {
        Self { repo, config }
    }

    /// Creates a session for a user who just authenticated.
    ///
    /// For students this first deactivates every other live session, so
    /// a login on a new device logs the old one out. The deactivate and
    /// insert are separate statements; a concurrent login can briefly
    /// leave two live rows, which the next login's sweep resolves.
    pub async fn create(
        &self,
        user: &User,
        device_info: Option<String>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<UserSession> {
        if self.config.single_session_students && user.role.is_single_session() {
            let superseded = self.repo.deactivate_all_for_user(user.id).await?;
            if superseded > 0 {
                debug!(user_id = %user.id, superseded, "Superseded previous student sessions");
            }
        }

        let session = self
            .repo
            .create(&CreateSession {
                user_id: user.id,
                token: generate_token(),
                device_info,
                ip_address,
                user_agent,
                expires_at: Utc::now() + Duration::hours(self.config.ttl_hours as i64),
            })
            .await?;

        info!(user_id = %user.id, session_id = %session.id, "Session created");
        Ok(session)
    }

    /// Looks up a session by token and checks it is live.
    ///
    /// Returns `None` for unknown, deactivated, or expired tokens. On a
    /// live session the last-activity timestamp is touched; invalid
    /// sessions are never touched.
    pub async fn validate(&self, token: &str) -> AppResult<Option<UserSession>> {
        let Some(session) = self.repo.find_by_token(token).await? else {
            return Ok(None);
        };

        if !session.is_valid() {
            return Ok(None);
        }

        self.repo.touch_last_activity(session.id).await?;
        Ok(Some(session))
    }

    /// Deactivates a single session (logout of one device).
    ///
    /// Returns whether a live session was actually deactivated.
    pub async fn invalidate(&self, token: &str) -> AppResult<bool> {
        self.repo.deactivate_by_token(token).await
    }

    /// Deactivates every live session for a user (logout everywhere).
    pub async fn invalidate_all(&self, user_id: Uuid) -> AppResult<u64> {
        let count = self.repo.deactivate_all_for_user(user_id).await?;
        info!(user_id = %user_id, count, "Deactivated all sessions for user");
        Ok(count)
    }

    /// Lists the user's live sessions, most recently active first.
    pub async fn list_active(&self, user_id: Uuid) -> AppResult<Vec<UserSession>> {
        self.repo.find_active_by_user(user_id).await
    }

    /// Flips expired sessions to inactive. Run periodically by the worker.
    pub async fn cleanup_expired(&self) -> AppResult<u64> {
        let count = self.repo.deactivate_expired().await?;
        if count > 0 {
            info!(count, "Deactivated expired sessions");
        }
        Ok(count)
    }
}

/// Generates the opaque 256-bit session token as lowercase hex.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }
}
