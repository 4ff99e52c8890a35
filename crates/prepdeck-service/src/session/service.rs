//! Admin operations over live sessions.

use std::sync::Arc;

use tracing::info;

use prepdeck_auth::SessionManager;
use prepdeck_core::result::AppResult;
use prepdeck_core::types::pagination::{PageRequest, PageResponse};
use prepdeck_database::repositories::SessionRepository;
use prepdeck_entity::session::UserSession;
use uuid::Uuid;

use crate::context::RequestContext;

/// Admin visibility and control over sessions platform-wide.
#[derive(Debug, Clone)]
pub struct SessionAdminService {
    session_repo: Arc<SessionRepository>,
    sessions: Arc<SessionManager>,
}

impl SessionAdminService {
    /// Creates a new session admin service.
    pub fn new(session_repo: Arc<SessionRepository>, sessions: Arc<SessionManager>) -> Self {
        Self {
            session_repo,
            sessions,
        }
    }

    /// Lists all live sessions, paginated.
    pub async fn list_active(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<UserSession>> {
        ctx.require_admin()?;
        self.session_repo.list_active(page).await
    }

    /// Ends every session of one user. Returns the number ended.
    pub async fn end_user_sessions(&self, ctx: &RequestContext, user_id: Uuid) -> AppResult<u64> {
        ctx.require_admin()?;
        let ended = self.sessions.invalidate_all(user_id).await?;
        info!(admin_id = %ctx.user_id, user_id = %user_id, ended, "User sessions ended by admin");
        Ok(ended)
    }

    /// Runs the expiry sweep on demand. Returns the number of sessions
    /// flipped inactive; the hourly job runs the same sweep.
    pub async fn cleanup(&self, ctx: &RequestContext) -> AppResult<u64> {
        ctx.require_admin()?;
        let swept = self.sessions.cleanup_expired().await?;
        info!(admin_id = %ctx.user_id, swept, "Session cleanup run by admin");
        Ok(swept)
    }
}
