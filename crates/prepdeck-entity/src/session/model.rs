//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An active user session.
///
/// A session represents one logged-in device. The opaque `token` is
/// embedded in the JWT as a claim, so invalidating the row here takes
/// effect before the JWT itself expires.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSession {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Opaque 64-character hex token (unique).
    #[serde(skip_serializing)]
    pub token: String,
    /// Free-form device description supplied by the client.
    pub device_info: Option<String>,
    /// IP address from which the session was created.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Whether the session is live. Flipped to `false` on logout,
    /// supersession, or the expiry sweep.
    pub is_active: bool,
    /// When the session expires (absolute, not extended by activity).
    pub expires_at: DateTime<Utc>,
    /// Last successful validation time.
    pub last_activity_at: DateTime<Utc>,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
}

impl UserSession {
    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// Check whether the session is live right now.
    pub fn is_valid(&self) -> bool {
        self.is_active && !self.is_expired()
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Opaque hex token.
    pub token: String,
    /// Device description.
    pub device_info: Option<String>,
    /// IP address of the client.
    pub ip_address: Option<String>,
    /// User-Agent header.
    pub user_agent: Option<String>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}
