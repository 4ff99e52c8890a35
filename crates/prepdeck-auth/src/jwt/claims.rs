//! JWT claims structure used in access tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use prepdeck_entity::user::UserRole;

/// JWT claims payload embedded in every access token.
///
/// The `sessionId` claim carries the opaque database session token, so a
/// token for a student can be rejected before its own expiry once the
/// session it references is deactivated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user ID.
    pub sub: Uuid,
    /// Email at the time of token issuance, if the account has one.
    pub email: Option<String>,
    /// User role at the time of token issuance.
    pub role: UserRole,
    /// Opaque session token this JWT is bound to.
    #[serde(rename = "sessionId")]
    pub session_id: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the bound session token.
    pub fn session_token(&self) -> &str {
        &self.session_id
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
