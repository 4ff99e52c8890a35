//! Referral code entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user's shareable referral code.
///
/// Each user owns at most one code. The code string is globally unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReferralCode {
    /// Unique code row identifier.
    pub id: Uuid,
    /// The user who owns this code.
    pub user_id: Uuid,
    /// The shareable 8-character uppercase alphanumeric code.
    pub code: String,
    /// Whether the code can currently be applied.
    pub is_active: bool,
    /// How many referees have applied this code.
    pub usage_count: i32,
    /// Maximum applications allowed. `None` means unlimited.
    pub max_uses: Option<i32>,
    /// When the code was generated.
    pub created_at: DateTime<Utc>,
}

impl ReferralCode {
    /// Check whether the code can still be applied.
    pub fn is_usable(&self) -> bool {
        if !self.is_active {
            return false;
        }
        match self.max_uses {
            Some(max) => self.usage_count < max,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(is_active: bool, usage_count: i32, max_uses: Option<i32>) -> ReferralCode {
        ReferralCode {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            code: "AB12CD34".to_string(),
            is_active,
            usage_count,
            max_uses,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn inactive_code_is_unusable() {
        assert!(!code(false, 0, None).is_usable());
    }

    #[test]
    fn exhausted_code_is_unusable() {
        assert!(code(true, 9, Some(10)).is_usable());
        assert!(!code(true, 10, Some(10)).is_usable());
    }

    #[test]
    fn unlimited_code_never_exhausts() {
        assert!(code(true, 10_000, None).is_usable());
    }
}
