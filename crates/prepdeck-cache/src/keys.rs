//! Cache key builders for all Prepdeck cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses. Keys are unprefixed here;
//! the Redis provider applies the configured namespace prefix.

use uuid::Uuid;

// ── OAuth keys ─────────────────────────────────────────────

/// Guard key for a Google authorization code that is being exchanged.
///
/// Written with set-if-absent so that concurrent logins with the same
/// code collapse into a single exchange.
pub fn oauth_code_guard(code: &str) -> String {
    format!("oauth:code:{code}")
}

// ── Analytics keys ─────────────────────────────────────────

/// Cache key for the admin dashboard snapshot.
pub fn admin_dashboard() -> String {
    "analytics:dashboard".to_string()
}

// ── Leaderboard keys ───────────────────────────────────────

/// Cache key for the lesson progress leaderboard.
pub fn progress_leaderboard(limit: i64) -> String {
    format!("leaderboard:progress:{limit}")
}

/// Cache key for the badge leaderboard.
pub fn badge_leaderboard(limit: i64) -> String {
    format!("leaderboard:badges:{limit}")
}

/// Cache key for the referral leaderboard.
pub fn referral_leaderboard(limit: i64) -> String {
    format!("leaderboard:referrals:{limit}")
}

// ── Badge keys ─────────────────────────────────────────────

/// Cache key for the badge list of a user, invalidated on award.
pub fn user_badges(user_id: Uuid) -> String {
    format!("badges:user:{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oauth_code_guard_key() {
        assert_eq!(oauth_code_guard("4/abc123"), "oauth:code:4/abc123");
    }

    #[test]
    fn test_user_badges_key() {
        let id = Uuid::nil();
        assert_eq!(
            user_badges(id),
            "badges:user:00000000-0000-0000-0000-000000000000"
        );
    }
}
