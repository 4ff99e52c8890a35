//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in hours from moment of issue.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Interval for expired session cleanup in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
    /// Whether student accounts are limited to one active session.
    #[serde(default = "default_true")]
    pub single_session_students: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            cleanup_interval_minutes: default_cleanup_interval(),
            single_session_students: true,
        }
    }
}

fn default_ttl_hours() -> u64 {
    24
}

fn default_cleanup_interval() -> u64 {
    60
}

fn default_true() -> bool {
    true
}
