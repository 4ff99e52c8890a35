//! Referral program configuration.

use serde::{Deserialize, Serialize};

/// Referral program configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralConfig {
    /// Length of generated referral codes.
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    /// Subscription days granted to the referrer on completion.
    #[serde(default = "default_referrer_days")]
    pub referrer_reward_days: i64,
    /// Subscription days granted to the referred user on completion.
    #[serde(default = "default_referred_days")]
    pub referred_reward_days: i64,
    /// Days an unclaimed reward remains claimable.
    #[serde(default = "default_expiry_days")]
    pub reward_expiry_days: i64,
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            referrer_reward_days: default_referrer_days(),
            referred_reward_days: default_referred_days(),
            reward_expiry_days: default_expiry_days(),
        }
    }
}

fn default_code_length() -> usize {
    8
}

fn default_referrer_days() -> i64 {
    7
}

fn default_referred_days() -> i64 {
    3
}

fn default_expiry_days() -> i64 {
    30
}
