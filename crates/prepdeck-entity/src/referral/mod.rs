//! Referral domain entities.

pub mod code;
pub mod model;
pub mod reward;

pub use code::ReferralCode;
pub use model::{Referral, ReferralStatus};
pub use reward::{ReferralReward, RewardRecipient};
