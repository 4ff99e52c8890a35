//! Referral codes, referral lifecycle, and reward claiming.

pub mod service;

pub use service::{ClaimOutcome, MyReferrals, ReferralService};
