//! Subscription domain entities.

pub mod model;
pub mod plan;

pub use model::{Subscription, SubscriptionStatus};
pub use plan::{Plan, FREE_TRIAL_SLUG};
