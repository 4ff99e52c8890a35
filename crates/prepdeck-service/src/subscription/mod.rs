//! Subscription and plan queries.

pub mod service;

pub use service::{SubscriptionOverview, SubscriptionService};
