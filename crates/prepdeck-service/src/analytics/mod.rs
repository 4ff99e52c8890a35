//! Admin dashboard aggregations.

pub mod service;

pub use service::{AnalyticsService, DashboardOverview, EngagementReport};
