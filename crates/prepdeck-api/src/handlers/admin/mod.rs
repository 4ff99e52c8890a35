//! Admin-only handlers.

pub mod analytics;
pub mod exams;
pub mod referrals;
pub mod sessions;
pub mod users;
