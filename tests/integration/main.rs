//! End-to-end tests against the full HTTP router.
//!
//! Tests marked `#[ignore]` need a reachable PostgreSQL instance
//! (`DATABASE_URL`); the rest run against an offline app.

mod helpers;

mod admin_test;
mod auth_flow_test;
mod progress_test;
mod referral_test;
mod router_test;
