//! # prepdeck-service
//!
//! Business logic service layer for Prepdeck. Each service orchestrates
//! repositories, cache, outbound delivery, and authentication to implement
//! application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod analytics;
pub mod auth;
pub mod context;
pub mod exam;
pub mod lesson;
pub mod referral;
pub mod session;
pub mod subscription;
pub mod user;

pub use analytics::AnalyticsService;
pub use auth::AuthService;
pub use context::RequestContext;
pub use exam::ExamService;
pub use lesson::LessonService;
pub use referral::ReferralService;
pub use session::SessionAdminService;
pub use subscription::SubscriptionService;
pub use user::{AdminUserService, UserService};
