//! Repository implementations for all Prepdeck entities.

pub mod analytics;
pub mod exam;
pub mod job;
pub mod lesson_badge;
pub mod lesson_progress;
pub mod otp;
pub mod referral;
pub mod session;
pub mod subscription;
pub mod user;

pub use analytics::AnalyticsRepository;
pub use exam::ExamRepository;
pub use job::JobRepository;
pub use lesson_badge::LessonBadgeRepository;
pub use lesson_progress::LessonProgressRepository;
pub use otp::OtpRepository;
pub use referral::ReferralRepository;
pub use session::SessionRepository;
pub use subscription::SubscriptionRepository;
pub use user::UserRepository;
