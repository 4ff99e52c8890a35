//! Built-in job handler implementations.

pub mod cleanup;
pub mod referral;
pub mod report;

pub use cleanup::{OtpPurgeHandler, SessionCleanupHandler};
pub use referral::RewardExpiryHandler;
pub use report::UsageReportHandler;
