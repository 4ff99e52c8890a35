//! One-time password issuance, rate limiting, and verification.

pub mod engine;
pub mod generator;
pub mod policy;

pub use engine::{OtpEngine, OtpUsage};
pub use generator::OtpGenerator;
pub use policy::{ChannelUsage, OtpPolicy};
