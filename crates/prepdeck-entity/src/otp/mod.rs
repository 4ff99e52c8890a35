//! One-time password domain entities.

pub mod kind;
pub mod model;

pub use kind::{OtpChannel, OtpKind};
pub use model::{CreateOtp, Otp, ANON_OWNER_PREFIX};
