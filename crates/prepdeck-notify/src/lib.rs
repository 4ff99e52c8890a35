//! # prepdeck-notify
//!
//! Outbound delivery for Prepdeck: OTP codes, badge awards, and referral
//! reward notices over email and SMS.
//!
//! Two provider families are supported per channel:
//!
//! - **log**: Writes the message to the application log. Default for
//!   development and tests.
//! - **http**: POSTs the message to a JSON gateway (the hosted mail/SMS
//!   relay in production).
//!
//! The provider is selected at runtime based on configuration. Callers
//! compose messages with [`message`] builders and hand them to the
//! [`Notifier`].

pub mod message;
pub mod notifier;
pub mod providers;
pub mod sender;

pub use message::{EmailMessage, SmsMessage};
pub use notifier::Notifier;
pub use sender::{EmailSender, SmsSender};
