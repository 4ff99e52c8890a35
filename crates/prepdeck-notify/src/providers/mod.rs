//! Delivery provider implementations.

pub mod http;
pub mod log;

pub use http::{HttpEmailSender, HttpSmsSender};
pub use log::{LogEmailSender, LogSmsSender};
