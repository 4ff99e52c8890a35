//! OAuth 2.0 sign-in providers.

pub mod google;

pub use google::{GoogleOAuth, GoogleUserInfo};
