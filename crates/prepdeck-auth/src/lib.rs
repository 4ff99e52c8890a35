//! # prepdeck-auth
//!
//! Authentication building blocks for the Prepdeck platform.
//!
//! ## Modules
//!
//! - `jwt` — JWT token creation and validation
//! - `password` — Argon2id password hashing and policy enforcement
//! - `otp` — One-time password issuance, rate limiting, and verification
//! - `session` — Session lifecycle management (create, validate, invalidate)
//! - `oauth` — Google sign-in code exchange with replay protection

pub mod jwt;
pub mod oauth;
pub mod otp;
pub mod password;
pub mod session;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use oauth::{GoogleOAuth, GoogleUserInfo};
pub use otp::{OtpEngine, OtpGenerator, OtpPolicy, OtpUsage};
pub use password::{PasswordHasher, PasswordValidator};
pub use session::SessionManager;
