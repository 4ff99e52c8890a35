//! Authentication flows: registration, login, verification, OAuth.

pub mod service;

pub use service::{AuthResponse, AuthService, ClientInfo};
