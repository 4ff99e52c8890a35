//! Route handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod exam;
pub mod health;
pub mod referral;
pub mod student;
pub mod subscription;
pub mod user;
