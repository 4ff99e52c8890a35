//! # prepdeck-entity
//!
//! Domain entity models for Prepdeck. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod exam;
pub mod job;
pub mod lesson;
pub mod otp;
pub mod referral;
pub mod session;
pub mod subscription;
pub mod user;
