//! # prepdeck-core
//!
//! Core crate for Prepdeck. Contains configuration schemas, pagination
//! types, the unified error system, and the cache provider trait.
//!
//! This crate has **no** internal dependencies on other Prepdeck crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
pub use traits::CacheProvider;
