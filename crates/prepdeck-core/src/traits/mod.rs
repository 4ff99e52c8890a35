//! Core traits shared across crates.

pub mod cache;

pub use cache::CacheProvider;
