//! Core type definitions used across the Prepdeck workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
