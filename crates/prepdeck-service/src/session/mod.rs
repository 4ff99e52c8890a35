//! Admin session oversight.

pub mod service;

pub use service::SessionAdminService;
