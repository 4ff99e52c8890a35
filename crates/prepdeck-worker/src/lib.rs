//! Background job processing and scheduled tasks for Prepdeck.
//!
//! This crate provides:
//! - A worker runner that polls for and executes queued jobs
//! - A cron scheduler that enqueues the periodic maintenance jobs
//! - A job executor that dispatches jobs to the correct handler
//! - Built-in handlers for session cleanup, code purging, reward expiry,
//!   and the weekly usage report

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
