//! Lesson progress tracking and the badge award engine.

pub mod badges;
pub mod service;

pub use badges::BadgeEngine;
pub use service::{LessonService, ProgressReport};
