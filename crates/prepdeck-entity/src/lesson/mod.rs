//! Lesson progress and badge domain entities.

pub mod badge;
pub mod progress;

pub use badge::{BadgeType, LessonBadge};
pub use progress::{LessonProgress, ProgressStatus, ProgressUpdate};
