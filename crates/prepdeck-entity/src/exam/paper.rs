//! Exam paper entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A practice exam paper composed of multiple-choice questions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExamPaper {
    /// Unique paper identifier.
    pub id: Uuid,
    /// Paper title.
    pub title: String,
    /// Longer description shown on the paper page.
    pub description: Option<String>,
    /// Subject the paper belongs to.
    pub subject: String,
    /// Total marks across all questions.
    pub total_marks: i32,
    /// Suggested completion time in minutes.
    pub duration_minutes: i32,
    /// Whether students can see the paper.
    pub is_published: bool,
    /// The instructor who authored the paper.
    pub created_by: Uuid,
    /// When the paper was created.
    pub created_at: DateTime<Utc>,
    /// When the paper was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new exam paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExamPaper {
    /// Paper title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Subject the paper belongs to.
    pub subject: String,
    /// Suggested completion time in minutes.
    pub duration_minutes: i32,
    /// The authoring instructor.
    pub created_by: Uuid,
}
