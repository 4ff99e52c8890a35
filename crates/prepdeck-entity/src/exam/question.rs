//! Exam question entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A multiple-choice question on an exam paper.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    /// Unique question identifier.
    pub id: Uuid,
    /// The paper this question belongs to.
    pub paper_id: Uuid,
    /// Question text.
    pub prompt: String,
    /// Answer options as a JSON array of strings.
    pub options: serde_json::Value,
    /// Zero-based index of the correct option.
    pub correct_option: i32,
    /// Marks awarded for a correct answer.
    pub marks: i32,
    /// Explanation shown after answering.
    pub explanation: Option<String>,
    /// Display order within the paper.
    pub position: i32,
    /// When the question was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to add a question to a paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuestion {
    /// The paper to add to.
    pub paper_id: Uuid,
    /// Question text.
    pub prompt: String,
    /// Answer options.
    pub options: Vec<String>,
    /// Zero-based index of the correct option.
    pub correct_option: i32,
    /// Marks awarded for a correct answer.
    pub marks: i32,
    /// Explanation shown after answering.
    pub explanation: Option<String>,
    /// Display order within the paper.
    pub position: i32,
}
