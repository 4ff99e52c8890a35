//! Exam paper use cases.
//!
//! Students only ever see published papers, and their question view is a
//! projection that strips the correct option and explanation. Staff get
//! the full rows.

use std::sync::Arc;

use tracing::info;

use prepdeck_core::error::AppError;
use prepdeck_core::result::AppResult;
use prepdeck_core::types::pagination::{PageRequest, PageResponse};
use prepdeck_database::repositories::ExamRepository;
use prepdeck_entity::exam::{CreateExamPaper, CreateQuestion, ExamPaper, Question};
use prepdeck_entity::user::UserRole;
use uuid::Uuid;

use crate::context::RequestContext;

/// A question as shown to students: no answer, no explanation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StudentQuestion {
    /// Question identifier.
    pub id: Uuid,
    /// Question text.
    pub prompt: String,
    /// Answer options.
    pub options: serde_json::Value,
    /// Marks at stake.
    pub marks: i32,
    /// Display order within the paper.
    pub position: i32,
}

impl From<Question> for StudentQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            prompt: q.prompt,
            options: q.options,
            marks: q.marks,
            position: q.position,
        }
    }
}

/// A paper with its questions, projected for the requesting role.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PaperWithQuestions {
    /// The paper.
    #[serde(flatten)]
    pub paper: ExamPaper,
    /// Student-safe question projections. Populated for students.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<StudentQuestion>>,
    /// Full question rows. Populated for instructors and admins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_questions: Option<Vec<Question>>,
}

/// Handles exam paper browsing and authoring.
#[derive(Debug, Clone)]
pub struct ExamService {
    exam_repo: Arc<ExamRepository>,
}

impl ExamService {
    /// Creates a new exam service.
    pub fn new(exam_repo: Arc<ExamRepository>) -> Self {
        Self { exam_repo }
    }

    /// Lists published papers, optionally filtered by subject.
    pub async fn list_published(
        &self,
        page: &PageRequest,
        subject: Option<&str>,
    ) -> AppResult<PageResponse<ExamPaper>> {
        self.exam_repo.list_published(page, subject).await
    }

    /// Returns a paper with its questions, projected for the caller's
    /// role. Students cannot see unpublished papers at all.
    pub async fn get_paper(
        &self,
        ctx: &RequestContext,
        paper_id: Uuid,
    ) -> AppResult<PaperWithQuestions> {
        let paper = self
            .exam_repo
            .find_paper(paper_id)
            .await?
            .ok_or_else(|| AppError::not_found("Exam paper not found"))?;

        let staff = ctx.role != UserRole::Student;
        if !paper.is_published && !staff {
            return Err(AppError::not_found("Exam paper not found"));
        }

        let questions = self.exam_repo.list_questions(paper.id).await?;
        Ok(if staff {
            PaperWithQuestions {
                paper,
                questions: None,
                full_questions: Some(questions),
            }
        } else {
            PaperWithQuestions {
                paper,
                questions: Some(questions.into_iter().map(StudentQuestion::from).collect()),
                full_questions: None,
            }
        })
    }

    /// Lists all papers for the admin content screen.
    pub async fn list_all(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ExamPaper>> {
        ctx.require_admin()?;
        self.exam_repo.list_all(page).await
    }

    /// Creates a new (unpublished) paper.
    pub async fn create_paper(
        &self,
        ctx: &RequestContext,
        title: &str,
        description: Option<String>,
        subject: &str,
        duration_minutes: i32,
    ) -> AppResult<ExamPaper> {
        ctx.require_admin()?;
        if title.trim().is_empty() || subject.trim().is_empty() {
            return Err(AppError::validation("Title and subject are required"));
        }
        if duration_minutes <= 0 {
            return Err(AppError::validation("Duration must be positive"));
        }

        let paper = self
            .exam_repo
            .create_paper(&CreateExamPaper {
                title: title.trim().to_string(),
                description,
                subject: subject.trim().to_string(),
                duration_minutes,
                created_by: ctx.user_id,
            })
            .await?;
        info!(paper_id = %paper.id, "Exam paper created");
        Ok(paper)
    }

    /// Publishes or unpublishes a paper.
    pub async fn set_published(
        &self,
        ctx: &RequestContext,
        paper_id: Uuid,
        published: bool,
    ) -> AppResult<ExamPaper> {
        ctx.require_admin()?;
        let paper = self.exam_repo.set_published(paper_id, published).await?;
        info!(paper_id = %paper_id, published, "Paper publication changed");
        Ok(paper)
    }

    /// Deletes a paper and its questions.
    pub async fn delete_paper(&self, ctx: &RequestContext, paper_id: Uuid) -> AppResult<()> {
        ctx.require_admin()?;
        if !self.exam_repo.delete_paper(paper_id).await? {
            return Err(AppError::not_found("Exam paper not found"));
        }
        info!(paper_id = %paper_id, "Exam paper deleted");
        Ok(())
    }

    /// Adds a question to a paper; the paper's total marks follow.
    pub async fn add_question(
        &self,
        ctx: &RequestContext,
        data: CreateQuestion,
    ) -> AppResult<Question> {
        ctx.require_admin()?;
        if data.options.len() < 2 {
            return Err(AppError::validation("A question needs at least two options"));
        }
        if data.correct_option < 0 || data.correct_option as usize >= data.options.len() {
            return Err(AppError::validation("Correct option index is out of range"));
        }
        if data.marks <= 0 {
            return Err(AppError::validation("Marks must be positive"));
        }
        if self.exam_repo.find_paper(data.paper_id).await?.is_none() {
            return Err(AppError::not_found("Exam paper not found"));
        }

        self.exam_repo.add_question(&data).await
    }

    /// Removes a question; the paper's total marks follow.
    pub async fn delete_question(&self, ctx: &RequestContext, question_id: Uuid) -> AppResult<()> {
        ctx.require_admin()?;
        if !self.exam_repo.delete_question(question_id).await? {
            return Err(AppError::not_found("Question not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn student_projection_strips_answer_fields() {
        let question = Question {
            id: Uuid::new_v4(),
            paper_id: Uuid::new_v4(),
            prompt: "2 + 2 = ?".to_string(),
            options: serde_json::json!(["3", "4", "5"]),
            correct_option: 1,
            marks: 2,
            explanation: Some("Basic arithmetic".to_string()),
            position: 1,
            created_at: Utc::now(),
        };

        let projected = StudentQuestion::from(question);
        let json = serde_json::to_value(&projected).unwrap();
        assert!(json.get("correct_option").is_none());
        assert!(json.get("explanation").is_none());
        assert_eq!(json["prompt"], "2 + 2 = ?");
    }
}
