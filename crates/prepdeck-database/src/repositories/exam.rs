//! Exam paper and question repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use prepdeck_core::error::{AppError, ErrorKind};
use prepdeck_core::result::AppResult;
use prepdeck_core::types::pagination::{PageRequest, PageResponse};
use prepdeck_entity::exam::paper::CreateExamPaper;
use prepdeck_entity::exam::question::CreateQuestion;
use prepdeck_entity::exam::{ExamPaper, Question};

/// Repository for exam papers and their questions.
#[derive(Debug, Clone)]
pub struct ExamRepository {
    pool: PgPool,
}

impl ExamRepository {
    /// Create a new exam repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a paper by ID.
    pub async fn find_paper(&self, id: Uuid) -> AppResult<Option<ExamPaper>> {
        sqlx::query_as::<_, ExamPaper>("SELECT * FROM exam_papers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find paper", e))
    }

    /// List published papers with pagination, optionally filtered by subject.
    pub async fn list_published(
        &self,
        page: &PageRequest,
        subject: Option<&str>,
    ) -> AppResult<PageResponse<ExamPaper>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM exam_papers \
             WHERE is_published = TRUE AND ($1::text IS NULL OR subject = $1)",
        )
        .bind(subject)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count papers", e))?;

        let papers = sqlx::query_as::<_, ExamPaper>(
            "SELECT * FROM exam_papers \
             WHERE is_published = TRUE AND ($1::text IS NULL OR subject = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(subject)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list papers", e))?;

        Ok(PageResponse::new(
            papers,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List all papers regardless of publication state, with pagination.
    pub async fn list_all(&self, page: &PageRequest) -> AppResult<PageResponse<ExamPaper>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exam_papers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count papers", e))?;

        let papers = sqlx::query_as::<_, ExamPaper>(
            "SELECT * FROM exam_papers ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list papers", e))?;

        Ok(PageResponse::new(
            papers,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Create a new unpublished paper.
    pub async fn create_paper(&self, data: &CreateExamPaper) -> AppResult<ExamPaper> {
        sqlx::query_as::<_, ExamPaper>(
            "INSERT INTO exam_papers (title, description, subject, duration_minutes, created_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.subject)
        .bind(data.duration_minutes)
        .bind(data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create paper", e))
    }

    /// Set a paper's publication state.
    pub async fn set_published(&self, id: Uuid, published: bool) -> AppResult<ExamPaper> {
        sqlx::query_as::<_, ExamPaper>(
            "UPDATE exam_papers SET is_published = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(published)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to publish paper", e))?
        .ok_or_else(|| AppError::not_found(format!("Exam paper {id} not found")))
    }

    /// Delete a paper and its questions.
    pub async fn delete_paper(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM exam_papers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete paper", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Add a question to a paper, keeping the paper's total marks in step.
    pub async fn add_question(&self, data: &CreateQuestion) -> AppResult<Question> {
        let options = serde_json::to_value(&data.options)
            .map_err(|e| AppError::with_source(ErrorKind::Serialization, "Bad options", e))?;

        let question = sqlx::query_as::<_, Question>(
            "INSERT INTO questions (paper_id, prompt, options, correct_option, marks, explanation, position) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.paper_id)
        .bind(&data.prompt)
        .bind(&options)
        .bind(data.correct_option)
        .bind(data.marks)
        .bind(&data.explanation)
        .bind(data.position)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add question", e))?;

        sqlx::query(
            "UPDATE exam_papers SET total_marks = total_marks + $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(data.paper_id)
        .bind(data.marks)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update paper marks", e)
        })?;

        Ok(question)
    }

    /// List a paper's questions in display order.
    pub async fn list_questions(&self, paper_id: Uuid) -> AppResult<Vec<Question>> {
        sqlx::query_as::<_, Question>(
            "SELECT * FROM questions WHERE paper_id = $1 ORDER BY position ASC",
        )
        .bind(paper_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list questions", e))
    }

    /// Delete a question, keeping the paper's total marks in step.
    pub async fn delete_question(&self, question_id: Uuid) -> AppResult<bool> {
        let row: Option<(Uuid, i32)> = sqlx::query_as(
            "DELETE FROM questions WHERE id = $1 RETURNING paper_id, marks",
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete question", e))?;

        let Some((paper_id, marks)) = row else {
            return Ok(false);
        };

        sqlx::query(
            "UPDATE exam_papers SET total_marks = total_marks - $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(paper_id)
        .bind(marks)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update paper marks", e)
        })?;

        Ok(true)
    }

    /// Count all papers.
    pub async fn count_papers(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exam_papers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count papers", e))?;
        Ok(count as u64)
    }
}
