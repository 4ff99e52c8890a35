//! Exam content: paper browsing for students, CRUD for staff.

pub mod service;

pub use service::{ExamService, PaperWithQuestions, StudentQuestion};
