//! Exam content domain entities.

pub mod paper;
pub mod question;

pub use paper::{CreateExamPaper, ExamPaper};
pub use question::{CreateQuestion, Question};
