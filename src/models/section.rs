use crate::models::question::Question;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One unit of course content: the inline knowledge checks embedded in a
/// section's prose plus the end-of-section quiz. Authored as a JSON file in
/// the content directory; a mock-exam bank is a section with no inline
/// checks and a sampled, timed quiz.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CourseSection {
    #[validate(length(min = 1, message = "Section slug must not be empty"))]
    pub slug: String,
    #[validate(length(min = 1, message = "Section title must not be empty"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub inline_checks: Vec<Question>,
    #[validate(nested)]
    pub quiz: QuizSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuizSpec {
    #[validate(length(min = 1, message = "Quiz title must not be empty"))]
    pub title: String,
    #[validate(range(
        min = 0.0,
        max = 100.0,
        message = "Passing score must be between 0 and 100"
    ))]
    pub passing_score: Option<f64>,
    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration_minutes: Option<i64>,
    /// When set, each attempt draws this many questions from the bank,
    /// balanced across categories.
    #[validate(range(min = 1, message = "Questions per attempt must be at least 1"))]
    pub questions_per_attempt: Option<usize>,
    #[serde(default)]
    pub shuffle_questions: bool,
    #[validate(length(min = 1, message = "A quiz needs at least one question"), nested)]
    pub questions: Vec<Question>,
}

impl QuizSpec {
    /// Number of questions an attempt will actually be asked.
    pub fn questions_per_session(&self) -> usize {
        match self.questions_per_attempt {
            Some(n) => n.min(self.questions.len()),
            None => self.questions.len(),
        }
    }
}
