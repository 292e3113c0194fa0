use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single multiple-choice question, shared by inline knowledge checks and
/// end-of-section quizzes. `correct_answer` is a zero-based index into
/// `options`; the bound is enforced when content is loaded, not at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Question {
    /// Stable identifier within the section; assigned from the question's
    /// position when the author omits it.
    #[serde(default)]
    pub id: String,
    #[validate(length(min = 1, message = "Question prompt must not be empty"))]
    pub question: String,
    #[validate(length(min = 2, message = "A question needs at least two options"))]
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

impl Question {
    /// The sole determinant of a verdict.
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_answer
    }
}
