use crate::models::question::{Difficulty, Question};
use crate::models::section::CourseSection;
use crate::models::session::{QuizOutcome, QuizSession};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Wire projection of a question. The answer key and explanation are
/// deliberately absent: they are only revealed in feedback, after a
/// selection has been made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl From<&Question> for PublicQuestion {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            question: question.question.clone(),
            options: question.options.clone(),
            category: question.category.clone(),
            difficulty: question.difficulty,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuizSummary {
    pub title: String,
    pub total_questions: usize,
    pub passing_score: Option<f64>,
    pub duration_minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSummary {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub inline_checks: usize,
    pub quiz: PublicQuizSummary,
}

impl From<&CourseSection> for SectionSummary {
    fn from(section: &CourseSection) -> Self {
        Self {
            slug: section.slug.clone(),
            title: section.title.clone(),
            description: section.description.clone(),
            inline_checks: section.inline_checks.len(),
            quiz: PublicQuizSummary {
                title: section.quiz.title.clone(),
                total_questions: section.quiz.questions_per_session(),
                passing_score: section.quiz.passing_score,
                duration_minutes: section.quiz.duration_minutes,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueResponse {
    pub sections: Vec<SectionSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDetailResponse {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub inline_checks: Vec<PublicQuestion>,
    pub quiz: PublicQuizSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SelectOptionRequest {
    pub selected: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckAnswerResponse {
    pub check_id: String,
    pub correct: bool,
    pub correct_answer: usize,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentQuestion {
    pub index: usize,
    pub total: usize,
    pub question: PublicQuestion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartQuizResponse {
    pub attempt_id: uuid::Uuid,
    pub access_token: String,
    pub section_slug: String,
    pub title: String,
    pub total_questions: usize,
    pub passing_score: f64,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub question: CurrentQuestion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub question_index: usize,
    pub correct: bool,
    pub correct_answer: usize,
    pub explanation: Option<String>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<QuizResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextQuestionResponse {
    pub question: CurrentQuestion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub current_index: usize,
    pub questions_answered: usize,
    pub total_questions: usize,
    pub time_remaining_seconds: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
    pub attempt_id: uuid::Uuid,
    pub title: String,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub score: u32,
    pub passing_score: f64,
    pub passed: bool,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl QuizResult {
    pub fn from_outcome(session: &QuizSession, outcome: QuizOutcome) -> Self {
        Self {
            attempt_id: session.id,
            title: session.quiz_title.clone(),
            total_questions: outcome.total_questions,
            correct_answers: outcome.correct_answers,
            score: outcome.score,
            passing_score: outcome.passing_score,
            passed: outcome.passed,
            completed_at: session.completed_at,
        }
    }
}
