use crate::models::question::Question;
use crate::services::grading_service::GradingService;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded selection for one question of an attempt. Records are appended
/// strictly in question order and never rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub selected: usize,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// Per-question feedback revealed the moment an option is chosen: the
/// verdict, the actually-correct option, and the explanation when the
/// question carries one.
#[derive(Debug, Clone)]
pub struct AnswerFeedback {
    pub question_index: usize,
    pub correct: bool,
    pub correct_answer: usize,
    pub explanation: Option<String>,
}

/// Final result of a completed attempt. Derived from the recorded answers,
/// so recomputing it is idempotent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizOutcome {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub score: u32,
    pub passing_score: f64,
    pub passed: bool,
}

/// An illegal transition of the attempt state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("the current question already has an answer recorded")]
    FeedbackPending,
    #[error("the current question has not been answered yet")]
    AwaitingAnswer,
    #[error("the quiz attempt has already been completed")]
    AlreadyCompleted,
    #[error("selected option {selected} is out of range ({options} options)")]
    OptionOutOfRange { selected: usize, options: usize },
}

impl From<StepError> for crate::error::Error {
    fn from(err: StepError) -> Self {
        match err {
            StepError::OptionOutOfRange { .. } => crate::error::Error::BadRequest(err.to_string()),
            _ => crate::error::Error::Conflict(err.to_string()),
        }
    }
}

/// One learner's pass through a quiz. Strictly forward: each question is
/// answered exactly once, feedback must be acknowledged with an explicit
/// advance, and the attempt is sealed after the last answer. State lives
/// only in the session store and dies with it.
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub id: Uuid,
    pub access_token: String,
    pub section_slug: String,
    pub quiz_title: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    questions: Vec<Question>,
    passing_score: f64,
    current_index: usize,
    answers: Vec<AnswerRecord>,
    completed: bool,
}

impl QuizSession {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        access_token: String,
        section_slug: String,
        quiz_title: String,
        questions: Vec<Question>,
        passing_score: f64,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            access_token,
            section_slug,
            quiz_title,
            created_at,
            expires_at,
            completed_at: None,
            questions,
            passing_score,
            current_index: 0,
            answers: Vec::new(),
            completed: false,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn passing_score(&self) -> f64 {
        self.passing_score
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// The question currently awaiting a selection, None once completed.
    pub fn current_question(&self) -> Option<&Question> {
        if self.completed {
            None
        } else {
            self.questions.get(self.current_index)
        }
    }

    /// Feedback for the current question has been revealed and the attempt
    /// is waiting for an explicit advance.
    pub fn awaiting_advance(&self) -> bool {
        !self.completed && self.answers.len() == self.current_index + 1
    }

    /// Record the selection for the current question. Write-once: a second
    /// selection before advancing is rejected. Answering the last question
    /// seals the attempt.
    pub fn answer(
        &mut self,
        selected: usize,
        now: DateTime<Utc>,
    ) -> Result<AnswerFeedback, StepError> {
        if self.completed {
            return Err(StepError::AlreadyCompleted);
        }
        if self.awaiting_advance() {
            return Err(StepError::FeedbackPending);
        }

        let question = &self.questions[self.current_index];
        if selected >= question.options.len() {
            return Err(StepError::OptionOutOfRange {
                selected,
                options: question.options.len(),
            });
        }

        let correct = question.is_correct(selected);
        self.answers.push(AnswerRecord {
            question_id: question.id.clone(),
            selected,
            correct,
            answered_at: now,
        });

        let feedback = AnswerFeedback {
            question_index: self.current_index,
            correct,
            correct_answer: question.correct_answer,
            explanation: question.explanation.clone(),
        };

        if self.answers.len() == self.questions.len() {
            self.completed = true;
            self.completed_at = Some(now);
        }

        Ok(feedback)
    }

    /// Move on to the next question after feedback has been shown.
    pub fn advance(&mut self) -> Result<usize, StepError> {
        if self.completed {
            return Err(StepError::AlreadyCompleted);
        }
        if !self.awaiting_advance() {
            return Err(StepError::AwaitingAnswer);
        }
        self.current_index += 1;
        Ok(self.current_index)
    }

    /// Final score and verdict, available once every question is answered.
    pub fn outcome(&self) -> Option<QuizOutcome> {
        if !self.completed {
            return None;
        }
        Some(GradingService::grade(
            &self.answers,
            self.questions.len(),
            self.passing_score,
        ))
    }
}
