use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::session::{AnswerRecord, QuizOutcome};

pub struct GradingService;

impl GradingService {
    /// Percentage of correct answers, rounded to the nearest integer for
    /// display and for the pass comparison.
    pub fn score_percentage(correct: usize, total: usize) -> u32 {
        if total == 0 {
            return 0;
        }
        ((correct as f64 / total as f64) * 100.0).round() as u32
    }

    /// Derive the final outcome from the recorded answers. Pure: the same
    /// answers always yield the same score, and `passed` is the inclusive
    /// comparison against the threshold.
    pub fn grade(
        answers: &[AnswerRecord],
        total_questions: usize,
        passing_score: f64,
    ) -> QuizOutcome {
        let correct_answers = answers.iter().filter(|a| a.correct).count();
        let score = Self::score_percentage(correct_answers, total_questions);
        QuizOutcome {
            total_questions,
            correct_answers,
            score,
            passing_score,
            passed: score as f64 >= passing_score,
        }
    }

    /// Verdict for a single inline knowledge check. The selected index is
    /// the only wire-supplied input, so it is the one thing range-checked
    /// here rather than at content load.
    pub fn evaluate_check(question: &Question, selected: usize) -> Result<bool> {
        if selected >= question.options.len() {
            return Err(Error::BadRequest(format!(
                "Selected option {} is out of range for check '{}' ({} options)",
                selected,
                question.id,
                question.options.len()
            )));
        }
        Ok(question.is_correct(selected))
    }
}
