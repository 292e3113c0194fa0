use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::section::{CourseSection, QuizSpec};
use crate::models::session::{AnswerFeedback, QuizSession};
use crate::utils::token::generate_access_token;
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory, token-addressed store of live quiz attempts. Sessions are
/// ephemeral: they expire on a TTL (tightened by a bank's time limit) and
/// are dropped by the sweeper; nothing is persisted anywhere.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<String, QuizSession>>>,
    ttl_minutes: i64,
    default_passing_score: f64,
}

impl SessionService {
    pub fn new(ttl_minutes: i64, default_passing_score: f64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl_minutes,
            default_passing_score,
        }
    }

    /// Create an attempt for a section's quiz: draw the question snapshot,
    /// mint an access token and register the session.
    pub async fn start_session(&self, section: &CourseSection) -> QuizSession {
        let questions = draw_questions(&section.quiz);
        let passing_score = section
            .quiz
            .passing_score
            .unwrap_or(self.default_passing_score);

        let now = Utc::now();
        let ttl_deadline = now + Duration::minutes(self.ttl_minutes);
        let expires_at = match section.quiz.duration_minutes {
            Some(minutes) => {
                let timed_deadline = now + Duration::minutes(minutes);
                if timed_deadline < ttl_deadline {
                    timed_deadline
                } else {
                    ttl_deadline
                }
            }
            None => ttl_deadline,
        };

        let session = QuizSession::new(
            generate_access_token(32),
            section.slug.clone(),
            section.quiz.title.clone(),
            questions,
            passing_score,
            now,
            expires_at,
        );

        self.sessions
            .write()
            .await
            .insert(session.access_token.clone(), session.clone());
        session
    }

    pub async fn get_session(&self, token: &str) -> Result<QuizSession> {
        self.sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| Error::NotFound("Quiz attempt not found".to_string()))
    }

    pub async fn answer(&self, token: &str, selected: usize) -> Result<(QuizSession, AnswerFeedback)> {
        let mut guard = self.sessions.write().await;
        let session = guard
            .get_mut(token)
            .ok_or_else(|| Error::NotFound("Quiz attempt not found".to_string()))?;
        let feedback = session.answer(selected, Utc::now())?;
        Ok((session.clone(), feedback))
    }

    pub async fn advance(&self, token: &str) -> Result<QuizSession> {
        let mut guard = self.sessions.write().await;
        let session = guard
            .get_mut(token)
            .ok_or_else(|| Error::NotFound("Quiz attempt not found".to_string()))?;
        session.advance()?;
        Ok(session.clone())
    }

    /// Drop every session past its deadline, completed or not. Returns the
    /// number removed.
    pub async fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut guard = self.sessions.write().await;
        let before = guard.len();
        guard.retain(|_, session| !session.is_expired(now));
        before - guard.len()
    }
}

/// Build the question snapshot for one attempt. Sampled banks draw a
/// category-balanced subset; a full bank keeps authored order unless the
/// spec opts into shuffling.
fn draw_questions(spec: &QuizSpec) -> Vec<Question> {
    let mut rng = rand::thread_rng();
    let per_attempt = spec.questions_per_session();

    let mut drawn = if per_attempt < spec.questions.len() {
        balanced_sample(&spec.questions, per_attempt, &mut rng)
    } else {
        spec.questions.clone()
    };

    if spec.shuffle_questions {
        drawn.shuffle(&mut rng);
    }
    drawn
}

/// Round-robin one question per category until the target is reached, so a
/// short exam still touches every topic of the bank.
fn balanced_sample<R: Rng>(pool: &[Question], target: usize, rng: &mut R) -> Vec<Question> {
    let mut groups: BTreeMap<&str, Vec<&Question>> = BTreeMap::new();
    for question in pool {
        groups
            .entry(question.category.as_deref().unwrap_or("general"))
            .or_default()
            .push(question);
    }
    for group in groups.values_mut() {
        group.shuffle(rng);
    }

    let mut drawn: Vec<Question> = Vec::with_capacity(target);
    while drawn.len() < target {
        let mut took_any = false;
        for group in groups.values_mut() {
            if drawn.len() == target {
                break;
            }
            if let Some(question) = group.pop() {
                drawn.push(question.clone());
                took_any = true;
            }
        }
        if !took_any {
            break;
        }
    }

    drawn.shuffle(rng);
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, category: Option<&str>) -> Question {
        Question {
            id: id.to_string(),
            question: format!("prompt {}", id),
            options: vec!["a".to_string(), "b".to_string()],
            correct_answer: 0,
            explanation: None,
            category: category.map(|c| c.to_string()),
            difficulty: None,
        }
    }

    fn spec(questions: Vec<Question>, per_attempt: Option<usize>) -> QuizSpec {
        QuizSpec {
            title: "Mock Examination".to_string(),
            passing_score: Some(80.0),
            duration_minutes: None,
            questions_per_attempt: per_attempt,
            shuffle_questions: false,
            questions,
        }
    }

    fn section(quiz: QuizSpec) -> CourseSection {
        CourseSection {
            slug: "mock-exam".to_string(),
            title: "Mock Examination".to_string(),
            description: None,
            inline_checks: Vec::new(),
            quiz,
        }
    }

    #[test]
    fn full_bank_keeps_authored_order_without_shuffle() {
        let questions = vec![question("q1", None), question("q2", None), question("q3", None)];
        let drawn = draw_questions(&spec(questions, None));
        let ids: Vec<&str> = drawn.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn balanced_sample_covers_every_category() {
        let mut pool = Vec::new();
        for category in ["legislation", "testing", "equipment"] {
            for i in 0..4 {
                pool.push(question(&format!("{}-{}", category, i), Some(category)));
            }
        }

        let drawn = balanced_sample(&pool, 6, &mut rand::thread_rng());
        assert_eq!(drawn.len(), 6);
        for category in ["legislation", "testing", "equipment"] {
            let from_category = drawn
                .iter()
                .filter(|q| q.category.as_deref() == Some(category))
                .count();
            assert_eq!(from_category, 2);
        }
    }

    #[test]
    fn sampled_draw_has_no_duplicates() {
        let pool: Vec<Question> = (0..10).map(|i| question(&format!("q{}", i), None)).collect();
        let drawn = balanced_sample(&pool, 7, &mut rand::thread_rng());
        let mut ids: Vec<&str> = drawn.iter().map(|q| q.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 7);
    }

    #[tokio::test]
    async fn started_session_snapshots_the_sampled_bank() {
        let service = SessionService::new(60, 75.0);
        let questions: Vec<Question> =
            (0..8).map(|i| question(&format!("q{}", i), None)).collect();
        let section = section(spec(questions, Some(3)));

        let session = service.start_session(&section).await;
        assert_eq!(session.total_questions(), 3);
        assert_eq!(session.passing_score(), 80.0);

        let fetched = service.get_session(&session.access_token).await.unwrap();
        let original: Vec<&str> = session.questions().iter().map(|q| q.id.as_str()).collect();
        let stored: Vec<&str> = fetched.questions().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(original, stored);
    }

    #[tokio::test]
    async fn sweep_drops_only_expired_sessions() {
        let service = SessionService::new(60, 75.0);
        let keep = section(spec(vec![question("q1", None)], None));
        let session = service.start_session(&keep).await;

        let mut timed = spec(vec![question("q2", None)], None);
        timed.duration_minutes = Some(1);
        let expired_section = section(timed);
        let expired = service.start_session(&expired_section).await;
        {
            let mut guard = service.sessions.write().await;
            let entry = guard.get_mut(&expired.access_token).unwrap();
            entry.expires_at = Utc::now() - Duration::seconds(1);
        }

        assert_eq!(service.sweep_expired().await, 1);
        assert!(service.get_session(&session.access_token).await.is_ok());
        assert!(service.get_session(&expired.access_token).await.is_err());
    }
}
