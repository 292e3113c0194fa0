use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::section::CourseSection;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use validator::Validate;

/// Read-only store of course sections, loaded once at startup from the
/// content directory. Every bank is validated here so the interaction
/// engine never has to guard against malformed questions at runtime.
#[derive(Clone)]
pub struct ContentService {
    sections: Arc<HashMap<String, CourseSection>>,
}

impl ContentService {
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut sections: HashMap<String, CourseSection> = HashMap::new();
        for path in &paths {
            let file = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("<content file>")
                .to_string();
            let raw = std::fs::read_to_string(path)?;
            let mut section: CourseSection = serde_json::from_str(&raw)
                .map_err(|e| Error::Content(format!("{}: {}", file, e)))?;
            assign_question_ids(&mut section);
            validate_section(&file, &section)?;

            if sections.contains_key(&section.slug) {
                return Err(Error::Content(format!(
                    "{}: duplicate section slug '{}'",
                    file, section.slug
                )));
            }
            sections.insert(section.slug.clone(), section);
        }

        if sections.is_empty() {
            return Err(Error::Content(format!(
                "No course content found in {}",
                dir.display()
            )));
        }

        tracing::info!(sections = sections.len(), "Course content loaded");
        Ok(Self {
            sections: Arc::new(sections),
        })
    }

    pub fn list(&self) -> Vec<&CourseSection> {
        let mut sections: Vec<&CourseSection> = self.sections.values().collect();
        sections.sort_by(|a, b| a.slug.cmp(&b.slug));
        sections
    }

    pub fn get(&self, slug: &str) -> Result<&CourseSection> {
        self.sections
            .get(slug)
            .ok_or_else(|| Error::NotFound(format!("Section '{}' not found", slug)))
    }

    pub fn get_check(&self, slug: &str, check_id: &str) -> Result<&Question> {
        let section = self.get(slug)?;
        section
            .inline_checks
            .iter()
            .find(|check| check.id == check_id)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Inline check '{}' not found in section '{}'",
                    check_id, slug
                ))
            })
    }
}

/// Authors may omit question ids; fill them in from position so answer
/// records and check routes always have a stable key.
fn assign_question_ids(section: &mut CourseSection) {
    for (idx, check) in section.inline_checks.iter_mut().enumerate() {
        if check.id.is_empty() {
            check.id = format!("check-{}", idx + 1);
        }
    }
    for (idx, question) in section.quiz.questions.iter_mut().enumerate() {
        if question.id.is_empty() {
            question.id = format!("q{}", idx + 1);
        }
    }
}

/// Structural invariants the validator derives cannot express: answer-key
/// bounds, id uniqueness, and sample size against the bank.
fn validate_section(file: &str, section: &CourseSection) -> Result<()> {
    section
        .validate()
        .map_err(|e| Error::Content(format!("{}: {}", file, e)))?;

    let questions = section
        .inline_checks
        .iter()
        .chain(section.quiz.questions.iter());
    for question in questions {
        if question.correct_answer >= question.options.len() {
            return Err(Error::Content(format!(
                "{}: question '{}': correct_answer {} is out of range for {} options",
                file,
                question.id,
                question.correct_answer,
                question.options.len()
            )));
        }
    }

    let mut check_ids = HashSet::new();
    for check in &section.inline_checks {
        if !check_ids.insert(check.id.as_str()) {
            return Err(Error::Content(format!(
                "{}: duplicate inline check id '{}'",
                file, check.id
            )));
        }
    }

    let mut question_ids = HashSet::new();
    for question in &section.quiz.questions {
        if !question_ids.insert(question.id.as_str()) {
            return Err(Error::Content(format!(
                "{}: duplicate quiz question id '{}'",
                file, question.id
            )));
        }
    }

    if let Some(per_attempt) = section.quiz.questions_per_attempt {
        if per_attempt > section.quiz.questions.len() {
            return Err(Error::Content(format!(
                "{}: questions_per_attempt {} exceeds the {} questions in the bank",
                file,
                per_attempt,
                section.quiz.questions.len()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::section::QuizSpec;

    fn question(id: &str, correct_answer: usize) -> Question {
        Question {
            id: id.to_string(),
            question: "What does COSHH stand for?".to_string(),
            options: vec![
                "Control of Substances Hazardous to Health".to_string(),
                "Control of Substances Harmful to Humans".to_string(),
            ],
            correct_answer,
            explanation: None,
            category: None,
            difficulty: None,
        }
    }

    fn section() -> CourseSection {
        CourseSection {
            slug: "coshh-module-1".to_string(),
            title: "COSHH Awareness".to_string(),
            description: None,
            inline_checks: vec![question("check-1", 0)],
            quiz: QuizSpec {
                title: "Section Knowledge Check".to_string(),
                passing_score: Some(75.0),
                duration_minutes: None,
                questions_per_attempt: None,
                shuffle_questions: false,
                questions: vec![question("q1", 0), question("q2", 1)],
            },
        }
    }

    #[test]
    fn valid_section_passes() {
        validate_section("coshh.json", &section()).unwrap();
    }

    #[test]
    fn out_of_range_answer_key_is_rejected() {
        let mut bad = section();
        bad.quiz.questions[1].correct_answer = 2;
        let err = validate_section("coshh.json", &bad).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn single_option_question_is_rejected() {
        let mut bad = section();
        bad.inline_checks[0].options.truncate(1);
        assert!(validate_section("coshh.json", &bad).is_err());
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let mut bad = section();
        bad.quiz.questions.clear();
        assert!(validate_section("coshh.json", &bad).is_err());
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let mut bad = section();
        bad.quiz.questions[1].id = "q1".to_string();
        let err = validate_section("coshh.json", &bad).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn oversized_sample_is_rejected() {
        let mut bad = section();
        bad.quiz.questions_per_attempt = Some(3);
        let err = validate_section("coshh.json", &bad).unwrap_err();
        assert!(err.to_string().contains("questions_per_attempt"));
    }

    #[test]
    fn load_from_dir_reads_and_indexes_sections() {
        let dir = std::env::temp_dir().join(format!("content-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("coshh.json"),
            serde_json::to_string(&section()).unwrap(),
        )
        .unwrap();

        let content = ContentService::load_from_dir(&dir).unwrap();
        assert_eq!(content.list().len(), 1);
        assert_eq!(content.get("coshh-module-1").unwrap().title, "COSHH Awareness");
        assert!(content.get("missing").is_err());
        assert!(content.get_check("coshh-module-1", "check-1").is_ok());
        assert!(content.get_check("coshh-module-1", "check-9").is_err());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn omitted_question_ids_are_assigned_from_position() {
        let mut unlabelled = section();
        unlabelled.inline_checks[0].id = String::new();
        for question in &mut unlabelled.quiz.questions {
            question.id = String::new();
        }

        assign_question_ids(&mut unlabelled);
        assert_eq!(unlabelled.inline_checks[0].id, "check-1");
        assert_eq!(unlabelled.quiz.questions[0].id, "q1");
        assert_eq!(unlabelled.quiz.questions[1].id, "q2");
        validate_section("coshh.json", &unlabelled).unwrap();
    }

    #[test]
    fn empty_content_dir_is_a_startup_error() {
        let dir = std::env::temp_dir().join(format!("content-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        assert!(ContentService::load_from_dir(&dir).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
