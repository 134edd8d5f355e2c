// src/models/exam.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    config::DEFAULT_PASSING_SCORE,
    error::AppError,
    models::question::{PublicQuestion, Question, validate_answer_key},
};

/// A quiz or exam definition supplied by the content catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Exam {
    #[validate(length(min = 1, max = 64))]
    pub id: String,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    /// Countdown length for one attempt. Must be positive.
    #[validate(range(min = 1))]
    pub time_limit_seconds: u32,

    /// Minimum score percentage required to pass.
    #[serde(default = "default_passing_score")]
    #[validate(range(max = 100))]
    pub passing_score: u8,

    /// Ordered question bank; never empty.
    #[validate(custom(function = validate_questions))]
    pub questions: Vec<Question>,
}

fn default_passing_score() -> u8 {
    DEFAULT_PASSING_SCORE
}

impl Exam {
    /// Validates the definition, rejecting anything an attempt could not run against.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| AppError::BadRequest(format!("Invalid exam '{}': {}", self.id, e)))
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

fn validate_questions(questions: &[Question]) -> Result<(), ValidationError> {
    if questions.is_empty() {
        return Err(ValidationError::new("questions_cannot_be_empty"));
    }

    let mut seen = HashSet::new();
    for q in questions {
        if !seen.insert(q.id.as_str()) {
            return Err(ValidationError::new("duplicate_question_id"));
        }
        if q.validate().is_err() {
            return Err(ValidationError::new("invalid_question"));
        }
        validate_answer_key(q)?;
    }
    Ok(())
}

/// Catalog listing entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExamSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub time_limit_seconds: u32,
    pub passing_score: u8,
    pub question_count: usize,
}

impl From<&Exam> for ExamSummary {
    fn from(exam: &Exam) -> Self {
        Self {
            id: exam.id.clone(),
            title: exam.title.clone(),
            description: exam.description.clone(),
            time_limit_seconds: exam.time_limit_seconds,
            passing_score: exam.passing_score,
            question_count: exam.question_count(),
        }
    }
}

/// DTO for returning an exam to a taker, answer key stripped.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicExam {
    #[serde(flatten)]
    pub summary: ExamSummary,
    pub questions: Vec<PublicQuestion>,
}

impl From<&Exam> for PublicExam {
    fn from(exam: &Exam) -> Self {
        Self {
            summary: ExamSummary::from(exam),
            questions: exam.questions.iter().map(PublicQuestion::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exam(questions: Vec<Question>) -> Exam {
        Exam {
            id: "rust-basics".to_string(),
            title: "Rust Basics".to_string(),
            description: String::new(),
            time_limit_seconds: 600,
            passing_score: 70,
            questions,
        }
    }

    fn q(id: &str, correct: usize) -> Question {
        Question {
            id: id.to_string(),
            prompt: format!("Question {id}"),
            options: vec!["A".to_string(), "B".to_string()],
            correct_option_index: correct,
        }
    }

    #[test]
    fn test_valid_exam() {
        assert!(exam(vec![q("1", 0), q("2", 1)]).check().is_ok());
    }

    #[test]
    fn test_empty_exam_rejected() {
        assert!(exam(vec![]).check().is_err());
    }

    #[test]
    fn test_zero_time_limit_rejected() {
        let mut e = exam(vec![q("1", 0)]);
        e.time_limit_seconds = 0;
        assert!(e.check().is_err());
    }

    #[test]
    fn test_duplicate_question_ids_rejected() {
        assert!(exam(vec![q("1", 0), q("1", 1)]).check().is_err());
    }

    #[test]
    fn test_bad_answer_key_rejected() {
        assert!(exam(vec![q("1", 2)]).check().is_err());
    }

    #[test]
    fn test_passing_score_defaults() {
        let e: Exam = serde_json::from_value(serde_json::json!({
            "id": "x",
            "title": "X",
            "time_limit_seconds": 60,
            "questions": [{"id": "1", "prompt": "?", "options": ["a", "b"], "correct_option_index": 0}]
        }))
        .unwrap();
        assert_eq!(e.passing_score, DEFAULT_PASSING_SCORE);
        assert!(e.check().is_ok());
    }
}
