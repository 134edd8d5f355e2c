// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A single multiple-choice question as defined by the exam author.
///
/// Immutable once loaded; the taker never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    #[validate(length(min = 1, max = 64))]
    pub id: String,

    /// The text shown to the taker.
    #[validate(length(min = 1, max = 1000))]
    pub prompt: String,

    /// Ordered list of options (e.g., ["Option A", "Option B"]).
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,

    /// Index into `options` of the correct answer.
    pub correct_option_index: usize,
}

impl Question {
    /// Returns true if `index` addresses one of this question's options.
    pub fn has_option(&self, index: usize) -> bool {
        index < self.options.len()
    }

    pub fn is_correct(&self, selected: Option<usize>) -> bool {
        selected == Some(self.correct_option_index)
    }
}

/// DTO for sending a question to the taker (excludes the answer key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            prompt: q.prompt.clone(),
            options: q.options.clone(),
        }
    }
}

fn validate_options(options: &[String]) -> Result<(), ValidationError> {
    if options.len() < 2 {
        return Err(ValidationError::new("options_need_at_least_two"));
    }
    for opt in options {
        if opt.is_empty() {
            return Err(ValidationError::new("option_cannot_be_empty"));
        }
        if opt.len() > 500 {
            return Err(ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

/// Checks that the answer key addresses an existing option.
pub fn validate_answer_key(question: &Question) -> Result<(), ValidationError> {
    if !question.has_option(question.correct_option_index) {
        return Err(ValidationError::new("correct_option_out_of_range"));
    }
    Ok(())
}
