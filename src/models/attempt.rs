// src/models/attempt.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{exam_record::ScoreResult, question::PublicQuestion};

/// Lifecycle of one attempt. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    NotStarted,
    InProgress,
    Submitted,
}

/// Mutable progress of one taker through one exam.
///
/// Every update goes through one of the `with_*` / `into_*` functions, which
/// return a new state instead of editing in place. Once submitted the state is
/// frozen: the update functions hand it back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptState {
    pub current_question_index: usize,
    /// Question id -> selected option index.
    pub answers: BTreeMap<String, usize>,
    pub time_remaining_seconds: u32,
    pub status: AttemptStatus,
}

impl AttemptState {
    pub fn new(time_limit_seconds: u32) -> Self {
        Self {
            current_question_index: 0,
            answers: BTreeMap::new(),
            time_remaining_seconds: time_limit_seconds,
            status: AttemptStatus::NotStarted,
        }
    }

    pub fn submitted(&self) -> bool {
        self.status == AttemptStatus::Submitted
    }

    pub fn selected(&self, question_id: &str) -> Option<usize> {
        self.answers.get(question_id).copied()
    }

    pub fn started(self) -> Self {
        match self.status {
            AttemptStatus::NotStarted => Self {
                status: AttemptStatus::InProgress,
                ..self
            },
            _ => self,
        }
    }

    /// Records a selection, replacing any earlier one for the same question.
    pub fn with_answer(mut self, question_id: &str, option_index: usize) -> Self {
        if self.submitted() {
            return self;
        }
        self.answers.insert(question_id.to_string(), option_index);
        self
    }

    pub fn with_index(self, index: usize) -> Self {
        if self.submitted() {
            return self;
        }
        Self {
            current_question_index: index,
            ..self
        }
    }

    pub fn with_time_remaining(self, seconds: u32) -> Self {
        if self.submitted() {
            return self;
        }
        Self {
            time_remaining_seconds: seconds,
            ..self
        }
    }

    pub fn into_submitted(self) -> Self {
        Self {
            status: AttemptStatus::Submitted,
            ..self
        }
    }
}

/// DTO for selecting an answer.
#[derive(Debug, Deserialize, Validate)]
pub struct SelectAnswerRequest {
    #[validate(length(min = 1, max = 64))]
    pub question_id: String,
    pub option_index: usize,
}

/// DTO for moving between questions.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NavigateRequest {
    Next,
    Previous,
    GoTo { index: i64 },
}

/// DTO for submitting an attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitAttemptRequest {
    /// Set once the taker has acknowledged unanswered questions.
    #[serde(default)]
    pub confirmed: bool,
}

/// What the taker sees while sitting an attempt.
#[derive(Debug, Serialize, Deserialize)]
pub struct AttemptView {
    pub attempt_id: Uuid,
    pub exam_id: String,
    pub taker: String,
    pub status: AttemptStatus,
    pub current_question_index: usize,
    pub total_questions: usize,
    pub current_question: PublicQuestion,
    pub answers: BTreeMap<String, usize>,
    pub unanswered: usize,
    pub time_remaining_seconds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScoreResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = AttemptState::new(1800);
        assert_eq!(state.status, AttemptStatus::NotStarted);
        assert_eq!(state.time_remaining_seconds, 1800);
        assert!(state.answers.is_empty());
    }

    #[test]
    fn test_last_answer_wins() {
        let state = AttemptState::new(60)
            .started()
            .with_answer("q1", 0)
            .with_answer("q1", 2);
        assert_eq!(state.selected("q1"), Some(2));
        assert_eq!(state.answers.len(), 1);
    }

    #[test]
    fn test_submitted_state_is_frozen() {
        let frozen = AttemptState::new(60)
            .started()
            .with_answer("q1", 1)
            .into_submitted();
        let after = frozen
            .clone()
            .with_answer("q1", 0)
            .with_index(3)
            .with_time_remaining(0)
            .started();
        assert_eq!(after, frozen);
    }

    #[test]
    fn test_navigate_request_parsing() {
        let req: NavigateRequest =
            serde_json::from_value(serde_json::json!({"action": "go_to", "index": -4})).unwrap();
        assert!(matches!(req, NavigateRequest::GoTo { index: -4 }));
        let req: NavigateRequest =
            serde_json::from_value(serde_json::json!({"action": "next"})).unwrap();
        assert!(matches!(req, NavigateRequest::Next));
    }
}
