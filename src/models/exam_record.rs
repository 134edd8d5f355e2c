// src/models/exam_record.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of scoring one submitted attempt. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub correct_count: usize,
    pub total_questions: usize,
    /// Rounded half-up, always within [0, 100].
    pub score_percent: u8,
    /// One entry per question, in exam order.
    pub per_question_correctness: Vec<bool>,
    pub passed: bool,
}

/// One row of an exam's ranking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position; assigned when the board is ranked.
    #[serde(default)]
    pub rank: u32,
    /// Issuing taker. Seeded rows have none and are told apart by name.
    #[serde(default, skip_serializing)]
    pub taker_id: Option<Uuid>,
    pub name: String,
    pub score: u8,
    pub time_taken_seconds: u32,
    pub submitted_at: DateTime<Utc>,
}

/// Review of a single question after submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionReview {
    pub question_id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub selected_option_index: Option<usize>,
    pub correct_option_index: usize,
    pub is_correct: bool,
}

/// Everything the results page shows for a submitted attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsReport {
    pub attempt_id: Uuid,
    pub exam_id: String,
    pub exam_title: String,
    pub taker: String,
    pub time_taken_seconds: u32,
    pub passing_score: u8,
    #[serde(flatten)]
    pub result: ScoreResult,
    pub questions: Vec<QuestionReview>,
    pub message: String,
}

/// Response body for a submit request.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitResponse {
    Submitted { result: ScoreResult },
    AlreadySubmitted { result: ScoreResult },
    NeedsConfirmation { unanswered: usize },
    Incomplete { unanswered: usize },
}

/// Query parameters for the leaderboard.
#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<usize>,
}
