// src/engine/report.rs

use uuid::Uuid;

use crate::models::{
    attempt::AttemptState,
    exam::Exam,
    exam_record::{QuestionReview, ResultsReport, ScoreResult},
};

/// Lays a submitted attempt next to the answer key for the results page.
pub fn build_report(
    attempt_id: Uuid,
    taker: &str,
    exam: &Exam,
    state: &AttemptState,
    result: &ScoreResult,
    time_taken_seconds: u32,
) -> ResultsReport {
    let questions = exam
        .questions
        .iter()
        .zip(&result.per_question_correctness)
        .map(|(q, is_correct)| QuestionReview {
            question_id: q.id.clone(),
            prompt: q.prompt.clone(),
            options: q.options.clone(),
            selected_option_index: state.selected(&q.id),
            correct_option_index: q.correct_option_index,
            is_correct: *is_correct,
        })
        .collect();

    let message = if result.passed {
        "Congratulations, you passed!".to_string()
    } else {
        format!("Score too low. {}% is needed to pass.", exam.passing_score)
    };

    ResultsReport {
        attempt_id,
        exam_id: exam.id.clone(),
        exam_title: exam.title.clone(),
        taker: taker.to_string(),
        time_taken_seconds,
        passing_score: exam.passing_score,
        result: result.clone(),
        questions,
        message,
    }
}
