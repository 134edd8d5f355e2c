// src/engine/scoring.rs

use crate::models::{attempt::AttemptState, exam::Exam, exam_record::ScoreResult};

/// Scores an attempt against the exam's answer key.
///
/// Unanswered questions count as incorrect. Pure: neither input is touched.
pub fn score(exam: &Exam, state: &AttemptState) -> ScoreResult {
    let per_question_correctness: Vec<bool> = exam
        .questions
        .iter()
        .map(|q| q.is_correct(state.selected(&q.id)))
        .collect();

    let correct_count = per_question_correctness.iter().filter(|c| **c).count();
    let total_questions = per_question_correctness.len();
    let score_percent = percent(correct_count, total_questions);

    ScoreResult {
        correct_count,
        total_questions,
        score_percent,
        per_question_correctness,
        passed: passed(score_percent, exam.passing_score),
    }
}

/// `round(100 * correct / total)`, halves rounded up.
pub fn percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    ((200 * correct + total) / (2 * total)) as u8
}

pub fn passed(score_percent: u8, passing_score: u8) -> bool {
    score_percent >= passing_score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Question;

    fn exam_with_key(key: &[usize]) -> Exam {
        Exam {
            id: "scenario".to_string(),
            title: "Scenario".to_string(),
            description: String::new(),
            time_limit_seconds: 1800,
            passing_score: 70,
            questions: key
                .iter()
                .enumerate()
                .map(|(i, correct)| Question {
                    id: format!("q{i}"),
                    prompt: format!("Question {i}"),
                    options: (0..5).map(|o| format!("Option {o}")).collect(),
                    correct_option_index: *correct,
                })
                .collect(),
        }
    }

    fn answered(answers: &[usize]) -> AttemptState {
        answers
            .iter()
            .enumerate()
            .fold(AttemptState::new(1800).started(), |state, (i, a)| {
                state.with_answer(&format!("q{i}"), *a)
            })
    }

    #[test]
    fn test_score_perfect() {
        let exam = exam_with_key(&[0, 1, 2, 3, 4]);
        let result = score(&exam, &answered(&[0, 1, 2, 3, 4]));
        assert_eq!(result.correct_count, 5);
        assert_eq!(result.score_percent, 100);
        assert!(result.passed);
    }

    #[test]
    fn test_score_first_wrong() {
        let exam = exam_with_key(&[0, 1, 2, 3, 4]);
        let result = score(&exam, &answered(&[1, 1, 2, 3, 4]));
        assert_eq!(result.correct_count, 4);
        assert_eq!(result.score_percent, 80);
        assert_eq!(
            result.per_question_correctness,
            vec![false, true, true, true, true]
        );
        assert!(result.passed);
    }

    #[test]
    fn test_score_zero() {
        let exam = exam_with_key(&[0, 1, 2, 3, 4]);
        let result = score(&exam, &answered(&[4, 0, 1, 2, 3]));
        assert_eq!(result.correct_count, 0);
        assert_eq!(result.score_percent, 0);
        assert!(!result.passed);
    }

    #[test]
    fn test_unanswered_counts_as_wrong() {
        let exam = exam_with_key(&[0, 1, 2, 3, 4]);
        let result = score(&exam, &answered(&[0, 1]));
        assert_eq!(result.correct_count, 2);
        assert_eq!(result.total_questions, 5);
        assert_eq!(result.score_percent, 40);
    }

    #[test]
    fn test_pass_threshold_is_inclusive() {
        // 7 of 10 correct is exactly 70%.
        let exam = exam_with_key(&[0; 10]);
        let result = score(&exam, &answered(&[0, 0, 0, 0, 0, 0, 0, 1, 1, 1]));
        assert_eq!(result.score_percent, 70);
        assert!(result.passed);
    }

    #[test]
    fn test_score_is_pure() {
        let exam = exam_with_key(&[0, 1, 2]);
        let state = answered(&[0, 2, 2]);
        let (exam_before, state_before) = (exam.clone(), state.clone());
        assert_eq!(score(&exam, &state), score(&exam, &state));
        assert_eq!(exam, exam_before);
        assert_eq!(state, state_before);
    }

    #[test]
    fn test_percent_rounds_half_up() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13); // 12.5
        assert_eq!(percent(3, 8), 38); // 37.5
        assert_eq!(percent(0, 0), 0);
    }
}
