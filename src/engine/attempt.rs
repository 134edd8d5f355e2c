// src/engine/attempt.rs

use std::sync::Arc;

use crate::{
    config::SubmitPolicy,
    engine::{
        notifier::{NoticeLevel, Notifier},
        scoring,
        timer::{Countdown, Tick},
    },
    models::{
        attempt::{AttemptState, AttemptStatus},
        exam::Exam,
        exam_record::ScoreResult,
    },
};

/// What a submit request led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The attempt was frozen and scored by this call.
    Submitted(ScoreResult),
    /// An earlier call already submitted; nothing changed.
    AlreadySubmitted(ScoreResult),
    /// Unanswered questions remain and the taker has not confirmed yet.
    NeedsConfirmation { unanswered: usize },
    /// The policy forbids submitting with unanswered questions.
    Incomplete { unanswered: usize },
}

/// Drives one taker through one exam: navigation, selections, the countdown,
/// and the single transition into `Submitted`.
pub struct AttemptController {
    exam: Arc<Exam>,
    state: AttemptState,
    countdown: Countdown,
    policy: SubmitPolicy,
    notifier: Arc<dyn Notifier>,
    result: Option<ScoreResult>,
}

impl AttemptController {
    pub fn new(exam: Arc<Exam>, policy: SubmitPolicy, notifier: Arc<dyn Notifier>) -> Self {
        let state = AttemptState::new(exam.time_limit_seconds);
        let countdown = Countdown::new(exam.time_limit_seconds);
        Self {
            exam,
            state,
            countdown,
            policy,
            notifier,
            result: None,
        }
    }

    pub fn exam(&self) -> &Arc<Exam> {
        &self.exam
    }

    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    pub fn result(&self) -> Option<&ScoreResult> {
        self.result.as_ref()
    }

    pub fn status(&self) -> AttemptStatus {
        self.state.status
    }

    pub fn unanswered(&self) -> usize {
        self.exam
            .questions
            .iter()
            .filter(|q| self.state.selected(&q.id).is_none())
            .count()
    }

    pub fn time_taken_seconds(&self) -> u32 {
        self.exam
            .time_limit_seconds
            .saturating_sub(self.state.time_remaining_seconds)
    }

    pub fn start(&mut self) {
        if self.state.status != AttemptStatus::NotStarted {
            return;
        }
        self.state = self.state.clone().started();
        tracing::debug!(exam_id = %self.exam.id, "Attempt started");
    }

    /// Records a selection. Returns false (and changes nothing) when the
    /// attempt is not running, the question is unknown, or the option index is
    /// out of range.
    pub fn select_answer(&mut self, question_id: &str, option_index: usize) -> bool {
        if self.state.status != AttemptStatus::InProgress {
            tracing::debug!(question_id, "Ignoring selection outside a running attempt");
            return false;
        }

        let Some(question) = self.exam.question(question_id) else {
            tracing::debug!(question_id, "Ignoring selection for unknown question");
            return false;
        };

        if !question.has_option(option_index) {
            tracing::debug!(question_id, option_index, "Ignoring out-of-range option");
            return false;
        }

        self.state = self.state.clone().with_answer(question_id, option_index);
        true
    }

    /// Moves to `index`, clamped to the question range.
    pub fn go_to(&mut self, index: i64) -> usize {
        if self.state.submitted() {
            return self.state.current_question_index;
        }

        let last = self.exam.question_count().saturating_sub(1);
        let clamped = usize::try_from(index.max(0)).map_or(last, |i| i.min(last));
        self.state = self.state.clone().with_index(clamped);
        clamped
    }

    pub fn next(&mut self) -> usize {
        let current = self.state.current_question_index as i64;
        self.go_to(current + 1)
    }

    pub fn previous(&mut self) -> usize {
        let current = self.state.current_question_index as i64;
        self.go_to(current - 1)
    }

    /// Manual submission, subject to the configured policy.
    pub fn submit(&mut self, confirmed: bool) -> SubmitOutcome {
        if let Some(result) = &self.result {
            return SubmitOutcome::AlreadySubmitted(result.clone());
        }

        let unanswered = self.unanswered();
        if unanswered > 0 {
            match self.policy {
                SubmitPolicy::Immediate => {}
                SubmitPolicy::ConfirmUnanswered if confirmed => {}
                SubmitPolicy::ConfirmUnanswered => {
                    return SubmitOutcome::NeedsConfirmation { unanswered };
                }
                SubmitPolicy::RequireAllAnswered => {
                    return SubmitOutcome::Incomplete { unanswered };
                }
            }
        }

        let result = self.finish();
        self.notifier.notify(
            NoticeLevel::Success,
            &format!(
                "Submitted '{}': {}% ({}/{})",
                self.exam.title, result.score_percent, result.correct_count, result.total_questions
            ),
        );
        SubmitOutcome::Submitted(result)
    }

    /// Forced submission when the countdown runs out. Skips the policy.
    pub fn on_time_up(&mut self) -> SubmitOutcome {
        if let Some(result) = &self.result {
            return SubmitOutcome::AlreadySubmitted(result.clone());
        }

        let result = self.finish();
        self.notifier.notify(
            NoticeLevel::Warning,
            &format!(
                "Time's up! '{}' was submitted automatically: {}%",
                self.exam.title, result.score_percent
            ),
        );
        SubmitOutcome::Submitted(result)
    }

    /// Advances the countdown by one second while the attempt is running.
    pub fn tick(&mut self) -> Tick {
        if self.state.status != AttemptStatus::InProgress {
            return Tick::Stopped;
        }

        let tick = self.countdown.tick();
        self.state = self
            .state
            .clone()
            .with_time_remaining(self.countdown.remaining());
        if tick == Tick::TimeUp {
            self.on_time_up();
        }
        tick
    }

    fn finish(&mut self) -> ScoreResult {
        self.countdown.stop();
        self.state = self.state.clone().into_submitted();

        let result = scoring::score(&self.exam, &self.state);
        tracing::info!(
            exam_id = %self.exam.id,
            score = result.score_percent,
            passed = result.passed,
            "Attempt submitted"
        );
        self.result = Some(result.clone());
        result
    }
}
