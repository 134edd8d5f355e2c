// src/services/attempts.rs

use std::{
    collections::HashMap,
    ops::ControlFlow,
    sync::{Arc, Weak},
    time::Duration,
};

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{
    config::{DEFAULT_ATTEMPT_RETENTION_SECONDS, LEADERBOARD_MAX_LIMIT, SubmitPolicy},
    engine::{
        attempt::{AttemptController, SubmitOutcome},
        leaderboard::Leaderboard,
        notifier::Notifier,
        provider::ExamProvider,
        report::build_report,
        timer::{TICK_PERIOD, Tick, TimerGuard},
    },
    error::AppError,
    models::{
        attempt::{AttemptStatus, AttemptView, NavigateRequest},
        exam::{ExamSummary, PublicExam},
        exam_record::{LeaderboardEntry, ResultsReport, SubmitResponse},
        question::PublicQuestion,
        taker::Taker,
    },
};

/// One taker's live sitting: the controller plus the timer feeding it.
pub struct AttemptSession {
    pub id: Uuid,
    pub taker: Taker,
    controller: AttemptController,
    timer: Option<TimerGuard>,
}

impl AttemptSession {
    fn view(&self) -> AttemptView {
        let exam = self.controller.exam();
        let state = self.controller.state();
        AttemptView {
            attempt_id: self.id,
            exam_id: exam.id.clone(),
            taker: self.taker.name.clone(),
            status: state.status,
            current_question_index: state.current_question_index,
            total_questions: exam.question_count(),
            current_question: PublicQuestion::from(&exam.questions[state.current_question_index]),
            answers: state.answers.clone(),
            unanswered: self.controller.unanswered(),
            time_remaining_seconds: state.time_remaining_seconds,
            result: self.controller.result().cloned(),
        }
    }

    fn placement(&self) -> Option<LeaderboardEntry> {
        let result = self.controller.result()?;
        Some(LeaderboardEntry {
            rank: 0,
            taker_id: Some(self.taker.id),
            name: self.taker.name.clone(),
            score: result.score_percent,
            time_taken_seconds: self.controller.time_taken_seconds(),
            submitted_at: Utc::now(),
        })
    }
}

type SessionHandle = Arc<Mutex<AttemptSession>>;
type Registry = RwLock<HashMap<Uuid, SessionHandle>>;

/// Registry of attempt sessions and the glue between them, the exam provider
/// and the leaderboard.
///
/// Submitted attempts stay fetchable for the retention window, then they are
/// evicted. Attempts that are never submitted are evicted after their time-up.
#[derive(Clone)]
pub struct AttemptService {
    provider: Arc<dyn ExamProvider>,
    leaderboard: Arc<Leaderboard>,
    notifier: Arc<dyn Notifier>,
    policy: SubmitPolicy,
    retention: Duration,
    sessions: Arc<Registry>,
}

impl AttemptService {
    pub fn new(
        provider: Arc<dyn ExamProvider>,
        leaderboard: Arc<Leaderboard>,
        notifier: Arc<dyn Notifier>,
        policy: SubmitPolicy,
    ) -> Self {
        Self {
            provider,
            leaderboard,
            notifier,
            policy,
            retention: Duration::from_secs(DEFAULT_ATTEMPT_RETENTION_SECONDS),
            sessions: Arc::default(),
        }
    }

    /// How long a finished attempt stays in the registry.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub async fn list_exams(&self) -> Vec<ExamSummary> {
        self.provider.list_exams().await
    }

    pub async fn exam(&self, exam_id: &str) -> Result<PublicExam, AppError> {
        let exam = self.provider.load_exam(exam_id).await?;
        Ok(PublicExam::from(exam.as_ref()))
    }

    pub async fn leaderboard(
        &self,
        exam_id: &str,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        // Unknown exams are a 404, not an empty board.
        self.provider.load_exam(exam_id).await?;
        let limit = limit.clamp(1, LEADERBOARD_MAX_LIMIT);
        Ok(self.leaderboard.top(exam_id, limit).await)
    }

    /// Starts a new attempt and its countdown.
    pub async fn start(&self, exam_id: &str, taker: &Taker) -> Result<AttemptView, AppError> {
        let exam = self.provider.load_exam(exam_id).await?;
        let mut controller = AttemptController::new(exam, self.policy, Arc::clone(&self.notifier));
        controller.start();

        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(AttemptSession {
            id,
            taker: taker.clone(),
            controller,
            timer: None,
        }));

        let timer = self.spawn_timer(&session);
        let view = {
            let mut guard = session.lock().await;
            guard.timer = Some(timer);
            guard.view()
        };

        self.sessions.write().await.insert(id, session);
        tracing::info!(%id, exam_id, taker = %taker.name, "Attempt started");
        Ok(view)
    }

    pub async fn view(&self, id: Uuid, taker: &Taker) -> Result<AttemptView, AppError> {
        let session = self.session(id, taker).await?;
        let guard = session.lock().await;
        Ok(guard.view())
    }

    /// Applies a selection. Invalid selections leave the attempt unchanged.
    pub async fn select_answer(
        &self,
        id: Uuid,
        taker: &Taker,
        question_id: &str,
        option_index: usize,
    ) -> Result<AttemptView, AppError> {
        let session = self.session(id, taker).await?;
        let mut guard = session.lock().await;
        guard.controller.select_answer(question_id, option_index);
        Ok(guard.view())
    }

    pub async fn navigate(
        &self,
        id: Uuid,
        taker: &Taker,
        request: NavigateRequest,
    ) -> Result<AttemptView, AppError> {
        let session = self.session(id, taker).await?;
        let mut guard = session.lock().await;
        match request {
            NavigateRequest::Next => guard.controller.next(),
            NavigateRequest::Previous => guard.controller.previous(),
            NavigateRequest::GoTo { index } => guard.controller.go_to(index),
        };
        Ok(guard.view())
    }

    pub async fn submit(
        &self,
        id: Uuid,
        taker: &Taker,
        confirmed: bool,
    ) -> Result<SubmitResponse, AppError> {
        let session = self.session(id, taker).await?;
        let mut guard = session.lock().await;

        let response = match guard.controller.submit(confirmed) {
            SubmitOutcome::Submitted(result) => {
                // Cancels the tick task; it may be waiting on this lock.
                guard.timer.take();
                if let Some(entry) = guard.placement() {
                    let exam_id = guard.controller.exam().id.clone();
                    self.leaderboard.record(&exam_id, entry).await;
                }
                schedule_eviction(Arc::downgrade(&self.sessions), id, self.retention);
                SubmitResponse::Submitted { result }
            }
            SubmitOutcome::AlreadySubmitted(result) => SubmitResponse::AlreadySubmitted { result },
            SubmitOutcome::NeedsConfirmation { unanswered } => {
                SubmitResponse::NeedsConfirmation { unanswered }
            }
            SubmitOutcome::Incomplete { unanswered } => SubmitResponse::Incomplete { unanswered },
        };
        Ok(response)
    }

    pub async fn report(&self, id: Uuid, taker: &Taker) -> Result<ResultsReport, AppError> {
        let session = self.session(id, taker).await?;
        let guard = session.lock().await;

        let result = guard
            .controller
            .result()
            .ok_or(AppError::Conflict("Attempt has not been submitted yet".to_string()))?;

        Ok(build_report(
            guard.id,
            &guard.taker.name,
            guard.controller.exam(),
            guard.controller.state(),
            result,
            guard.controller.time_taken_seconds(),
        ))
    }

    /// Drops the session. Its timer is cancelled with it.
    pub async fn abandon(&self, id: Uuid, taker: &Taker) -> Result<(), AppError> {
        self.session(id, taker).await?;
        let removed = self.sessions.write().await.remove(&id);
        if let Some(session) = removed {
            let mut guard = session.lock().await;
            guard.timer.take();
            if guard.controller.status() != AttemptStatus::Submitted {
                tracing::info!(%id, taker = %taker.name, "Attempt abandoned before submission");
            }
        }
        Ok(())
    }

    /// Looks up a session owned by `taker`. Ownership is by taker id, so a
    /// namesake's attempt is reported as missing too.
    async fn session(&self, id: Uuid, taker: &Taker) -> Result<SessionHandle, AppError> {
        let not_found = || AppError::NotFound("Attempt not found".to_string());

        let session = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(not_found)?;

        if session.lock().await.taker.id != taker.id {
            return Err(not_found());
        }
        Ok(session)
    }

    fn spawn_timer(&self, session: &SessionHandle) -> TimerGuard {
        let session = Arc::downgrade(session);
        let sessions = Arc::downgrade(&self.sessions);
        let leaderboard = Arc::clone(&self.leaderboard);
        let retention = self.retention;

        TimerGuard::spawn(TICK_PERIOD, move || {
            let session = session.clone();
            let sessions = sessions.clone();
            let leaderboard = Arc::clone(&leaderboard);
            async move {
                let Some(session) = session.upgrade() else {
                    return ControlFlow::Break(());
                };
                let mut guard = session.lock().await;

                match guard.controller.tick() {
                    Tick::Running(_) => ControlFlow::Continue(()),
                    Tick::TimeUp => {
                        tracing::info!(id = %guard.id, "Time is up, attempt submitted");
                        if let Some(entry) = guard.placement() {
                            let exam_id = guard.controller.exam().id.clone();
                            leaderboard.record(&exam_id, entry).await;
                        }
                        schedule_eviction(sessions, guard.id, retention);
                        ControlFlow::Break(())
                    }
                    Tick::Stopped => ControlFlow::Break(()),
                }
            }
        })
    }
}

/// Removes a finished attempt from the registry once `retention` has passed.
fn schedule_eviction(sessions: Weak<Registry>, id: Uuid, retention: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(retention).await;
        let Some(sessions) = sessions.upgrade() else {
            return;
        };
        if sessions.write().await.remove(&id).is_some() {
            tracing::debug!(%id, "Finished attempt evicted");
        }
    });
}
