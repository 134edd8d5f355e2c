// src/engine/timer.rs

use std::{future::Future, ops::ControlFlow, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

/// Period between two countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Result of advancing a [`Countdown`] by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still counting; carries the seconds left.
    Running(u32),
    /// The tick that reached zero. Reported once per countdown.
    TimeUp,
    /// The countdown was stopped earlier, nothing changed.
    Stopped,
}

/// Seconds-based countdown advanced by explicit ticks.
///
/// Once stopped (manually or by reaching zero) it never resumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    stopped: bool,
}

impl Countdown {
    pub fn new(limit_seconds: u32) -> Self {
        Self {
            remaining: limit_seconds,
            stopped: false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn tick(&mut self) -> Tick {
        if self.stopped {
            return Tick::Stopped;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stopped = true;
            return Tick::TimeUp;
        }
        Tick::Running(self.remaining)
    }
}

/// Owns a background task that drives a callback once per period.
///
/// The task is aborted when the guard is dropped, so no tick can fire after
/// its owner is gone. The callback ends the loop by returning `Break`.
#[derive(Debug)]
pub struct TimerGuard {
    handle: JoinHandle<()>,
}

impl TimerGuard {
    pub fn spawn<F, Fut>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;

            loop {
                interval.tick().await;
                if on_tick().await.is_break() {
                    break;
                }
            }
            tracing::debug!("Timer loop finished");
        });

        Self { handle }
    }

    #[cfg(test)]
    fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
