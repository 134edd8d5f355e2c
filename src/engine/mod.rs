// src/engine/mod.rs

//! The exam attempt core: countdown, attempt state machine, scoring and
//! ranking. Nothing in here knows about HTTP.

pub mod attempt;
pub mod leaderboard;
pub mod notifier;
pub mod provider;
pub mod report;
pub mod scoring;
pub mod timer;
