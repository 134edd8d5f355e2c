// src/engine/leaderboard.rs

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::models::exam_record::LeaderboardEntry;

/// Orders entries by score (high first), then time taken (fast first), then
/// submission time, and numbers them from 1.
pub fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.time_taken_seconds.cmp(&b.time_taken_seconds))
            .then(a.submitted_at.cmp(&b.submitted_at))
    });
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as u32 + 1;
    }
    entries
}

/// True if `candidate` should replace `current` as a taker's best result.
fn beats(candidate: &LeaderboardEntry, current: &LeaderboardEntry) -> bool {
    candidate.score > current.score
        || (candidate.score == current.score
            && candidate.time_taken_seconds < current.time_taken_seconds)
}

/// Rows from the same taker. Issued rows match on taker id; seeded rows carry
/// no id and match on name.
fn same_taker(a: &LeaderboardEntry, b: &LeaderboardEntry) -> bool {
    match (a.taker_id, b.taker_id) {
        (Some(a), Some(b)) => a == b,
        (None, None) => a.name == b.name,
        _ => false,
    }
}

/// Per-exam ranking tables, one best result per taker.
#[derive(Debug, Default)]
pub struct Leaderboard {
    boards: RwLock<HashMap<String, Vec<LeaderboardEntry>>>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads externally supplied rows for an exam.
    pub async fn seed(&self, exam_id: &str, entries: Vec<LeaderboardEntry>) {
        for entry in entries {
            self.record(exam_id, entry).await;
        }
    }

    /// Places a result, keeping the taker's earlier entry if it was better.
    pub async fn record(&self, exam_id: &str, entry: LeaderboardEntry) {
        let mut boards = self.boards.write().await;
        let board = boards.entry(exam_id.to_string()).or_default();

        match board.iter_mut().find(|e| same_taker(e, &entry)) {
            Some(existing) if beats(&entry, existing) => *existing = entry,
            Some(_) => {}
            None => board.push(entry),
        }
    }

    /// Ranked entries for an exam, best first, at most `limit` rows.
    pub async fn top(&self, exam_id: &str, limit: usize) -> Vec<LeaderboardEntry> {
        let entries = self
            .boards
            .read()
            .await
            .get(exam_id)
            .cloned()
            .unwrap_or_default();

        let mut ranked = rank(entries);
        ranked.truncate(limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn entry(name: &str, score: u8, time_taken_seconds: u32, minute: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            rank: 0,
            taker_id: None,
            name: name.to_string(),
            score,
            time_taken_seconds,
            submitted_at: Utc.with_ymd_and_hms(2026, 1, 1, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_rank_orders_by_score_then_time() {
        let ranked = rank(vec![
            entry("slow", 90, 900, 0),
            entry("low", 60, 100, 0),
            entry("fast", 90, 300, 0),
        ]);
        let names: Vec<_> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["fast", "slow", "low"]);
        let ranks: Vec<_> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, [1, 2, 3]);
    }

    #[test]
    fn test_rank_ties_fall_back_to_submission_time() {
        let ranked = rank(vec![entry("later", 80, 500, 30), entry("earlier", 80, 500, 5)]);
        assert_eq!(ranked[0].name, "earlier");
    }

    #[tokio::test]
    async fn test_record_keeps_best_per_taker() {
        let board = Leaderboard::new();
        board.record("rust", entry("ana", 80, 600, 0)).await;
        board.record("rust", entry("ana", 60, 100, 1)).await;
        board.record("rust", entry("ana", 80, 400, 2)).await;
        board.record("rust", entry("ben", 90, 900, 3)).await;

        let top = board.top("rust", 10).await;
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "ben");
        assert_eq!(top[1].name, "ana");
        assert_eq!(top[1].time_taken_seconds, 400);
    }

    #[tokio::test]
    async fn test_namesakes_keep_separate_rows() {
        let board = Leaderboard::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        board.seed("rust", vec![entry("ana", 50, 900, 0)]).await;
        board
            .record("rust", LeaderboardEntry { taker_id: Some(first), ..entry("ana", 70, 600, 1) })
            .await;
        board
            .record("rust", LeaderboardEntry { taker_id: Some(second), ..entry("ana", 90, 300, 2) })
            .await;
        board
            .record("rust", LeaderboardEntry { taker_id: Some(first), ..entry("ana", 80, 500, 3) })
            .await;

        let top = board.top("rust", 10).await;
        let rows: Vec<_> = top.iter().map(|e| (e.taker_id, e.score)).collect();
        assert_eq!(rows, [(Some(second), 90), (Some(first), 80), (None, 50)]);
    }

    #[tokio::test]
    async fn test_top_limits_and_separates_exams() {
        let board = Leaderboard::new();
        board
            .seed(
                "rust",
                vec![entry("a", 10, 1, 0), entry("b", 20, 1, 0), entry("c", 30, 1, 0)],
            )
            .await;

        let top = board.top("rust", 2).await;
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "c");
        assert!(board.top("web", 10).await.is_empty());
    }
}
