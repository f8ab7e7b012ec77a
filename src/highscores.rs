//! High score leaderboard
//!
//! Scores are elapsed game times in seconds, so lower is better. Storage is
//! handled by `persistence`; this module only decides membership and order.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's initials
    pub name: String,
    /// Seconds taken to win
    pub score: f32,
}

impl HighScoreEntry {
    pub fn new(name: impl Into<String>, score: f32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Best-times leaderboard, sorted ascending by score
#[derive(Debug, Clone, PartialEq)]
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
    max_entries: usize,
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new(MAX_HIGH_SCORES)
    }
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Build a leaderboard from stored entries, restoring order and capacity
    pub fn from_entries(mut entries: Vec<HighScoreEntry>, max_entries: usize) -> Self {
        entries.retain(|e| e.score.is_finite());
        entries.sort_by(|a, b| a.score.total_cmp(&b.score));
        entries.truncate(max_entries);
        Self {
            entries,
            max_entries,
        }
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Check if a time qualifies for the leaderboard
    pub fn is_high_score(&self, seconds: f32) -> bool {
        if !seconds.is_finite() || self.max_entries == 0 {
            return false;
        }
        if self.entries.len() < self.max_entries {
            return true;
        }
        // Must strictly beat the slowest kept entry
        self.entries.last().is_some_and(|e| seconds < e.score)
    }

    /// Get the rank a time would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, seconds: f32) -> Option<usize> {
        if !self.is_high_score(seconds) {
            return None;
        }
        Some(self.insertion_point(seconds) + 1)
    }

    /// Add a time to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add(&mut self, name: impl Into<String>, seconds: f32) -> Option<usize> {
        if !self.is_high_score(seconds) {
            return None;
        }
        let pos = self.insertion_point(seconds);
        self.entries.insert(pos, HighScoreEntry::new(name, seconds));
        // Trim to max size, dropping the slowest
        self.entries.truncate(self.max_entries);
        Some(pos + 1)
    }

    /// Ties keep earlier entries ahead of the newcomer
    fn insertion_point(&self, seconds: f32) -> usize {
        self.entries
            .iter()
            .position(|e| seconds < e.score)
            .unwrap_or(self.entries.len())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the best time (if any)
    pub fn best(&self) -> Option<f32> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(scores: &[f32]) -> HighScores {
        let entries = scores
            .iter()
            .map(|&s| HighScoreEntry::new("AAA", s))
            .collect();
        HighScores::from_entries(entries, 5)
    }

    fn scores(hs: &HighScores) -> Vec<f32> {
        hs.entries().iter().map(|e| e.score).collect()
    }

    #[test]
    fn test_empty_board_accepts_anything() {
        let hs = HighScores::new(5);
        assert!(hs.is_high_score(999.0));
        assert_eq!(hs.potential_rank(999.0), Some(1));
    }

    #[test]
    fn test_insert_drops_slowest() {
        let mut hs = board(&[10.0, 12.0, 15.0, 18.0, 20.0]);
        assert!(hs.is_high_score(11.0));
        assert_eq!(hs.add("BOB", 11.0), Some(2));
        assert_eq!(scores(&hs), vec![10.0, 11.0, 12.0, 15.0, 18.0]);
        assert_eq!(hs.entries()[1].name, "BOB");
    }

    #[test]
    fn test_slow_time_rejected_when_full() {
        let mut hs = board(&[10.0, 12.0, 15.0, 18.0, 20.0]);
        assert!(!hs.is_high_score(25.0));
        assert_eq!(hs.add("BOB", 25.0), None);
        assert_eq!(scores(&hs), vec![10.0, 12.0, 15.0, 18.0, 20.0]);
    }

    #[test]
    fn test_tie_with_worst_is_not_high_score() {
        let hs = board(&[10.0, 12.0, 15.0, 18.0, 20.0]);
        assert!(!hs.is_high_score(20.0));
    }

    #[test]
    fn test_from_entries_sorts_and_truncates() {
        let hs = board(&[30.0, 5.0, 12.0, 8.0, 40.0, 1.0]);
        assert_eq!(scores(&hs), vec![1.0, 5.0, 8.0, 12.0, 30.0]);
        assert_eq!(hs.max_entries(), 5);
        assert_eq!(hs.best(), Some(1.0));
    }

    #[test]
    fn test_not_full_appends_at_end() {
        let mut hs = board(&[10.0, 12.0]);
        assert_eq!(hs.add("ZED", 50.0), Some(3));
        assert_eq!(scores(&hs), vec![10.0, 12.0, 50.0]);
    }

    #[test]
    fn test_nan_never_qualifies() {
        let hs = HighScores::new(5);
        assert!(!hs.is_high_score(f32::NAN));
    }

    #[test]
    fn test_clear() {
        let mut hs = board(&[10.0]);
        hs.clear();
        assert!(hs.is_empty());
        assert_eq!(hs.best(), None);
    }
}
