//! Title screen, winner dialog and name entry
//!
//! Presentation is up to the `Modal` implementation; this module owns the
//! text the dialogs show and the name-entry buffer.

use crate::highscores::HighScoreEntry;

/// Dialog surface
pub trait Modal {
    fn show_title(&mut self, title: &TitleScreen);
    fn show_winner(&mut self, dialog: &WinnerDialog);
    fn hide(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleScreen {
    pub title: String,
    pub controls: String,
    /// Empty when there are no high scores
    pub leaderboard: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WinnerDialog {
    pub winner: String,
    pub elapsed_secs: f32,
    /// When set, the dialog asks for a name
    pub is_high_score: bool,
    /// Name-entry prompt, shown only for a record time
    pub prompt: Option<String>,
}

impl WinnerDialog {
    pub fn header(&self) -> String {
        format!("{} WINS", self.winner.to_uppercase())
    }

    pub fn time_line(&self) -> String {
        format!("IN {:.3} SECONDS", self.elapsed_secs)
    }
}

/// Leaderboard text, one numbered line per entry under `heading`
pub fn format_leaderboard(heading: &str, entries: &[HighScoreEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut text = format!("{heading}\n");
    for (i, entry) in entries.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} - {:.3} SECONDS\n",
            i + 1,
            entry.name,
            entry.score
        ));
    }
    text
}

/// Upper-cased initials typed after a record game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    buffer: String,
    length: usize,
}

impl NameEntry {
    pub fn new(length: usize) -> Self {
        Self {
            buffer: String::with_capacity(length),
            length,
        }
    }

    /// Add a character; returns the finished name once it is full
    pub fn push(&mut self, c: char) -> Option<String> {
        if c.is_control() || self.buffer.chars().count() >= self.length {
            return None;
        }
        self.buffer.extend(c.to_uppercase());
        if self.buffer.chars().count() >= self.length {
            Some(self.buffer.chars().take(self.length).collect())
        } else {
            None
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

/// Modal that writes its dialogs to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogModal;

impl Modal for LogModal {
    fn show_title(&mut self, title: &TitleScreen) {
        log::info!("{}\n{}", title.title, title.controls);
        if !title.leaderboard.is_empty() {
            log::info!("{}", title.leaderboard.trim_end());
        }
    }

    fn show_winner(&mut self, dialog: &WinnerDialog) {
        log::info!("{} {}", dialog.header(), dialog.time_line());
        if let Some(prompt) = &dialog.prompt {
            log::info!("{}", prompt.trim_end());
        }
    }

    fn hide(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_entry_uppercases_and_completes() {
        let mut entry = NameEntry::new(3);
        assert_eq!(entry.push('a'), None);
        assert_eq!(entry.push('b'), None);
        assert_eq!(entry.as_str(), "AB");
        assert_eq!(entry.push('c'), Some("ABC".to_string()));
        // Full buffer ignores further input
        assert_eq!(entry.push('d'), None);
    }

    #[test]
    fn test_name_entry_backspace() {
        let mut entry = NameEntry::new(3);
        entry.push('x');
        entry.push('y');
        entry.backspace();
        assert_eq!(entry.as_str(), "X");
        assert_eq!(entry.push('\n'), None);
        assert_eq!(entry.as_str(), "X");
    }

    #[test]
    fn test_leaderboard_text() {
        let entries = vec![
            HighScoreEntry::new("AAA", 61.5),
            HighScoreEntry::new("BBB", 90.0),
        ];
        let text = format_leaderboard("TOP SCORES:", &entries);
        assert_eq!(
            text,
            "TOP SCORES:\n1. AAA - 61.500 SECONDS\n2. BBB - 90.000 SECONDS\n"
        );
        assert!(format_leaderboard("TOP SCORES:", &[]).is_empty());
    }

    #[test]
    fn test_winner_dialog_text() {
        let dialog = WinnerDialog {
            winner: "Player 2".into(),
            elapsed_secs: 75.25,
            is_high_score: false,
            prompt: None,
        };
        assert_eq!(dialog.header(), "PLAYER 2 WINS");
        assert_eq!(dialog.time_line(), "IN 75.250 SECONDS");
    }
}
