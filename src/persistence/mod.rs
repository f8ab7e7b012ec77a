//! High score storage
//!
//! Backends:
//! - `MemoryStore`: process-lifetime only
//! - `JsonFileStore`: a JSON array on disk
//! - `FallbackStore`: wraps any backend and degrades to memory on failure,
//!   so callers never see a storage error

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::highscores::HighScoreEntry;

/// Where high scores live between games
pub trait ScoreStore {
    fn load(&mut self) -> Result<Vec<HighScoreEntry>, StorageError>;
    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<HighScoreEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Result<Vec<HighScoreEntry>, StorageError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<(), StorageError> {
        self.entries = entries.to_vec();
        Ok(())
    }
}

/// Scores stored as a JSON array of `{ "name", "score" }` objects
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<Vec<HighScoreEntry>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)?;
        let mut entries: Vec<HighScoreEntry> = serde_json::from_str(&json)?;
        entries.sort_by(|a, b| a.score.total_cmp(&b.score));
        log::debug!("Loaded {} high scores from {}", entries.len(), self.path.display());
        Ok(entries)
    }

    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<(), StorageError> {
        let json = serde_json::to_string(entries)?;
        fs::write(&self.path, json)?;
        log::debug!("High scores saved ({} entries)", entries.len());
        Ok(())
    }
}

/// Wraps a backend; after its first failure all reads and writes go to an
/// in-memory copy for the rest of the process.
pub struct FallbackStore {
    primary: Box<dyn ScoreStore>,
    memory: Option<MemoryStore>,
}

impl FallbackStore {
    pub fn new(primary: Box<dyn ScoreStore>) -> Self {
        Self {
            primary,
            memory: None,
        }
    }

    /// True once the primary backend has failed
    pub fn is_degraded(&self) -> bool {
        self.memory.is_some()
    }

    pub fn load(&mut self) -> Vec<HighScoreEntry> {
        if let Some(memory) = &self.memory {
            return memory.entries.clone();
        }
        match self.primary.load() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("High score storage unavailable, keeping scores in memory: {e}");
                self.memory = Some(MemoryStore::new());
                Vec::new()
            }
        }
    }

    pub fn save(&mut self, entries: &[HighScoreEntry]) {
        if let Some(memory) = &mut self.memory {
            memory.entries = entries.to_vec();
            return;
        }
        if let Err(e) = self.primary.save(entries) {
            log::warn!("High score storage unavailable, keeping scores in memory: {e}");
            self.memory = Some(MemoryStore {
                entries: entries.to_vec(),
            });
        }
    }
}

impl Default for FallbackStore {
    fn default() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }
}
