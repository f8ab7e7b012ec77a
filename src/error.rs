//! Error types for event binding, settings, storage and gameplay

use thiserror::Error;

/// Contract violations when binding event handlers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("event names must be a string or a sequence of strings, found {found}")]
    InvalidNames { found: &'static str },
    #[error("event name at index {index} must be a string, found {found}")]
    NonStringName { index: usize, found: &'static str },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored scores are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("handler for `{event}` failed: {reason}")]
    Handler { event: String, reason: String },
}
