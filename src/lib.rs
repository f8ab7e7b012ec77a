//! Pong - the classic two-player paddle game
//!
//! Core modules:
//! - `events`: Named-event publish/subscribe bus
//! - `sim`: Deterministic simulation (entities, collisions, scoring, phases)
//! - `game`: Application context that owns the bus, entities and collaborators
//! - `highscores`: Best-times leaderboard policy
//! - `persistence`: High-score storage backends with in-memory fallback
//! - `settings`: Load-time configuration
//! - `audio`, `renderer`, `ui`, `platform`: Collaborator seams

pub mod audio;
pub mod error;
pub mod events;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{EventError, GameError, SettingsError, StorageError};
pub use events::{Bindable, EventBus};
pub use game::Game;
pub use highscores::{HighScoreEntry, HighScores};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration defaults
pub mod consts {
    use std::f32::consts::PI;

    /// Simulation ticks per second
    pub const TICK_RATE: u32 = 60;
    /// Pause between a goal (or the start) and the next serve, in seconds
    pub const GOAL_DELAY_SECS: f32 = 1.0;
    /// Pause before returning to the title screen after a game, in seconds
    pub const RESET_DELAY_SECS: f32 = 5.0;

    /// Points needed to win (subject to the margin rule)
    pub const GAME_POINT: u32 = 11;
    /// Lead required over the opponent to win
    pub const WIN_MARGIN: u32 = 2;

    /// Ball defaults (table-width units)
    pub const BALL_SIZE: f32 = 0.015;
    pub const BALL_ANGLE_RESTRICTION: f32 = PI * 2.0 / 3.0;
    pub const BALL_MIN_VELOCITY: f32 = 0.4;
    pub const BALL_MAX_VELOCITY: f32 = 0.6;

    /// Paddle defaults
    pub const PADDLE_OFFSET: f32 = 0.1;
    pub const PADDLE_SPEED: f32 = 0.85;
    pub const PADDLE_WIDTH: f32 = 0.0175;
    pub const PADDLE_HEIGHT: f32 = 0.07;

    /// Leaderboard size
    pub const MAX_HIGH_SCORES: usize = 5;
    /// Characters in a leaderboard name
    pub const NAME_LENGTH: usize = 3;

    /// Largest wall-clock delta fed to the fixed-step driver
    pub const MAX_FRAME_SECS: f32 = 0.1;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Unit heading for an angle in table space (y grows downward)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), -angle.sin())
}
