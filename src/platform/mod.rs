//! Platform abstraction layer
//!
//! Handles the pieces that depend on the host:
//! - Held-key table fed by raw key events
//! - Fixed-timestep accumulator that turns wall-clock time into ticks

use std::collections::HashSet;

use crate::consts::{MAX_FRAME_SECS, MAX_SUBSTEPS};
use crate::settings::KeyCode;

/// Keys currently held down
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    down: HashSet<KeyCode>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press; returns false for auto-repeat of a held key
    pub fn press(&mut self, code: KeyCode) -> bool {
        self.down.insert(code)
    }

    pub fn release(&mut self, code: KeyCode) {
        self.down.remove(&code);
    }

    pub fn is_down(&self, code: KeyCode) -> bool {
        self.down.contains(&code)
    }

    /// Forget every held key (e.g. focus lost)
    pub fn clear(&mut self) {
        self.down.clear();
    }
}

/// Converts variable frame times into whole fixed ticks
#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f32,
    accumulator: f32,
    max_substeps: u32,
}

impl FixedStep {
    /// `dt` is the length of one tick in seconds
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Add a frame's elapsed time; returns how many ticks to run now
    pub fn advance(&mut self, frame_secs: f32) -> u32 {
        // Clamp long stalls so the sim doesn't try to catch up all at once
        self.accumulator += frame_secs.clamp(0.0, MAX_FRAME_SECS);

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            self.accumulator -= self.dt;
            substeps += 1;
        }
        if substeps == self.max_substeps {
            // Spiral of death guard: drop the backlog
            self.accumulator = self.accumulator.min(self.dt);
        }
        substeps
    }
}
