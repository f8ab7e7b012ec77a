//! Rendering seam
//!
//! Once per tick the game hands its renderer a read-only `Frame`. The only
//! thing flowing back is the drawing surface's aspect ratio, which sizes the
//! ball vertically.

use crate::sim::{Aabb, GamePhase};

/// Everything needed to draw one tick
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub phase: GamePhase,
    pub paddles: [Aabb; 2],
    /// Present only while the ball is in play
    pub ball: Option<Aabb>,
    pub scores: [u32; 2],
    /// Running game time for the HUD (gameplay only)
    pub elapsed_secs: Option<f32>,
}

impl Frame {
    pub fn scoreline(&self) -> String {
        format!("{} - {}", self.scores[0], self.scores[1])
    }
}

pub trait Renderer {
    /// Surface width divided by height
    fn aspect_ratio(&self) -> f32;
    fn draw(&mut self, frame: &Frame);
}

/// Draws nothing; reports a fixed aspect ratio
#[derive(Debug, Clone, Copy)]
pub struct NullRenderer {
    aspect_ratio: f32,
}

impl NullRenderer {
    pub fn new(aspect_ratio: f32) -> Self {
        Self { aspect_ratio }
    }
}

impl Default for NullRenderer {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

impl Renderer for NullRenderer {
    fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    fn draw(&mut self, _frame: &Frame) {}
}

/// Headless renderer that logs the scoreline whenever it changes
#[derive(Debug, Clone, Default)]
pub struct LogRenderer {
    surface: NullRenderer,
    last_scores: Option<[u32; 2]>,
}

impl Renderer for LogRenderer {
    fn aspect_ratio(&self) -> f32 {
        self.surface.aspect_ratio()
    }

    fn draw(&mut self, frame: &Frame) {
        if self.last_scores != Some(frame.scores) {
            log::info!("Score {}", frame.scoreline());
            self.last_scores = Some(frame.scores);
        }
    }
}
