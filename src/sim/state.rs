//! Game entities
//!
//! Table space is normalized: x and y run from 0 to 1, y grows downward.
//! Ball width is a fraction of table width; its height is scaled by the
//! drawing surface's aspect ratio so it looks square on screen.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::settings::{BallSettings, PaddleSettings};
use crate::{heading, normalize_angle};

/// Overall state of the program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Built but not yet initialized
    #[default]
    Setup,
    /// Title screen with leaderboard, waiting for start
    Title,
    /// Active gameplay
    Gameplay,
    /// Winner dialog
    GameOver,
}

/// A side of the table; also identifies the player who defends it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Coin toss
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Side {
        if rng.random_bool(0.5) {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// Side a horizontal displacement is heading toward
    pub fn toward(dx: f32) -> Option<Side> {
        if dx > 0.0 {
            Some(Side::Right)
        } else if dx < 0.0 {
            Some(Side::Left)
        } else {
            None
        }
    }
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Center position
    pub pos: Vec2,
    /// Heading in radians, always in [0, 2π); 0 points right, π/2 up
    angle: f32,
    /// Table widths per second
    pub velocity: f32,
    pub in_motion: bool,
    /// Width as a fraction of table width
    pub size: f32,
    pub angle_restriction: f32,
    pub min_velocity: f32,
    pub max_velocity: f32,
}

impl Ball {
    pub fn new(settings: &BallSettings) -> Self {
        Self {
            pos: Vec2::splat(0.5),
            angle: 0.0,
            velocity: 0.0,
            in_motion: false,
            size: settings.size,
            angle_restriction: settings.angle_restriction,
            min_velocity: settings.min_velocity,
            max_velocity: settings.max_velocity,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = normalize_angle(angle);
    }

    pub fn width(&self) -> f32 {
        self.size
    }

    pub fn height(&self, aspect_ratio: f32) -> f32 {
        self.size * aspect_ratio
    }

    pub fn bounds(&self, aspect_ratio: f32) -> Aabb {
        Aabb::centered(self.pos, self.width(), self.height(aspect_ratio))
    }

    /// Movement over one tick
    pub fn displacement(&self, tick_rate: f32) -> Vec2 {
        heading(self.angle) * (self.velocity / tick_rate)
    }

    /// Reflect across the horizontal axis (wall bounce)
    pub fn reflect_vertical(&mut self) {
        self.set_angle(-self.angle);
    }

    pub fn start(&mut self) {
        self.in_motion = true;
    }

    pub fn stop(&mut self) {
        self.in_motion = false;
    }

    /// Apply one tick of motion (no-op while stopped)
    pub fn advance(&mut self, tick_rate: f32) {
        if !self.in_motion {
            return;
        }
        self.pos += self.displacement(tick_rate);
    }

    pub fn randomize_velocity<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.velocity =
            (self.max_velocity - self.min_velocity) * rng.random::<f32>() + self.min_velocity;
    }

    /// Put the ball in play from `side`'s half, heading toward the other half
    pub fn serve<R: Rng + ?Sized>(&mut self, side: Side, rng: &mut R) {
        let cone = self.angle_restriction;
        // Cone of width `cone` centred on π (pointing left)
        let mut angle = FRAC_PI_2 + rng.random::<f32>() * cone + (PI - cone) / 2.0;

        self.randomize_velocity(rng);
        self.pos.y = rng.random::<f32>() * (1.0 - 2.0 * self.size) + self.size;
        // Anywhere in the serving half with the whole ball on the table
        let half_start = match side {
            Side::Left => 0.0,
            Side::Right => 0.5,
        };
        self.pos.x = half_start + self.size / 2.0 + rng.random::<f32>() * (0.5 - self.size);

        let leftward = angle > FRAC_PI_2 && angle < 3.0 * FRAC_PI_2;
        let toward_server = match side {
            Side::Left => leftward,
            Side::Right => !leftward,
        };
        if toward_server {
            angle += PI;
        }
        self.set_angle(angle);
        self.start();
    }
}

/// A player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Fixed horizontal center
    pub x: f32,
    /// Vertical center, clamped to [0, 1]
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Table heights per second
    pub speed: f32,
}

impl Paddle {
    pub fn new(x: f32, settings: &PaddleSettings) -> Self {
        Self {
            x,
            y: 0.5,
            width: settings.width,
            height: settings.height,
            speed: settings.speed,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::centered(Vec2::new(self.x, self.y), self.width, self.height)
    }

    pub fn reset(&mut self) {
        self.y = 0.5;
    }

    /// Move one tick toward y = 0
    pub fn raise(&mut self, tick_rate: f32) {
        self.y = (self.y - self.speed / tick_rate).max(0.0);
    }

    /// Move one tick toward y = 1
    pub fn lower(&mut self, tick_rate: f32) {
        self.y = (self.y + self.speed / tick_rate).min(1.0);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub score: u32,
    pub paddle: Paddle,
}

impl Player {
    pub fn new(name: impl Into<String>, paddle: Paddle) -> Self {
        Self {
            name: name.into(),
            score: 0,
            paddle,
        }
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.paddle.reset();
    }
}
