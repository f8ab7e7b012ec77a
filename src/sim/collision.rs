//! Collision detection for the table
//!
//! Everything is an axis-aligned box in table space. Tests use the ball's
//! current position, before this tick's displacement is applied.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Paddle, Side};

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Aabb {
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            left: center.x - width / 2.0,
            top: center.y - height / 2.0,
            right: center.x + width / 2.0,
            bottom: center.y + height / 2.0,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Strict overlap of the vertical extents
    #[inline]
    pub fn overlaps_vertically(&self, other: &Aabb) -> bool {
        self.bottom > other.top && self.top < other.bottom
    }
}

/// Check whether the ball's leading edge is inside the paddle on `side`.
///
/// Only the edge facing the paddle counts: the right edge against the right
/// paddle, the left edge against the left paddle.
pub fn paddle_contact(ball: &Aabb, paddle: &Aabb, side: Side) -> bool {
    let edge = match side {
        Side::Left => ball.left,
        Side::Right => ball.right,
    };
    edge > paddle.left && edge < paddle.right && ball.overlaps_vertically(paddle)
}

/// Check whether the ball is past the top or bottom wall while still moving
/// into it
pub fn wall_contact(ball: &Aabb, dy: f32) -> bool {
    (dy < 0.0 && ball.top < 0.0) || (dy > 0.0 && ball.bottom > 1.0)
}

/// Check whether the ball has crossed either goal line
pub fn crossed_goal_line(ball: &Aabb) -> bool {
    ball.right > 1.0 || ball.left < 0.0
}

/// Return angle after the ball strikes the paddle on `side`.
///
/// Dead center sends the ball back along the horizontal axis; the further
/// from center, the steeper the return. The offset is scaled by the paddle
/// height plus two ball heights, which keeps the angle inside ±π/2.
pub fn rebound_angle(ball_y: f32, ball_height: f32, paddle: &Paddle, side: Side) -> f32 {
    let reach = paddle.height + 2.0 * ball_height;
    match side {
        // Returned leftward; below center heads down-left
        Side::Right => PI + (ball_y - paddle.y) / reach * PI,
        // Returned rightward; above center heads up-right
        Side::Left => (paddle.y - ball_y) / reach * PI,
    }
}
