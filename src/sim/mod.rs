//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod phase;
pub mod rules;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{Aabb, crossed_goal_line, paddle_contact, rebound_angle, wall_contact};
pub use rules::{Outcome, elapsed_secs, outcome, scoring_side};
pub use schedule::{Deferred, Scheduler};
pub use state::{Ball, GamePhase, Paddle, Player, Side};
