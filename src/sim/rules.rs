//! Scoring rules
//!
//! Pure functions, independent of the event system.

use super::state::Side;

/// Result of checking the score after a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Won(Side),
}

/// Player credited when the ball leaves the table with horizontal motion `dx`.
///
/// Exiting on the right credits the left player and vice versa.
pub fn scoring_side(dx: f32) -> Side {
    if dx > 0.0 { Side::Left } else { Side::Right }
}

/// Check whether a game is decided.
///
/// A player wins once they have at least `game_point` points and lead by at
/// least `margin`.
pub fn outcome(scores: [u32; 2], game_point: u32, margin: u32) -> Outcome {
    let (leader, lead) = if scores[0] >= scores[1] {
        (Side::Left, scores[0] - scores[1])
    } else {
        (Side::Right, scores[1] - scores[0])
    };
    if scores[leader.index()] >= game_point && lead >= margin {
        Outcome::Won(leader)
    } else {
        Outcome::Continue
    }
}

/// Elapsed game time in seconds between two simulation ticks
pub fn elapsed_secs(start_tick: u64, end_tick: u64, tick_rate: u32) -> f32 {
    end_tick.saturating_sub(start_tick) as f32 / tick_rate as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_margin_rule() {
        assert_eq!(outcome([10, 9], 11, 2), Outcome::Continue);
        assert_eq!(outcome([11, 10], 11, 2), Outcome::Continue);
        assert_eq!(outcome([11, 9], 11, 2), Outcome::Won(Side::Left));
        assert_eq!(outcome([12, 14], 11, 2), Outcome::Won(Side::Right));
        assert_eq!(outcome([0, 0], 11, 2), Outcome::Continue);
    }

    #[test]
    fn test_scoring_side() {
        assert_eq!(scoring_side(0.01), Side::Left);
        assert_eq!(scoring_side(-0.01), Side::Right);
    }

    #[test]
    fn test_elapsed_secs() {
        assert_eq!(elapsed_secs(60, 660, 60), 10.0);
        assert_eq!(elapsed_secs(10, 5, 60), 0.0);
    }

    proptest! {
        #[test]
        fn game_over_iff_point_and_margin(a in 0u32..30, b in 0u32..30) {
            let over = a.max(b) >= 11 && a.abs_diff(b) >= 2;
            prop_assert_eq!(outcome([a, b], 11, 2) != Outcome::Continue, over);
            if let Outcome::Won(side) = outcome([a, b], 11, 2) {
                prop_assert_eq!(side, if a > b { Side::Left } else { Side::Right });
            }
        }
    }
}
