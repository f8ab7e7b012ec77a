//! Per-tick simulation and gameplay reactions
//!
//! Bound to the game's events: `tick` runs due scheduled tasks and then
//! `simulate`; `hit`, `bounce` and `goal` are triggered from `simulate` and
//! handled here too.

use super::collision::{crossed_goal_line, paddle_contact, rebound_angle, wall_contact};
use super::rules::{Outcome, outcome, scoring_side};
use super::schedule::Deferred;
use super::state::{GamePhase, Side};
use crate::events::names::{BOUNCE, GAME_OVER, GOAL, HIT, RESET, SERVE};
use crate::events::{Bindable, HandlerResult};
use crate::game::Game;

/// Fire the scheduled actions that are due this tick
pub fn run_scheduled(game: &mut Game) -> HandlerResult {
    for action in game.scheduler.take_due(game.time_ticks) {
        match action {
            Deferred::Serve(side) => serve(game, side)?,
            Deferred::Reset => game.trigger(RESET)?,
        }
    }
    Ok(())
}

/// Put the ball in play from `side`
pub fn serve(game: &mut Game, side: Side) -> HandlerResult {
    game.ball.serve(side, &mut game.rng);
    log::debug!(
        "Serve from {:?}: pos=({:.3}, {:.3}) angle={:.3} v={:.3}",
        side,
        game.ball.pos.x,
        game.ball.pos.y,
        game.ball.angle(),
        game.ball.velocity
    );
    game.trigger(SERVE)
}

/// Advance paddles and ball by one tick
pub fn simulate(game: &mut Game) -> HandlerResult {
    if game.phase != GamePhase::Gameplay {
        return Ok(());
    }

    for side in Side::BOTH {
        let keys = game.settings.controls.for_side(side);
        let raise = game.keys.is_down(keys.raise);
        let lower = game.keys.is_down(keys.lower);
        // Both held cancel out
        match (raise, lower) {
            (true, false) => game.raise_paddle(side),
            (false, true) => game.lower_paddle(side),
            _ => {}
        }
    }

    if !game.ball.in_motion {
        return Ok(());
    }

    let tick_rate = game.settings.tick_rate as f32;
    let bounds = game.ball.bounds(game.aspect_ratio());

    if let Some(side) = Side::toward(game.ball.displacement(tick_rate).x) {
        let paddle = game.players[side.index()].paddle.bounds();
        if paddle_contact(&bounds, &paddle, side) {
            game.trigger(HIT)?;
        }
    }
    // A hit may have changed the heading
    if wall_contact(&bounds, game.ball.displacement(tick_rate).y) {
        game.trigger(BOUNCE)?;
    }
    if crossed_goal_line(&bounds) {
        game.trigger(GOAL)?;
    }

    game.ball.advance(tick_rate);
    Ok(())
}

/// Return the ball off the paddle it is heading toward
pub fn on_hit(game: &mut Game) -> HandlerResult {
    let tick_rate = game.settings.tick_rate as f32;
    game.ball.randomize_velocity(&mut game.rng);
    let Some(side) = Side::toward(game.ball.displacement(tick_rate).x) else {
        return Ok(());
    };
    let ball_height = game.ball.height(game.aspect_ratio());
    let paddle = game.players[side.index()].paddle;
    let angle = rebound_angle(game.ball.pos.y, ball_height, &paddle, side);
    game.ball.set_angle(angle);
    log::debug!("Hit by {:?} paddle, new angle {:.3}", side, game.ball.angle());
    Ok(())
}

pub fn on_bounce(game: &mut Game) -> HandlerResult {
    game.ball.reflect_vertical();
    log::debug!("Bounce, new angle {:.3}", game.ball.angle());
    Ok(())
}

/// Stop the ball, credit the point, then either end the game or serve again
pub fn on_goal(game: &mut Game) -> HandlerResult {
    game.ball.stop();

    let dx = game.ball.displacement(game.settings.tick_rate as f32).x;
    let scorer = scoring_side(dx);
    game.players[scorer.index()].score += 1;
    log::info!(
        "Goal! {} scores ({} - {})",
        game.players[scorer.index()].name,
        game.players[0].score,
        game.players[1].score
    );

    match outcome(game.scores(), game.settings.game_point, game.settings.win_margin) {
        Outcome::Won(_) => game.trigger(GAME_OVER),
        Outcome::Continue => {
            let delay = game.settings.delay_ticks(game.settings.goal_delay_secs);
            game.scheduler
                .schedule(game.time_ticks, delay, Deferred::Serve(scorer));
            Ok(())
        }
    }
}
