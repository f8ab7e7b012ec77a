//! Game phase controller
//!
//! Setup -> Title on `reset`, Title -> Gameplay on `start`, Gameplay ->
//! GameOver on `gameOver`, and back to Title on the next `reset`. Each
//! transition is a set of independent handlers bound to the event.

use super::rules::{Outcome, outcome};
use super::schedule::Deferred;
use super::state::{GamePhase, Side};
use crate::events::names::RESET;
use crate::events::{Bindable, HandlerResult};
use crate::game::Game;
use crate::highscores::HighScores;
use crate::ui::{NameEntry, TitleScreen, WinnerDialog, format_leaderboard};

/// The start key only works from the title screen
pub fn accepts_start(phase: GamePhase) -> bool {
    phase == GamePhase::Title
}

/// The leaderboard can only be wiped from the title screen
pub fn accepts_score_clear(phase: GamePhase) -> bool {
    phase == GamePhase::Title
}

/// Paddles only move during play
pub fn accepts_paddle_input(phase: GamePhase) -> bool {
    phase == GamePhase::Gameplay
}

// --- reset ---

pub fn enter_title(game: &mut Game) -> HandlerResult {
    game.phase = GamePhase::Title;
    game.scheduler.advance_epoch();
    game.name_entry = None;
    log::info!("Phase -> Title");
    Ok(())
}

pub fn reset_players(game: &mut Game) -> HandlerResult {
    for player in &mut game.players {
        player.reset();
    }
    Ok(())
}

pub fn show_title(game: &mut Game) -> HandlerResult {
    let max = game.high_scores.max_entries();
    game.high_scores = HighScores::from_entries(game.store.load(), max);

    let screen = TitleScreen {
        title: game.settings.title.clone(),
        controls: game.settings.controls.description.clone(),
        leaderboard: format_leaderboard(
            &game.settings.high_scores.heading,
            game.high_scores.entries(),
        ),
    };
    game.modal.show_title(&screen);
    Ok(())
}

// --- start ---

pub fn enter_gameplay(game: &mut Game) -> HandlerResult {
    game.phase = GamePhase::Gameplay;
    game.scheduler.advance_epoch();
    log::info!("Phase -> Gameplay");
    Ok(())
}

pub fn start_clock(game: &mut Game) -> HandlerResult {
    game.started_at = game.time_ticks;
    Ok(())
}

/// Coin toss for the first serve, after the goal delay
pub fn schedule_first_serve(game: &mut Game) -> HandlerResult {
    let side = Side::random(&mut game.rng);
    let delay = game.settings.delay_ticks(game.settings.goal_delay_secs);
    game.scheduler
        .schedule(game.time_ticks, delay, Deferred::Serve(side));
    Ok(())
}

pub fn hide_modal(game: &mut Game) -> HandlerResult {
    game.modal.hide();
    Ok(())
}

// --- gameOver ---

pub fn enter_game_over(game: &mut Game) -> HandlerResult {
    game.phase = GamePhase::GameOver;
    log::info!("Phase -> GameOver");
    Ok(())
}

pub fn stop_clock(game: &mut Game) -> HandlerResult {
    game.ended_at = game.time_ticks;
    Ok(())
}

/// Announce the winner; ask for initials on a record time, otherwise return
/// to the title screen after the reset delay
pub fn show_winner(game: &mut Game) -> HandlerResult {
    let scores = game.scores();
    let winner = match outcome(scores, game.settings.game_point, game.settings.win_margin) {
        Outcome::Won(side) => side,
        // gameOver triggered outside the rules; credit whoever leads
        Outcome::Continue if scores[0] > scores[1] => Side::Left,
        Outcome::Continue => Side::Right,
    };
    let elapsed_secs = game.elapsed_secs();
    let is_high_score = game.high_scores.is_high_score(elapsed_secs);

    let dialog = WinnerDialog {
        winner: game.players[winner.index()].name.clone(),
        elapsed_secs,
        is_high_score,
        prompt: is_high_score.then(|| game.settings.high_scores.prompt.clone()),
    };
    log::info!("{} in {:.3}s", dialog.header(), elapsed_secs);
    game.modal.show_winner(&dialog);

    if is_high_score {
        game.name_entry = Some(NameEntry::new(game.settings.high_scores.name_length));
    } else {
        let delay = game.settings.delay_ticks(game.settings.reset_delay_secs);
        game.scheduler.schedule(game.time_ticks, delay, Deferred::Reset);
    }
    Ok(())
}

// --- scoreSubmit ---

/// Record the entered name with this game's time, then go back to the title
pub fn submit_score(game: &mut Game) -> HandlerResult {
    let Some(name) = game.pending_name.take() else {
        log::debug!("Score submitted without a name; ignoring");
        return Ok(());
    };
    let elapsed_secs = game.elapsed_secs();
    if let Some(rank) = game.high_scores.add(name.clone(), elapsed_secs) {
        log::info!("{name} placed #{rank} with {elapsed_secs:.3}s");
        game.store.save(game.high_scores.entries());
    }
    game.trigger(RESET)
}
