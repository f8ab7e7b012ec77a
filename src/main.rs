//! Pong entry point
//!
//! Headless native driver: loads settings, runs the fixed-step loop for a
//! bounded time with logging collaborators, and keeps high scores in a JSON
//! file next to the working directory.
//!
//! Usage: `pong [settings.json] [seconds]`

use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use pong_engine::audio::SoundBank;
use pong_engine::persistence::JsonFileStore;
use pong_engine::platform::FixedStep;
use pong_engine::renderer::LogRenderer;
use pong_engine::sim::GamePhase;
use pong_engine::ui::LogModal;
use pong_engine::{Game, GameError, Settings};

const HIGH_SCORE_FILE: &str = "highscores.json";
const DEFAULT_RUN_SECS: u64 = 30;
/// Initials entered on behalf of the unattended players
const ATTRACT_NAME: &str = "CPU";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pong (headless) starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), GameError> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    let run_secs = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RUN_SECS);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    log::info!("Seed {seed}, running for {run_secs}s");

    let tick_secs = settings.tick_secs();
    let mut game = Game::new(settings, seed)?
        .with_renderer(LogRenderer::default())
        .with_audio(SoundBank::default())
        .with_modal(LogModal)
        .with_store(JsonFileStore::new(HIGH_SCORE_FILE));
    game.init()?;

    let mut stepper = FixedStep::new(tick_secs);
    let deadline = Instant::now() + Duration::from_secs(run_secs);
    let mut last = Instant::now();

    while last < deadline {
        attract(&mut game)?;

        let now = Instant::now();
        let ticks = stepper.advance((now - last).as_secs_f32());
        last = now;
        for _ in 0..ticks {
            game.step()?;
        }

        thread::sleep(Duration::from_secs_f32(stepper.dt()));
    }

    log::info!("Stopped after {} ticks", game.time_ticks());
    Ok(())
}

/// Nobody is at the keyboard: start games and sign record times
fn attract(game: &mut Game) -> Result<(), GameError> {
    match game.phase() {
        GamePhase::Title => {
            let start = game.settings().controls.start;
            game.key_down(start)?;
            game.key_up(start);
        }
        GamePhase::GameOver if game.awaiting_name() => {
            let length = game.settings().high_scores.name_length;
            for c in ATTRACT_NAME.chars().cycle().take(length) {
                game.type_char(c)?;
            }
        }
        _ => {}
    }
    Ok(())
}
