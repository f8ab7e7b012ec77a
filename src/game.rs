//! Application context
//!
//! `Game` owns the event bus, the entities, the configuration and the
//! collaborators (renderer, audio, dialogs, score storage). All gameplay
//! happens through events triggered on it.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, SoundBank};
use crate::error::GameError;
use crate::events::names::*;
use crate::events::{Bindable, EventBus};
use crate::highscores::HighScores;
use crate::persistence::{FallbackStore, ScoreStore};
use crate::platform::KeyState;
use crate::renderer::{Frame, NullRenderer, Renderer};
use crate::settings::{KeyCode, Settings};
use crate::sim::{self, Ball, GamePhase, Paddle, Player, Scheduler, Side, phase, tick};
use crate::ui::{LogModal, Modal, NameEntry};

pub struct Game {
    pub(crate) settings: Settings,
    bus: EventBus<Game>,
    pub(crate) phase: GamePhase,
    pub(crate) ball: Ball,
    pub(crate) players: [Player; 2],
    pub(crate) keys: KeyState,
    pub(crate) rng: Pcg32,
    /// Simulation clock
    pub(crate) time_ticks: u64,
    pub(crate) scheduler: Scheduler,
    pub(crate) started_at: u64,
    pub(crate) ended_at: u64,
    pub(crate) high_scores: HighScores,
    pub(crate) store: FallbackStore,
    /// Present while the winner dialog is asking for initials
    pub(crate) name_entry: Option<NameEntry>,
    /// Completed initials waiting for `scoreSubmit`
    pub(crate) pending_name: Option<String>,
    pub(crate) renderer: Box<dyn Renderer>,
    pub(crate) audio: Box<dyn AudioSink>,
    pub(crate) modal: Box<dyn Modal>,
}

impl Bindable for Game {
    fn event_bus(&self) -> &EventBus<Self> {
        &self.bus
    }

    fn event_bus_mut(&mut self) -> &mut EventBus<Self> {
        &mut self.bus
    }
}

impl Game {
    /// Build a game with headless collaborators and in-memory scores
    pub fn new(settings: Settings, seed: u64) -> Result<Self, GameError> {
        settings.validate()?;

        let paddle = &settings.paddle;
        let players = [
            Player::new(
                settings.player_names[0].clone(),
                Paddle::new(paddle.offset, paddle),
            ),
            Player::new(
                settings.player_names[1].clone(),
                Paddle::new(1.0 - paddle.offset, paddle),
            ),
        ];

        let mut game = Self {
            ball: Ball::new(&settings.ball),
            players,
            high_scores: HighScores::new(settings.high_scores.max_entries),
            settings,
            bus: EventBus::new(),
            phase: GamePhase::Setup,
            keys: KeyState::new(),
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            scheduler: Scheduler::new(),
            started_at: 0,
            ended_at: 0,
            store: FallbackStore::default(),
            name_entry: None,
            pending_name: None,
            renderer: Box::new(NullRenderer::default()),
            audio: Box::new(SoundBank::default()),
            modal: Box::new(LogModal),
        };
        game.wire()?;
        Ok(game)
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_modal(mut self, modal: impl Modal + 'static) -> Self {
        self.modal = Box::new(modal);
        self
    }

    pub fn with_store(mut self, store: impl ScoreStore + 'static) -> Self {
        self.store = FallbackStore::new(Box::new(store));
        self
    }

    /// Bind the built-in subscribers. Order within an event is dispatch order.
    fn wire(&mut self) -> Result<(), GameError> {
        self.bind(INIT, |g: &mut Game| g.trigger(RESET))?;

        self.bind(RESET, phase::enter_title)?;
        self.bind(RESET, phase::reset_players)?;
        self.bind(RESET, phase::show_title)?;

        self.bind(START, phase::enter_gameplay)?;
        self.bind(START, phase::start_clock)?;
        self.bind(START, phase::schedule_first_serve)?;
        self.bind(START, phase::hide_modal)?;

        self.bind(GAME_OVER, phase::enter_game_over)?;
        self.bind(GAME_OVER, phase::stop_clock)?;
        self.bind(GAME_OVER, phase::show_winner)?;

        self.bind(SCORE_SUBMIT, phase::submit_score)?;

        self.bind(TICK, tick::run_scheduled)?;
        self.bind(TICK, tick::simulate)?;
        self.bind(TICK, |g: &mut Game| {
            let frame = g.frame();
            g.renderer.draw(&frame);
            Ok(())
        })?;

        self.bind(HIT, tick::on_hit)?;
        self.bind(BOUNCE, tick::on_bounce)?;
        self.bind(GOAL, tick::on_goal)?;

        for binding in self.settings.sounds.clone() {
            let cue = binding.cue;
            self.bind(&binding.on, move |g: &mut Game| {
                g.audio.play(cue);
                Ok(())
            })?;
        }
        Ok(())
    }

    /// Show the title screen
    pub fn init(&mut self) -> Result<(), GameError> {
        self.trigger(INIT)
    }

    /// Advance the simulation clock by one tick
    pub fn step(&mut self) -> Result<(), GameError> {
        self.time_ticks += 1;
        self.trigger(TICK)
    }

    /// Key pressed. The start key begins a game from the title screen.
    pub fn key_down(&mut self, code: KeyCode) -> Result<(), GameError> {
        self.keys.press(code);
        if code == self.settings.controls.start && phase::accepts_start(self.phase) {
            self.trigger(START)?;
        }
        Ok(())
    }

    pub fn key_up(&mut self, code: KeyCode) {
        self.keys.release(code);
    }

    /// Forget held keys, e.g. when the window loses focus
    pub fn release_all_keys(&mut self) {
        self.keys.clear();
    }

    /// Typed character for the high-score name. Completing the name
    /// submits it.
    pub fn type_char(&mut self, c: char) -> Result<(), GameError> {
        if self.phase != GamePhase::GameOver {
            return Ok(());
        }
        let Some(entry) = self.name_entry.as_mut() else {
            return Ok(());
        };
        if let Some(name) = entry.push(c) {
            self.name_entry = None;
            self.pending_name = Some(name);
            self.trigger(SCORE_SUBMIT)?;
        }
        Ok(())
    }

    pub fn erase_char(&mut self) {
        if let Some(entry) = self.name_entry.as_mut() {
            entry.backspace();
        }
    }

    /// Wipe the leaderboard and redraw the title screen; ignored outside it
    pub fn clear_high_scores(&mut self) -> Result<(), GameError> {
        if !phase::accepts_score_clear(self.phase) {
            return Ok(());
        }
        self.high_scores.clear();
        self.store.save(&[]);
        log::info!("High scores cleared");
        self.trigger(RESET)
    }

    /// Move a paddle up one tick; ignored outside gameplay
    pub fn raise_paddle(&mut self, side: Side) {
        if phase::accepts_paddle_input(self.phase) {
            let tick_rate = self.settings.tick_rate as f32;
            self.players[side.index()].paddle.raise(tick_rate);
        }
    }

    /// Move a paddle down one tick; ignored outside gameplay
    pub fn lower_paddle(&mut self, side: Side) {
        if phase::accepts_paddle_input(self.phase) {
            let tick_rate = self.settings.tick_rate as f32;
            self.players[side.index()].paddle.lower(tick_rate);
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn scores(&self) -> [u32; 2] {
        [self.players[0].score, self.players[1].score]
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// True while the winner dialog is waiting for initials
    pub fn awaiting_name(&self) -> bool {
        self.name_entry.is_some()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.renderer.aspect_ratio()
    }

    /// Game time so far (during play) or the final time (after it)
    pub fn elapsed_secs(&self) -> f32 {
        let end = match self.phase {
            GamePhase::GameOver => self.ended_at,
            _ => self.time_ticks,
        };
        sim::elapsed_secs(self.started_at, end, self.settings.tick_rate)
    }

    /// Read-only snapshot for the renderer
    pub fn frame(&self) -> Frame {
        let aspect = self.aspect_ratio();
        Frame {
            phase: self.phase,
            paddles: [
                self.players[0].paddle.bounds(),
                self.players[1].paddle.bounds(),
            ],
            ball: self.ball.in_motion.then(|| self.ball.bounds(aspect)),
            scores: self.scores(),
            elapsed_secs: (self.phase == GamePhase::Gameplay).then(|| self.elapsed_secs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundCue;
    use crate::error::{EventError, StorageError};
    use crate::highscores::HighScoreEntry;
    use crate::persistence::MemoryStore;
    use crate::settings::SoundBinding;
    use crate::ui::{TitleScreen, WinnerDialog};
    use std::cell::RefCell;
    use std::f32::consts::PI;
    use std::rc::Rc;

    const START_KEY: KeyCode = KeyCode(13);
    const P1_RAISE: KeyCode = KeyCode(16);
    const P1_LOWER: KeyCode = KeyCode(17);

    /// Shared log of everything the collaborators were asked to do
    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl Recorder {
        fn events(&self) -> Vec<String> {
            self.0.borrow().clone()
        }

        fn count(&self, what: &str) -> usize {
            self.0.borrow().iter().filter(|e| e.as_str() == what).count()
        }
    }

    impl AudioSink for Recorder {
        fn play(&mut self, cue: SoundCue) {
            self.0.borrow_mut().push(format!("play:{cue}"));
        }
    }

    impl Modal for Recorder {
        fn show_title(&mut self, title: &TitleScreen) {
            self.0.borrow_mut().push(format!("title:{}", title.leaderboard.lines().count()));
        }
        fn show_winner(&mut self, dialog: &WinnerDialog) {
            self.0
                .borrow_mut()
                .push(format!("winner:{}:{}", dialog.winner, dialog.is_high_score));
            if let Some(prompt) = &dialog.prompt {
                self.0.borrow_mut().push(format!("prompt:{prompt}"));
            }
        }
        fn hide(&mut self) {
            self.0.borrow_mut().push("hide".to_string());
        }
    }

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&mut self) -> Result<Vec<HighScoreEntry>, StorageError> {
            Err(std::io::Error::other("no storage").into())
        }
        fn save(&mut self, _: &[HighScoreEntry]) -> Result<(), StorageError> {
            Err(std::io::Error::other("no storage").into())
        }
    }

    fn game_with(store: impl ScoreStore + 'static) -> (Game, Recorder) {
        let recorder = Recorder::default();
        let mut game = Game::new(Settings::default(), 42)
            .unwrap()
            .with_renderer(NullRenderer::new(1.0))
            .with_audio(recorder.clone())
            .with_modal(recorder.clone())
            .with_store(store);
        game.init().unwrap();
        (game, recorder)
    }

    fn game() -> (Game, Recorder) {
        game_with(MemoryStore::new())
    }

    fn steps(game: &mut Game, n: u64) {
        for _ in 0..n {
            game.step().unwrap();
        }
    }

    /// Start a game and run until the first serve is in play
    fn start_rally(game: &mut Game) {
        game.key_down(START_KEY).unwrap();
        game.key_up(START_KEY);
        let delay = game.settings.delay_ticks(game.settings.goal_delay_secs);
        steps(game, delay);
        assert!(game.ball.in_motion);
    }

    fn place_ball(game: &mut Game, x: f32, y: f32, angle: f32) {
        game.ball.pos = glam::Vec2::new(x, y);
        game.ball.set_angle(angle);
        game.ball.velocity = 0.5;
        game.ball.start();
    }

    /// Start a game and let the left player take it 11 - 0
    fn left_wins(game: &mut Game) {
        start_rally(game);
        game.players[0].score = 10;
        place_ball(game, 0.995, 0.2, 0.0);
        steps(game, 1);
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    fn prompts(recorder: &Recorder) -> usize {
        recorder
            .events()
            .iter()
            .filter(|e| e.starts_with("prompt:"))
            .count()
    }

    #[test]
    fn test_init_shows_title() {
        let (game, recorder) = game();
        assert_eq!(game.phase(), GamePhase::Title);
        assert_eq!(game.scores(), [0, 0]);
        assert_eq!(recorder.events(), vec!["title:0"]);
    }

    #[test]
    fn test_start_key_only_from_title() {
        let (mut game, recorder) = game();
        game.key_down(KeyCode(99)).unwrap();
        assert_eq!(game.phase(), GamePhase::Title);

        game.key_down(START_KEY).unwrap();
        assert_eq!(game.phase(), GamePhase::Gameplay);
        assert_eq!(recorder.count("hide"), 1);

        // Pressing start again mid-game does nothing
        game.key_up(START_KEY);
        game.key_down(START_KEY).unwrap();
        assert_eq!(recorder.count("hide"), 1);
    }

    #[test]
    fn test_first_serve_waits_for_goal_delay() {
        let (mut game, _) = game();
        game.key_down(START_KEY).unwrap();
        steps(&mut game, 59);
        assert!(!game.ball.in_motion);
        steps(&mut game, 1);
        assert!(game.ball.in_motion);
    }

    #[test]
    fn test_paddles_ignore_input_outside_gameplay() {
        let (mut game, _) = game();
        game.key_down(P1_RAISE).unwrap();
        steps(&mut game, 10);
        assert_eq!(game.player(Side::Left).paddle.y, 0.5);

        game.raise_paddle(Side::Left);
        assert_eq!(game.player(Side::Left).paddle.y, 0.5);
    }

    #[test]
    fn test_paddle_moves_during_gameplay() {
        let (mut game, _) = game();
        game.key_down(START_KEY).unwrap();
        game.key_down(P1_RAISE).unwrap();
        steps(&mut game, 1);
        let expected = 0.5 - game.settings.paddle.speed / 60.0;
        assert!((game.player(Side::Left).paddle.y - expected).abs() < 1e-6);

        // Opposite keys held together cancel out
        let y = game.player(Side::Left).paddle.y;
        game.key_down(P1_LOWER).unwrap();
        steps(&mut game, 5);
        assert_eq!(game.player(Side::Left).paddle.y, y);

        game.key_up(P1_RAISE);
        steps(&mut game, 1);
        assert!(game.player(Side::Left).paddle.y > y);
    }

    #[test]
    fn test_goal_on_right_credits_left_player_and_reserves() {
        let (mut game, recorder) = game();
        start_rally(&mut game);
        place_ball(&mut game, 0.995, 0.2, 0.0);

        steps(&mut game, 1);
        assert_eq!(game.scores(), [1, 0]);
        assert!(!game.ball.in_motion);
        assert_eq!(recorder.count("play:goal"), 1);
        // Frozen where the goal was detected
        assert!((game.ball.pos.x - 0.995).abs() < 1e-6);
        assert!(game.frame().ball.is_none());

        steps(&mut game, 60);
        assert!(game.ball.in_motion);
        assert!(game.ball.displacement(60.0).x > 0.0, "left player serves rightward");
    }

    #[test]
    fn test_goal_on_left_credits_right_player() {
        let (mut game, _) = game();
        start_rally(&mut game);
        place_ball(&mut game, 0.005, 0.2, PI);
        steps(&mut game, 1);
        assert_eq!(game.scores(), [0, 1]);
    }

    #[test]
    fn test_bounce_reflects_vertical_motion() {
        let (mut game, recorder) = game();
        start_rally(&mut game);
        place_ball(&mut game, 0.5, 0.004, PI / 3.0);
        let before = game.ball.displacement(60.0);

        steps(&mut game, 1);
        let after = game.ball.displacement(60.0);
        assert!((after.x - before.x).abs() < 1e-6);
        assert!(before.y < 0.0 && after.y > 0.0);
        assert!((game.ball.angle() - 5.0 * PI / 3.0).abs() < 1e-5);
        assert_eq!(recorder.count("play:wall"), 1);
    }

    #[test]
    fn test_hit_returns_ball() {
        let (mut game, recorder) = game();
        start_rally(&mut game);
        let paddle_y = game.player(Side::Right).paddle.y;
        place_ball(&mut game, 0.89, paddle_y, 0.0);

        steps(&mut game, 1);
        assert!(game.ball.displacement(60.0).x < 0.0);
        assert!((game.ball.angle() - PI).abs() < 1e-5);
        assert!(game.ball.velocity >= game.settings.ball.min_velocity);
        assert_eq!(recorder.count("play:paddle"), 1);
    }

    #[test]
    fn test_game_over_and_high_score_entry() {
        let (mut game, recorder) = game();
        start_rally(&mut game);
        // Freeze play so the clock can run without stray goals
        game.ball.stop();
        steps(&mut game, 539);
        game.players[0].score = 10;
        game.players[1].score = 9;
        place_ball(&mut game, 0.995, 0.2, 0.0);

        steps(&mut game, 1);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.scores(), [11, 9]);
        assert!(recorder.events().contains(&"winner:Player 1:true".to_string()));
        assert!((game.elapsed_secs() - 10.0).abs() < 1e-4);
        assert!(game.awaiting_name());

        // Ticks keep running but nothing moves
        steps(&mut game, 400);
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.type_char('a').unwrap();
        game.type_char('b').unwrap();
        assert_eq!(game.phase(), GamePhase::GameOver);
        game.type_char('c').unwrap();

        assert_eq!(game.phase(), GamePhase::Title);
        assert_eq!(game.scores(), [0, 0]);
        let entries = game.high_scores().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "ABC");
        assert!((entries[0].score - 10.0).abs() < 1e-4);
        assert_eq!(recorder.events().last().unwrap(), "title:2");
    }

    #[test]
    fn test_slow_game_resets_after_delay() {
        let mut store = MemoryStore::new();
        let fast: Vec<_> = (1..=5)
            .map(|i| HighScoreEntry::new("FST", i as f32))
            .collect();
        store.save(&fast).unwrap();
        let (mut game, recorder) = game_with(store);

        start_rally(&mut game);
        game.ball.stop();
        steps(&mut game, 600);
        game.players[1].score = 12;
        game.players[0].score = 10;
        place_ball(&mut game, 0.005, 0.2, PI);
        steps(&mut game, 1);

        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(!game.awaiting_name());
        assert!(recorder.events().contains(&"winner:Player 2:false".to_string()));

        // Typing is ignored when there is no record to claim
        game.type_char('x').unwrap();

        steps(&mut game, 299);
        assert_eq!(game.phase(), GamePhase::GameOver);
        steps(&mut game, 1);
        assert_eq!(game.phase(), GamePhase::Title);
        assert_eq!(game.high_scores().entries().len(), 5);
    }

    #[test]
    fn test_reset_cancels_pending_serve() {
        let (mut game, _) = game();
        game.key_down(START_KEY).unwrap();
        steps(&mut game, 10);
        game.trigger(RESET).unwrap();

        steps(&mut game, 120);
        assert_eq!(game.phase(), GamePhase::Title);
        assert!(!game.ball.in_motion);
    }

    #[test]
    fn test_storage_failure_is_invisible() {
        let (mut game, _) = game_with(BrokenStore);
        start_rally(&mut game);
        game.players[0].score = 10;
        place_ball(&mut game, 0.995, 0.2, 0.0);
        steps(&mut game, 1);
        assert!(game.awaiting_name());

        for c in "zed".chars() {
            game.type_char(c).unwrap();
        }
        assert_eq!(game.phase(), GamePhase::Title);
        assert_eq!(game.high_scores().entries()[0].name, "ZED");
    }

    #[test]
    fn test_prompt_only_on_record_time() {
        let (mut game, recorder) = game();
        left_wins(&mut game);
        assert!(
            recorder
                .events()
                .contains(&"prompt:NEW HIGH SCORE!\nENTER YOUR NAME: ".to_string())
        );

        let mut store = MemoryStore::new();
        let fast: Vec<_> = (1..=5)
            .map(|i| HighScoreEntry::new("FST", i as f32 / 10.0))
            .collect();
        store.save(&fast).unwrap();
        let (mut game, recorder) = game_with(store);
        left_wins(&mut game);
        assert!(!game.awaiting_name());
        assert_eq!(prompts(&recorder), 0);
    }

    #[test]
    fn test_erase_char_during_name_entry() {
        let (mut game, _) = game();
        left_wins(&mut game);

        game.type_char('a').unwrap();
        game.type_char('b').unwrap();
        game.erase_char();
        game.type_char('x').unwrap();
        assert_eq!(game.phase(), GamePhase::GameOver);
        game.type_char('y').unwrap();

        assert_eq!(game.phase(), GamePhase::Title);
        assert_eq!(game.high_scores().entries()[0].name, "AXY");
    }

    #[test]
    fn test_release_all_keys_stops_paddle() {
        let (mut game, _) = game();
        game.key_down(START_KEY).unwrap();
        game.key_down(P1_LOWER).unwrap();
        steps(&mut game, 1);
        let y = game.player(Side::Left).paddle.y;
        assert!(y > 0.5);

        game.release_all_keys();
        steps(&mut game, 5);
        assert_eq!(game.player(Side::Left).paddle.y, y);
    }

    #[test]
    fn test_clear_high_scores_ignored_mid_game() {
        let mut store = MemoryStore::new();
        store.save(&[HighScoreEntry::new("OLD", 30.0)]).unwrap();
        let (mut game, recorder) = game_with(store);
        start_rally(&mut game);
        game.players[0].score = 4;

        game.clear_high_scores().unwrap();
        assert_eq!(game.phase(), GamePhase::Gameplay);
        assert_eq!(game.scores()[0], 4);
        assert_eq!(game.high_scores().entries().len(), 1);
        assert_eq!(recorder.count("title:0"), 0);
    }

    #[test]
    fn test_clear_high_scores() {
        let mut store = MemoryStore::new();
        store.save(&[HighScoreEntry::new("OLD", 30.0)]).unwrap();
        let (mut game, recorder) = game_with(store);
        assert_eq!(game.high_scores().entries().len(), 1);
        assert_eq!(recorder.events(), vec!["title:2"]);

        game.clear_high_scores().unwrap();
        assert!(game.high_scores().is_empty());
        assert_eq!(recorder.events().last().unwrap(), "title:0");
    }

    #[test]
    fn test_failing_subscriber_surfaces_from_step() {
        let (mut game, _) = game();
        game.bind(TICK, |_: &mut Game| {
            Err(GameError::Handler {
                event: TICK.to_string(),
                reason: "renderer lost".to_string(),
            })
        })
        .unwrap();
        assert!(matches!(game.step(), Err(GameError::Handler { .. })));
    }

    #[test]
    fn test_bad_sound_binding_fails_construction() {
        let mut settings = Settings::default();
        settings.sounds.push(SoundBinding {
            on: serde_json::json!(7),
            cue: SoundCue::Goal,
        });
        let err = Game::new(settings, 1).err().unwrap();
        assert!(matches!(
            err,
            GameError::Event(EventError::InvalidNames { found: "number" })
        ));
    }

    #[test]
    fn test_frame_snapshot() {
        let (mut game, _) = game();
        let frame = game.frame();
        assert_eq!(frame.phase, GamePhase::Title);
        assert!(frame.ball.is_none());
        assert!(frame.elapsed_secs.is_none());

        start_rally(&mut game);
        let frame = game.frame();
        assert!(frame.ball.is_some());
        assert_eq!(frame.elapsed_secs, Some(1.0));
        assert!((frame.paddles[0].left - (0.1 - 0.0175 / 2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_serve() {
        let (mut a, _) = game();
        let (mut b, _) = game();
        start_rally(&mut a);
        start_rally(&mut b);
        assert_eq!(a.ball, b.ball);
    }
}
