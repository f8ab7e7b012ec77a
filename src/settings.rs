//! Game settings
//!
//! Load-time configuration. Every tunable has a default, so a settings file
//! only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::audio::SoundCue;
use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::Side;

/// A raw input code as reported by the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSettings {
    /// Width as a fraction of table width
    pub size: f32,
    /// Width of the serve cone around the horizontal axis (radians)
    pub angle_restriction: f32,
    /// Table widths per second
    pub min_velocity: f32,
    pub max_velocity: f32,
}

impl Default for BallSettings {
    fn default() -> Self {
        Self {
            size: BALL_SIZE,
            angle_restriction: BALL_ANGLE_RESTRICTION,
            min_velocity: BALL_MIN_VELOCITY,
            max_velocity: BALL_MAX_VELOCITY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleSettings {
    /// Distance of each paddle from its own table edge
    pub offset: f32,
    /// Table heights per second
    pub speed: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for PaddleSettings {
    fn default() -> Self {
        Self {
            offset: PADDLE_OFFSET,
            speed: PADDLE_SPEED,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScoreSettings {
    pub max_entries: usize,
    pub name_length: usize,
    pub heading: String,
    pub prompt: String,
}

impl Default for HighScoreSettings {
    fn default() -> Self {
        Self {
            max_entries: MAX_HIGH_SCORES,
            name_length: NAME_LENGTH,
            heading: "TOP SCORES:".to_string(),
            prompt: "NEW HIGH SCORE!\nENTER YOUR NAME: ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerKeys {
    pub raise: KeyCode,
    pub lower: KeyCode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub start: KeyCode,
    pub players: [PlayerKeys; 2],
    pub description: String,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            start: KeyCode(13),
            players: [
                PlayerKeys {
                    raise: KeyCode(16),
                    lower: KeyCode(17),
                },
                PlayerKeys {
                    raise: KeyCode(38),
                    lower: KeyCode(40),
                },
            ],
            description: "PRESS ENTER TO BEGIN\nP1: SHIFT=UP CTRL=DOWN\nP2: UP=UP DOWN=DOWN"
                .to_string(),
        }
    }
}

impl Controls {
    pub fn for_side(&self, side: Side) -> PlayerKeys {
        self.players[side.index()]
    }
}

/// Plays `cue` whenever any event named by `on` fires.
///
/// `on` stays untyped so that a bad binding in a settings file surfaces as
/// an event-binding error when the game is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundBinding {
    pub on: Value,
    pub cue: SoundCue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub title: String,
    pub tick_rate: u32,
    pub goal_delay_secs: f32,
    pub reset_delay_secs: f32,
    pub game_point: u32,
    pub win_margin: u32,
    pub player_names: [String; 2],
    pub ball: BallSettings,
    pub paddle: PaddleSettings,
    pub high_scores: HighScoreSettings,
    pub controls: Controls,
    pub sounds: Vec<SoundBinding>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "PONG".to_string(),
            tick_rate: TICK_RATE,
            goal_delay_secs: GOAL_DELAY_SECS,
            reset_delay_secs: RESET_DELAY_SECS,
            game_point: GAME_POINT,
            win_margin: WIN_MARGIN,
            player_names: ["Player 1".to_string(), "Player 2".to_string()],
            ball: BallSettings::default(),
            paddle: PaddleSettings::default(),
            high_scores: HighScoreSettings::default(),
            controls: Controls::default(),
            sounds: vec![
                SoundBinding {
                    on: json!("goal"),
                    cue: SoundCue::Goal,
                },
                SoundBinding {
                    on: json!("bounce"),
                    cue: SoundCue::Wall,
                },
                SoundBinding {
                    on: json!("hit"),
                    cue: SoundCue::Paddle,
                },
            ],
        }
    }
}

impl Settings {
    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
            SettingsError::Invalid {
                field,
                reason: reason.into(),
            }
        }
        fn unit_fraction(field: &'static str, value: f32) -> Result<(), SettingsError> {
            if value > 0.0 && value < 1.0 {
                Ok(())
            } else {
                Err(invalid(field, format!("{value} is outside (0, 1)")))
            }
        }

        if self.tick_rate == 0 {
            return Err(invalid("tick_rate", "must be positive"));
        }
        for (field, secs) in [
            ("goal_delay_secs", self.goal_delay_secs),
            ("reset_delay_secs", self.reset_delay_secs),
        ] {
            if !(secs.is_finite() && secs >= 0.0) {
                return Err(invalid(field, format!("{secs} is not a valid delay")));
            }
        }
        if self.game_point == 0 {
            return Err(invalid("game_point", "must be at least 1"));
        }
        if self.win_margin == 0 {
            return Err(invalid("win_margin", "must be at least 1"));
        }

        let ball = &self.ball;
        unit_fraction("ball.size", ball.size)?;
        if !(ball.min_velocity > 0.0 && ball.min_velocity <= ball.max_velocity) {
            return Err(invalid(
                "ball.min_velocity",
                format!(
                    "need 0 < min ({}) <= max ({})",
                    ball.min_velocity, ball.max_velocity
                ),
            ));
        }
        if !(ball.angle_restriction > 0.0 && ball.angle_restriction < std::f32::consts::PI) {
            return Err(invalid(
                "ball.angle_restriction",
                format!("{} is outside (0, π)", ball.angle_restriction),
            ));
        }

        let paddle = &self.paddle;
        unit_fraction("paddle.offset", paddle.offset)?;
        unit_fraction("paddle.width", paddle.width)?;
        unit_fraction("paddle.height", paddle.height)?;
        if !(paddle.speed.is_finite() && paddle.speed > 0.0) {
            return Err(invalid("paddle.speed", "must be positive"));
        }

        if self.high_scores.max_entries == 0 {
            return Err(invalid("high_scores.max_entries", "must be at least 1"));
        }
        if self.high_scores.name_length == 0 {
            return Err(invalid("high_scores.name_length", "must be at least 1"));
        }
        Ok(())
    }

    /// Convert a delay in seconds to whole simulation ticks
    pub fn delay_ticks(&self, secs: f32) -> u64 {
        (secs * self.tick_rate as f32).round() as u64
    }

    /// Seconds per simulation tick
    pub fn tick_secs(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.tick_rate, 60);
        assert_eq!(settings.game_point, 11);
        assert_eq!(settings.high_scores.max_entries, 5);
        assert_eq!(settings.controls.for_side(Side::Right).raise, KeyCode(38));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "game_point": 5, "ball": { "max_velocity": 0.9 } }"#).unwrap();
        assert_eq!(settings.game_point, 5);
        assert_eq!(settings.ball.max_velocity, 0.9);
        assert_eq!(settings.ball.min_velocity, BALL_MIN_VELOCITY);
        assert_eq!(settings.win_margin, 2);
    }

    #[test]
    fn test_rejects_inverted_velocity_range() {
        let err = Settings::from_json(r#"{ "ball": { "min_velocity": 0.8, "max_velocity": 0.2 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "ball.min_velocity",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let err = Settings::from_json(r#"{ "tick_rate": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "tick_rate", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_delay_ticks() {
        let settings = Settings::default();
        assert_eq!(settings.delay_ticks(1.0), 60);
        assert_eq!(settings.delay_ticks(5.0), 300);
        assert_eq!(settings.delay_ticks(0.0), 0);
        assert!((settings.tick_secs() - 1.0 / 60.0).abs() < 1e-9);
    }
}
