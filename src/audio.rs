//! Sound effects
//!
//! The game only decides *which* cue to play; decoding and output belong to
//! whatever `AudioSink` the platform provides.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    /// Ball left the table
    Goal,
    /// Ball bounced off the top or bottom wall
    Wall,
    /// Ball hit a paddle
    Paddle,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Goal => "goal",
            SoundCue::Wall => "wall",
            SoundCue::Paddle => "paddle",
        }
    }
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fire-and-forget audio output
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// One encoding of a sound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSource {
    pub src: String,
    pub mime_type: &'static str,
}

/// MIME type for an audio file, from its extension
pub fn mime_type(src: &str) -> &'static str {
    match src.rsplit('.').next() {
        Some("ogg") => "audio/ogg",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        _ => "audio/*",
    }
}

/// A sound with alternative encodings, in order of preference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sound {
    sources: Vec<AudioSource>,
}

impl Sound {
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sound = Self::default();
        for src in sources {
            sound.load_source(src.as_ref());
        }
        sound
    }

    pub fn load_source(&mut self, src: &str) {
        self.sources.push(AudioSource {
            src: src.to_owned(),
            mime_type: mime_type(src),
        });
    }

    pub fn sources(&self) -> &[AudioSource] {
        &self.sources
    }
}

/// The game's sounds plus volume control. Without a real output device it
/// reports each cue through the log.
#[derive(Debug, Clone)]
pub struct SoundBank {
    goal: Sound,
    wall: Sound,
    paddle: Sound,
    master_volume: f32,
    muted: bool,
}

impl Default for SoundBank {
    fn default() -> Self {
        let sound = |name: &str| {
            Sound::new(["ogg", "mp3", "wav"].map(|ext| format!("sounds/{name}.{ext}")))
        };
        Self {
            goal: sound("goal"),
            wall: sound("wall"),
            paddle: sound("paddle"),
            master_volume: 0.8,
            muted: false,
        }
    }
}

impl SoundBank {
    pub fn sound(&self, cue: SoundCue) -> &Sound {
        match cue {
            SoundCue::Goal => &self.goal,
            SoundCue::Wall => &self.wall,
            SoundCue::Paddle => &self.paddle,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }
}

impl AudioSink for SoundBank {
    fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        match self.sound(cue).sources().first() {
            Some(source) => log::debug!("Playing {cue} ({}) at volume {vol:.2}", source.src),
            None => log::debug!("No source loaded for {cue}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(mime_type("sounds/goal.ogg"), "audio/ogg");
        assert_eq!(mime_type("sounds/goal.mp3"), "audio/mpeg");
        assert_eq!(mime_type("sounds/goal.wav"), "audio/wav");
        assert_eq!(mime_type("sounds/goal.flac"), "audio/*");
        assert_eq!(mime_type("noextension"), "audio/*");
    }

    #[test]
    fn test_default_bank_has_three_encodings() {
        let bank = SoundBank::default();
        let sources = bank.sound(SoundCue::Wall).sources();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].src, "sounds/wall.ogg");
        assert_eq!(sources[1].mime_type, "audio/mpeg");
    }

    #[test]
    fn test_mute_zeroes_volume() {
        let mut bank = SoundBank::default();
        bank.set_master_volume(1.5);
        assert_eq!(bank.effective_volume(), 1.0);
        bank.set_muted(true);
        assert_eq!(bank.effective_volume(), 0.0);
    }

    #[test]
    fn test_cue_names_round_trip_through_serde() {
        let cue: SoundCue = serde_json::from_str("\"paddle\"").unwrap();
        assert_eq!(cue, SoundCue::Paddle);
    }
}
