//! Game configuration
//!
//! Loaded from TOML or RON through the engine's [`Config`] trait. Every
//! section is `#[serde(default)]`, so a file only lists what it changes.

use pose_engine::audio::{AudioBackendConfig, Voice};
use pose_engine::config::{Config, ConfigError};
use pose_engine::core::SessionConfig;
use pose_engine::input::KeyCode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Complete configuration for one game run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DodgeConfig {
    /// Camera, detection, control, physics and presentation
    pub session: SessionConfig,

    /// Spawning, scoring and cue tables
    pub game: GameConfig,

    /// Volumes and sound sources
    pub audio: AudioConfig,
}

impl Config for DodgeConfig {}

impl DodgeConfig {
    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session.validate()?;
        self.game.validate()
    }
}

/// Gameplay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds between spawns; each spawn also scores a point
    pub spawn_interval: f32,

    /// Height spawned balls are dropped from
    pub spawn_height: f32,

    /// Spawn positions are drawn from `[-x, x]` and `[-z, z]`
    pub spawn_extent: [f32; 2],

    /// Horizontal speed a ball is launched at towards the player
    pub launch_speed: f32,

    /// Score tiers and their sounds
    pub tiers: TierTable,

    /// Percussive samples, one drawn per collision
    pub samples: Vec<String>,

    /// Key that clears the field and restarts
    pub reset_key: KeyCode,

    /// Fixed seed for spawn and cue draws; random when unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 2.0,
            spawn_height: 6.0,
            spawn_extent: [17.0, 7.0],
            launch_speed: 6.0,
            tiers: TierTable::default(),
            samples: vec!["kick".to_string(), "snare".to_string(), "hihat".to_string()],
            reset_key: KeyCode::R,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Check the spawn and tier settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.spawn_interval > 0.0) {
            return Err(ConfigError::Invalid {
                field: "game.spawn_interval",
                reason: format!("{} must be positive", self.spawn_interval),
            });
        }
        if self.spawn_extent.iter().any(|extent| !extent.is_finite() || *extent < 0.0) {
            return Err(ConfigError::Invalid {
                field: "game.spawn_extent",
                reason: format!("{:?} must be finite and non-negative", self.spawn_extent),
            });
        }
        if self.tiers.high_from < self.tiers.mid_from {
            return Err(ConfigError::Invalid {
                field: "game.tiers",
                reason: format!(
                    "high tier starts at {} but mid tier at {}",
                    self.tiers.high_from, self.tiers.mid_from
                ),
            });
        }
        Ok(())
    }
}

/// Score thresholds and the sound of each tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TierTable {
    /// Lowest score in the mid tier
    pub mid_from: u32,
    /// Lowest score in the high tier
    pub high_from: u32,
    /// Below `mid_from`
    pub low: TierSound,
    /// From `mid_from` up to `high_from`
    pub mid: TierSound,
    /// From `high_from` on
    pub high: TierSound,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            mid_from: 3,
            high_from: 6,
            low: TierSound::new(Voice::Bass, &["C3", "D#3", "G3", "A#3"]),
            mid: TierSound::new(Voice::Lead, &["C4", "D4", "E4", "G4", "A4"]),
            high: TierSound::new(Voice::Bell, &["C5", "E5", "G5", "B5", "D6"]),
        }
    }
}

/// Note pool and synth voice for one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSound {
    /// Voice notes are played with
    pub voice: Voice,
    /// Notes drawn from, e.g. `"C4"`
    pub notes: Vec<String>,
}

impl TierSound {
    /// Build from note names
    pub fn new(voice: Voice, notes: &[&str]) -> Self {
        Self {
            voice,
            notes: notes.iter().map(|note| (*note).to_string()).collect(),
        }
    }
}

/// Audio configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Output device settings
    pub backend: AudioBackendConfig,

    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    /// Sample volume (0.0 - 1.0)
    pub sample_volume: f32,

    /// Synth volume (0.0 - 1.0)
    pub voice_volume: f32,

    /// Directory sample names resolve in
    pub sample_dir: PathBuf,

    /// How long a note rings, in milliseconds
    pub note_duration_ms: u64,

    /// Samples are cut after this many milliseconds
    pub sample_duration_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            backend: AudioBackendConfig::default(),
            master_volume: 0.8,
            sample_volume: 1.0,
            voice_volume: 0.6,
            sample_dir: PathBuf::from("assets/samples"),
            note_duration_ms: 400,
            sample_duration_ms: 600,
        }
    }
}

impl AudioConfig {
    /// Note length
    pub fn note_duration(&self) -> Duration {
        Duration::from_millis(self.note_duration_ms)
    }

    /// Sample cut-off
    pub fn sample_duration(&self) -> Duration {
        Duration::from_millis(self.sample_duration_ms)
    }
}
