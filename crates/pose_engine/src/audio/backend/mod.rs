//! Audio backend implementations
//!
//! Platform-independent abstraction over audio playback libraries.

#[cfg(feature = "audio")]
pub mod rodio_backend;
pub mod silent;

pub use silent::SilentBackend;

use crate::audio::{AudioError, Voice};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Sound handle for tracking active sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle {
    /// Unique identifier for the sound
    pub id: u32,
    /// Generation counter for handle validation
    pub generation: u32,
}

impl SoundHandle {
    /// Create a new sound handle
    pub fn new(id: u32, generation: u32) -> Self {
        Self { id, generation }
    }
}

/// A synthesized note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Timbre
    pub voice: Voice,
    /// Pitch in Hz
    pub frequency: f32,
    /// How long the note sounds
    pub duration: Duration,
}

/// Audio backend trait for platform abstraction
///
/// Single-threaded: the frame loop owns the backend and calls it between
/// physics steps.
pub trait AudioBackend {
    /// Initialize the audio backend
    fn initialize(&mut self, config: &AudioBackendConfig) -> Result<(), AudioError>;

    /// Shutdown the audio backend
    fn shutdown(&mut self);

    /// Check if backend is initialized
    fn is_initialized(&self) -> bool;

    /// Update the backend (cleanup finished sounds, etc.)
    fn update(&mut self);

    /// Stop all playing sounds
    fn stop_all(&mut self);

    /// Play an audio file, cut off after `duration` when given
    fn play_file(&mut self, path: &Path, duration: Option<Duration>, volume: f32) -> Result<SoundHandle, AudioError>;

    /// Play a synthesized note
    fn play_tone(&mut self, tone: &Tone, volume: f32) -> Result<SoundHandle, AudioError>;

    /// Number of sounds still playing
    fn active_count(&self) -> usize;
}

/// Configuration for audio backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioBackendConfig {
    /// Use the output device; when false every cue is discarded
    pub enabled: bool,
    /// Sounds allowed at once; the oldest is stopped to make room
    pub max_active_sounds: usize,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_active_sounds: 32,
        }
    }
}

/// Create the best backend available
///
/// Falls back to [`SilentBackend`] when audio is disabled, the `audio`
/// feature is off, or no output device can be opened.
pub fn create_backend(config: &AudioBackendConfig) -> Box<dyn AudioBackend> {
    if config.enabled {
        if let Some(backend) = open_device(config) {
            return backend;
        }
    }

    let mut backend = Box::new(SilentBackend::new());
    // Never fails
    let _ = backend.initialize(config);
    backend
}

#[cfg(feature = "audio")]
fn open_device(config: &AudioBackendConfig) -> Option<Box<dyn AudioBackend>> {
    let mut backend = Box::new(rodio_backend::RodioBackend::new());
    match backend.initialize(config) {
        Ok(()) => Some(backend),
        Err(e) => {
            log::warn!("Audio output unavailable, continuing silently: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_device(_config: &AudioBackendConfig) -> Option<Box<dyn AudioBackend>> {
    log::debug!("Built without the audio feature, cues are silent");
    None
}
