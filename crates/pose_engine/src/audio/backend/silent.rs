//! Backend that discards every sound

use super::{AudioBackend, AudioBackendConfig, SoundHandle, Tone};
use crate::audio::AudioError;
use std::path::Path;
use std::time::Duration;

/// Accepts playback requests and produces no output
#[derive(Debug, Default)]
pub struct SilentBackend {
    initialized: bool,
    next_id: u32,
}

impl SilentBackend {
    /// Create a new silent backend
    pub fn new() -> Self {
        Self::default()
    }

    fn next_handle(&mut self) -> Result<SoundHandle, AudioError> {
        if !self.initialized {
            return Err(AudioError::BackendNotInitialized);
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        Ok(SoundHandle::new(id, 0))
    }
}

impl AudioBackend for SilentBackend {
    fn initialize(&mut self, _config: &AudioBackendConfig) -> Result<(), AudioError> {
        if !self.initialized {
            log::debug!("Silent audio backend initialized");
        }
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.initialized = false;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn update(&mut self) {}

    fn stop_all(&mut self) {}

    fn play_file(&mut self, path: &Path, _duration: Option<Duration>, _volume: f32) -> Result<SoundHandle, AudioError> {
        log::trace!("(silent) sample {}", path.display());
        self.next_handle()
    }

    fn play_tone(&mut self, tone: &Tone, _volume: f32) -> Result<SoundHandle, AudioError> {
        log::trace!("(silent) {:?} at {:.1} Hz", tone.voice, tone.frequency);
        self.next_handle()
    }

    fn active_count(&self) -> usize {
        0
    }
}
