//! Collision audio
//!
//! Plays the two kinds of cue a collision can trigger: a percussive sample
//! read from disk and a synthesized note in one of a few voices. Playback
//! problems never reach the caller; they are logged and the cue is dropped.

pub mod backend;
pub mod mixer;
pub mod note;

pub use backend::{create_backend, AudioBackend, AudioBackendConfig, SilentBackend, SoundHandle, Tone};
pub use mixer::{MixerSystem, VolumeGroup};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Audio errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Backend used before `initialize`
    #[error("Audio backend not initialized")]
    BackendNotInitialized,

    /// No usable output device
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Sink or decoder failure
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// Sample file missing
    #[error("Sample not found: {0}")]
    SampleNotFound(String),

    /// Note name could not be parsed
    #[error("Invalid note name: {0}")]
    InvalidNote(String),
}

/// Synth timbre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    /// Warm, with a sub-octave
    Bass,
    /// Bright, harmonic
    Lead,
    /// Inharmonic, metallic
    Bell,
}

impl Voice {
    /// `(frequency ratio, gain)` of each sine partial
    pub fn partials(self) -> &'static [(f32, f32)] {
        match self {
            Voice::Bass => &[(0.5, 0.5), (1.0, 0.4), (2.0, 0.1)],
            Voice::Lead => &[(1.0, 0.55), (2.0, 0.25), (3.0, 0.12), (4.0, 0.08)],
            Voice::Bell => &[(1.0, 0.5), (2.76, 0.3), (5.4, 0.2)],
        }
    }
}

/// Front end the game talks to
pub struct AudioSystem {
    backend: Box<dyn AudioBackend>,
    mixer: MixerSystem,
    sample_dir: PathBuf,
    cues_played: u64,
}

impl AudioSystem {
    /// Wrap a backend; sample names resolve inside `sample_dir`
    pub fn new(backend: Box<dyn AudioBackend>, sample_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            mixer: MixerSystem::new(),
            sample_dir: sample_dir.into(),
            cues_played: 0,
        }
    }

    /// A system that plays nothing
    pub fn silent() -> Self {
        Self::new(create_backend(&AudioBackendConfig { enabled: false, ..Default::default() }), ".")
    }

    /// Mixer levels
    pub fn mixer(&self) -> &MixerSystem {
        &self.mixer
    }

    /// Mutable mixer levels
    pub fn mixer_mut(&mut self) -> &mut MixerSystem {
        &mut self.mixer
    }

    /// Cues the backend accepted so far
    pub fn cues_played(&self) -> u64 {
        self.cues_played
    }

    /// Path a sample name resolves to; names without an extension get `.wav`
    pub fn sample_path(&self, name: &str) -> PathBuf {
        let path = self.sample_dir.join(name);
        if Path::new(name).extension().is_some() {
            path
        } else {
            path.with_extension("wav")
        }
    }

    /// Play a sample for at most `duration`
    pub fn play_sample(&mut self, name: &str, duration: Option<Duration>) {
        let volume = self.mixer.effective_level(VolumeGroup::Samples);
        let path = self.sample_path(name);
        let result = self.backend.play_file(&path, duration, volume);
        self.record("sample", name, result);
    }

    /// Play a note such as `"C4"` in `voice` for `duration`
    pub fn play_note(&mut self, voice: Voice, note: &str, duration: Duration) {
        let volume = self.mixer.effective_level(VolumeGroup::Voices);
        let result = note::frequency(note).and_then(|frequency| {
            let tone = Tone {
                voice,
                frequency,
                duration,
            };
            self.backend.play_tone(&tone, volume)
        });
        self.record("note", note, result);
    }

    fn record(&mut self, kind: &str, name: &str, result: Result<SoundHandle, AudioError>) {
        match result {
            Ok(_) => self.cues_played += 1,
            Err(e) => log::warn!("Skipping {} {}: {}", kind, name, e),
        }
    }

    /// Drop finished sounds
    pub fn update(&mut self) {
        self.backend.update();
    }

    /// Stop everything and release the device
    pub fn shutdown(&mut self) {
        self.backend.stop_all();
        self.backend.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_system_accepts_cues() {
        let mut audio = AudioSystem::silent();
        audio.play_sample("kick", Some(Duration::from_millis(200)));
        audio.play_note(Voice::Bell, "E5", Duration::from_millis(300));
        assert_eq!(audio.cues_played(), 2);
    }

    #[test]
    fn test_bad_note_is_a_noop() {
        let mut audio = AudioSystem::silent();
        audio.play_note(Voice::Lead, "not-a-note", Duration::from_millis(100));
        assert_eq!(audio.cues_played(), 0);
    }

    #[test]
    fn test_backend_failure_is_a_noop() {
        let mut audio = AudioSystem::new(Box::new(SilentBackend::new()), "samples");
        audio.play_sample("kick.wav", None);
        assert_eq!(audio.cues_played(), 0);
    }

    #[test]
    fn test_sample_path_resolution() {
        let audio = AudioSystem::new(Box::new(SilentBackend::new()), "samples");
        assert_eq!(audio.sample_path("kick"), Path::new("samples/kick.wav"));
        assert_eq!(audio.sample_path("snare.ogg"), Path::new("samples/snare.ogg"));
    }

    #[test]
    fn test_voices_have_partials() {
        for voice in [Voice::Bass, Voice::Lead, Voice::Bell] {
            assert!(!voice.partials().is_empty());
        }
    }
}
