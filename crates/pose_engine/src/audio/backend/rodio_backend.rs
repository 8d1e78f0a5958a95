//! Rodio audio backend implementation
//!
//! Uses the Rodio library for cross-platform audio playback. Samples are
//! decoded from WAV, OGG Vorbis, MP3 or FLAC files; notes are sums of sine
//! partials shaped by the voice.
//!
//! # Example
//!
//! ```no_run
//! use pose_engine::audio::backend::{AudioBackend, AudioBackendConfig, Tone};
//! use pose_engine::audio::backend::rodio_backend::RodioBackend;
//! use pose_engine::audio::Voice;
//! use std::time::Duration;
//!
//! let mut backend = RodioBackend::new();
//! backend.initialize(&AudioBackendConfig::default()).unwrap();
//!
//! let tone = Tone { voice: Voice::Bell, frequency: 440.0, duration: Duration::from_millis(300) };
//! backend.play_tone(&tone, 0.5).unwrap();
//! ```

use super::{AudioBackend, AudioBackendConfig, SoundHandle, Tone};
use crate::audio::AudioError;
use rodio::source::{SineWave, Source, Zero};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

const SYNTH_SAMPLE_RATE: u32 = 48_000;

/// Rodio-based audio backend
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _output_stream: Option<OutputStream>,
    /// Output stream handle for creating sinks
    stream_handle: Option<OutputStreamHandle>,
    /// Active sound sinks, oldest first
    active_sounds: VecDeque<(SoundHandle, Sink)>,
    /// Concurrent sound limit
    max_active_sounds: usize,
    /// Next sound ID for handle generation
    next_id: u32,
    /// Initialization state
    initialized: bool,
}

impl RodioBackend {
    /// Create a new Rodio backend
    pub fn new() -> Self {
        Self {
            _output_stream: None,
            stream_handle: None,
            active_sounds: VecDeque::new(),
            max_active_sounds: AudioBackendConfig::default().max_active_sounds,
            next_id: 0,
            initialized: false,
        }
    }

    /// Generate a new sound handle
    fn next_handle(&mut self) -> SoundHandle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        SoundHandle::new(id, 0)
    }

    fn new_sink(&mut self, volume: f32) -> Result<Sink, AudioError> {
        let stream_handle = self.stream_handle.as_ref().ok_or(AudioError::BackendNotInitialized)?;
        let sink = Sink::try_new(stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {}", e)))?;
        sink.set_volume(volume);
        Ok(sink)
    }

    fn track(&mut self, sink: Sink) -> SoundHandle {
        while self.active_sounds.len() >= self.max_active_sounds.max(1) {
            if let Some((_, oldest)) = self.active_sounds.pop_front() {
                oldest.stop();
            }
        }
        let handle = self.next_handle();
        self.active_sounds.push_back((handle, sink));
        handle
    }
}

fn tone_source(tone: &Tone) -> Box<dyn Source<Item = f32> + Send> {
    let mut mixed: Box<dyn Source<Item = f32> + Send> = Box::new(Zero::<f32>::new(1, SYNTH_SAMPLE_RATE));
    for &(ratio, gain) in tone.voice.partials() {
        mixed = Box::new(mixed.mix(SineWave::new(tone.frequency * ratio).amplify(gain)));
    }
    Box::new(mixed.take_duration(tone.duration).fade_in(Duration::from_millis(5)))
}

impl AudioBackend for RodioBackend {
    fn initialize(&mut self, config: &AudioBackendConfig) -> Result<(), AudioError> {
        if self.initialized {
            return Ok(());
        }

        // Create output stream
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::DeviceUnavailable(format!("Failed to create audio output: {}", e)))?;

        self._output_stream = Some(stream);
        self.stream_handle = Some(stream_handle);
        self.max_active_sounds = config.max_active_sounds;
        self.initialized = true;

        log::info!("Rodio audio backend initialized");
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        self.stop_all();
        self.stream_handle = None;
        self._output_stream = None;
        self.initialized = false;

        log::info!("Rodio audio backend shutdown");
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn update(&mut self) {
        // Remove finished sounds
        self.active_sounds.retain(|(_, sink)| !sink.empty());
    }

    fn stop_all(&mut self) {
        for (_, sink) in self.active_sounds.drain(..) {
            sink.stop();
        }
    }

    fn play_file(&mut self, path: &Path, duration: Option<Duration>, volume: f32) -> Result<SoundHandle, AudioError> {
        let sink = self.new_sink(volume)?;

        let file = File::open(path).map_err(|_| AudioError::SampleNotFound(path.display().to_string()))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to decode {}: {}", path.display(), e)))?;
        match duration {
            Some(duration) => sink.append(source.take_duration(duration)),
            None => sink.append(source),
        }

        Ok(self.track(sink))
    }

    fn play_tone(&mut self, tone: &Tone, volume: f32) -> Result<SoundHandle, AudioError> {
        let sink = self.new_sink(volume)?;
        sink.append(tone_source(tone));
        Ok(self.track(sink))
    }

    fn active_count(&self) -> usize {
        self.active_sounds.len()
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Voice;

    #[test]
    fn test_handle_generation() {
        let mut backend = RodioBackend::new();
        let handle1 = backend.next_handle();
        let handle2 = backend.next_handle();

        assert_ne!(handle1.id, handle2.id);
    }

    #[test]
    fn test_playback_without_initialization() {
        let mut backend = RodioBackend::new();
        let tone = Tone {
            voice: Voice::Lead,
            frequency: 440.0,
            duration: Duration::from_millis(10),
        };
        assert!(matches!(backend.play_tone(&tone, 1.0), Err(AudioError::BackendNotInitialized)));
    }

    #[test]
    fn test_missing_sample() {
        let mut backend = RodioBackend::new();

        // May fail in CI/test environments without audio device
        if backend.initialize(&AudioBackendConfig::default()).is_ok() {
            let result = backend.play_file(Path::new("does/not/exist.wav"), None, 1.0);
            assert!(matches!(result, Err(AudioError::SampleNotFound(_))));
            backend.shutdown();
            assert!(!backend.is_initialized());
        }
    }

    #[test]
    fn test_tone_source_is_finite() {
        let tone = Tone {
            voice: Voice::Bell,
            frequency: 880.0,
            duration: Duration::from_millis(10),
        };
        let samples = tone_source(&tone).count();
        assert!(samples > 0);
        assert!(samples <= 2 * SYNTH_SAMPLE_RATE as usize / 100);
    }
}
