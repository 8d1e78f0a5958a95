//! Presenter without a display
//!
//! Frames are counted and logged, pacing comes from a [`FramePacer`] and
//! keys arrive through [`StdinKeys`].

use super::{FrameView, PresentError, Presenter};
use crate::application::AppEvent;
use crate::foundation::time::FramePacer;
use crate::input::StdinKeys;

/// Headless presenter
pub struct HeadlessPresenter {
    pacer: Option<FramePacer>,
    keys: Option<StdinKeys>,
    frames: u64,
    status: String,
}

impl HeadlessPresenter {
    /// Presenter paced to `refresh_rate` Hz
    pub fn new(refresh_rate: f32) -> Self {
        Self {
            pacer: Some(FramePacer::new(refresh_rate)),
            keys: None,
            frames: 0,
            status: String::new(),
        }
    }

    /// Presenter that never waits
    pub fn unpaced() -> Self {
        Self {
            pacer: None,
            ..Self::new(1.0)
        }
    }

    /// Read keys from stdin
    pub fn with_stdin_keys(mut self) -> Result<Self, PresentError> {
        self.keys = Some(StdinKeys::spawn()?);
        Ok(self)
    }

    /// Frames presented so far
    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    /// Last status line
    pub fn status(&self) -> &str {
        &self.status
    }
}

impl Presenter for HeadlessPresenter {
    fn poll_events(&mut self) -> Vec<AppEvent> {
        self.keys
            .as_ref()
            .map(|keys| keys.drain().into_iter().map(AppEvent::KeyPressed).collect())
            .unwrap_or_default()
    }

    fn present(&mut self, frame: &FrameView<'_>) -> Result<(), PresentError> {
        self.frames += 1;
        log::trace!(
            "Frame {}: {} renderables, {} keypoints, {} segments, video {}",
            self.frames,
            frame.scene.len(),
            frame.overlay.points.len(),
            frame.overlay.segments.len(),
            frame.video.is_some() && frame.overlay.shows_video(),
        );
        if let Some(pacer) = self.pacer.as_mut() {
            pacer.wait();
        }
        Ok(())
    }

    fn show_message(&mut self, message: &str) {
        eprintln!("{}", message);
    }

    fn set_status(&mut self, status: &str) {
        if self.status != status {
            log::info!("{}", status);
            self.status = status.to_string();
        }
    }
}
