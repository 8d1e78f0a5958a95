//! Frame presentation
//!
//! A [`Presenter`] owns the output surface and the input source. It shows the
//! scene and pose overlay once per frame, waits for the next display refresh
//! and reports key presses back to the loop. Pixel rasterisation is left to
//! whatever renderer sits behind the surface.

pub mod headless;
pub mod overlay;
#[cfg(feature = "window")]
pub mod window;

pub use headless::HeadlessPresenter;
pub use overlay::{Overlay, OverlayFlags};
#[cfg(feature = "window")]
pub use window::WindowPresenter;

use crate::application::AppEvent;
use crate::camera::VideoFrame;
use crate::core::PresentationConfig;
use crate::scene::SceneGraph;
use thiserror::Error;

/// Presentation errors
#[derive(Error, Debug)]
pub enum PresentError {
    /// Window system could not be initialised
    #[error("Window system initialization failed: {0}")]
    InitializationFailed(String),

    /// Window could not be created
    #[error("Window creation failed")]
    CreationFailed,

    /// Key input could not be attached
    #[error("Input error: {0}")]
    Input(#[from] std::io::Error),
}

/// Everything drawn for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// 3D scene
    pub scene: &'a SceneGraph,
    /// Pose overlay
    pub overlay: &'a Overlay,
    /// Camera image behind the overlay
    pub video: Option<&'a VideoFrame>,
}

/// Output surface and input source
pub trait Presenter {
    /// Input received since the last call
    fn poll_events(&mut self) -> Vec<AppEvent>;

    /// Show one frame, then wait for the next refresh
    fn present(&mut self, frame: &FrameView<'_>) -> Result<(), PresentError>;

    /// Show a message the user must see (fatal errors)
    fn show_message(&mut self, message: &str);

    /// Update the one-line status (score, game state)
    fn set_status(&mut self, status: &str);
}

/// The presenter this build supports
///
/// A window when the `window` feature is on, otherwise a paced headless
/// presenter reading keys from stdin.
pub fn create_presenter(config: &PresentationConfig) -> Result<Box<dyn Presenter>, PresentError> {
    #[cfg(feature = "window")]
    {
        let presenter = WindowPresenter::new(config)?;
        Ok(Box::new(presenter))
    }
    #[cfg(not(feature = "window"))]
    {
        let presenter = HeadlessPresenter::new(config.refresh_rate).with_stdin_keys()?;
        Ok(Box::new(presenter))
    }
}
