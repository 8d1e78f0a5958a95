//! Camera input
//!
//! A [`CameraProvider`] is opened once before the frame loop starts and hands
//! back a [`Camera`] that yields one [`VideoFrame`] per loop iteration.

pub mod image_sequence;
pub mod test_pattern;

use image::RgbImage;
use thiserror::Error;

pub use image_sequence::ImageSequenceProvider;
pub use test_pattern::TestPatternProvider;

/// Message shown to the user when no camera can be opened
pub const CAMERA_UNAVAILABLE_MESSAGE: &str =
    "this device does not support video capture, or this device does not have a camera";

/// Camera errors
#[derive(Error, Debug)]
pub enum CameraError {
    /// No usable camera (missing device, permission denied, empty source)
    #[error("Camera unavailable: {0}")]
    Unavailable(String),

    /// A frame could not be captured from an open camera
    #[error("Frame capture failed: {0}")]
    Capture(String),
}

/// Which way the requested camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Front camera, facing the user
    User,
    /// Rear camera
    Environment,
}

/// Stream request passed to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoConstraints {
    /// Whether an audio track is wanted (always false for this demo)
    pub audio: bool,
    /// Camera direction
    pub facing_mode: FacingMode,
    /// Requested width; `None` lets the device choose
    pub width: Option<u32>,
    /// Requested height; `None` lets the device choose
    pub height: Option<u32>,
}

impl VideoConstraints {
    /// User-facing video at the given size, with the size left open on mobile
    pub fn user_facing(width: u32, height: u32, mobile: bool) -> Self {
        Self {
            audio: false,
            facing_mode: FacingMode::User,
            width: (!mobile).then_some(width),
            height: (!mobile).then_some(height),
        }
    }
}

/// Whether this build targets a phone or tablet
pub fn is_mobile() -> bool {
    cfg!(any(target_os = "android", target_os = "ios"))
}

/// One captured frame
#[derive(Clone)]
pub struct VideoFrame {
    /// Pixels, unmirrored
    pub image: RgbImage,
    /// Sequence number since the camera was opened
    pub index: u64,
}

impl VideoFrame {
    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl std::fmt::Debug for VideoFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoFrame")
            .field("index", &self.index)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// An open video stream
pub trait Camera {
    /// Grab the next frame
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError>;

    /// Stream size in pixels
    fn size(&self) -> (u32, u32);
}

/// Acquires a video stream
pub trait CameraProvider {
    /// Open a stream matching the constraints
    fn open(&mut self, constraints: &VideoConstraints) -> Result<Box<dyn Camera>, CameraError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_constraints_carry_size() {
        let constraints = VideoConstraints::user_facing(1250, 500, false);
        assert!(!constraints.audio);
        assert_eq!(constraints.facing_mode, FacingMode::User);
        assert_eq!(constraints.width, Some(1250));
        assert_eq!(constraints.height, Some(500));
    }

    #[test]
    fn test_mobile_constraints_omit_size() {
        let constraints = VideoConstraints::user_facing(1250, 500, true);
        assert_eq!(constraints.width, None);
        assert_eq!(constraints.height, None);
    }
}
