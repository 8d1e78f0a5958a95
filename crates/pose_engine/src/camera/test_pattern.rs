//! Camera that produces solid frames; used when no image source is configured

use super::{Camera, CameraError, CameraProvider, VideoConstraints, VideoFrame};
use image::{Rgb, RgbImage};

/// Provider for [`TestPatternCamera`]
pub struct TestPatternProvider {
    fallback_size: (u32, u32),
}

impl TestPatternProvider {
    /// Frames use the requested size, or `fallback_size` when none is given
    pub fn new(fallback_size: (u32, u32)) -> Self {
        Self { fallback_size }
    }
}

impl CameraProvider for TestPatternProvider {
    fn open(&mut self, constraints: &VideoConstraints) -> Result<Box<dyn Camera>, CameraError> {
        let width = constraints.width.unwrap_or(self.fallback_size.0);
        let height = constraints.height.unwrap_or(self.fallback_size.1);
        if width == 0 || height == 0 {
            return Err(CameraError::Unavailable(format!("invalid frame size {}x{}", width, height)));
        }
        log::info!("Opened test pattern camera at {}x{}", width, height);
        Ok(Box::new(TestPatternCamera {
            frame: RgbImage::from_pixel(width, height, Rgb([16, 16, 16])),
            index: 0,
        }))
    }
}

/// Yields the same dark frame forever
pub struct TestPatternCamera {
    frame: RgbImage,
    index: u64,
}

impl Camera for TestPatternCamera {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        let frame = VideoFrame {
            image: self.frame.clone(),
            index: self.index,
        };
        self.index += 1;
        Ok(frame)
    }

    fn size(&self) -> (u32, u32) {
        self.frame.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_use_requested_size() {
        let mut provider = TestPatternProvider::new((640, 480));
        let mut camera = provider
            .open(&VideoConstraints::user_facing(320, 240, false))
            .unwrap();
        let first = camera.next_frame().unwrap();
        let second = camera.next_frame().unwrap();

        assert_eq!((first.width(), first.height()), (320, 240));
        assert_eq!(second.index, 1);
    }

    #[test]
    fn test_mobile_falls_back_to_default_size() {
        let mut provider = TestPatternProvider::new((640, 480));
        let camera = provider
            .open(&VideoConstraints::user_facing(320, 240, true))
            .unwrap();
        assert_eq!(camera.size(), (640, 480));
    }
}
