//! Camera backed by a directory of still images, played in file-name order
//! and looped

use super::{Camera, CameraError, CameraProvider, VideoConstraints, VideoFrame};
use image::imageops::FilterType;
use image::RgbImage;
use std::path::{Path, PathBuf};

const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Provider for [`ImageSequenceCamera`]
pub struct ImageSequenceProvider {
    directory: PathBuf,
}

impl ImageSequenceProvider {
    /// Read frames from `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn frame_paths(&self) -> Result<Vec<PathBuf>, CameraError> {
        let entries = std::fs::read_dir(&self.directory).map_err(|e| {
            CameraError::Unavailable(format!("{}: {}", self.directory.display(), e))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| is_supported(path))
            .collect();
        paths.sort();
        Ok(paths)
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl CameraProvider for ImageSequenceProvider {
    fn open(&mut self, constraints: &VideoConstraints) -> Result<Box<dyn Camera>, CameraError> {
        let paths = self.frame_paths()?;
        if paths.is_empty() {
            return Err(CameraError::Unavailable(format!(
                "no image frames in {}",
                self.directory.display()
            )));
        }

        let mut frames = Vec::with_capacity(paths.len());
        for path in &paths {
            let decoded = image::open(path)
                .map_err(|e| CameraError::Unavailable(format!("{}: {}", path.display(), e)))?
                .to_rgb8();
            frames.push(fit_to_constraints(decoded, constraints));
        }

        log::info!(
            "Opened image sequence camera with {} frames from {}",
            frames.len(),
            self.directory.display()
        );
        Ok(Box::new(ImageSequenceCamera { frames, index: 0 }))
    }
}

fn fit_to_constraints(image: RgbImage, constraints: &VideoConstraints) -> RgbImage {
    match (constraints.width, constraints.height) {
        (Some(width), Some(height)) if image.dimensions() != (width, height) => {
            image::imageops::resize(&image, width, height, FilterType::Triangle)
        }
        _ => image,
    }
}

/// Loops over preloaded frames
pub struct ImageSequenceCamera {
    frames: Vec<RgbImage>,
    index: u64,
}

impl Camera for ImageSequenceCamera {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        let slot = (self.index % self.frames.len() as u64) as usize;
        let image = self
            .frames
            .get(slot)
            .cloned()
            .ok_or_else(|| CameraError::Capture("image sequence is empty".to_string()))?;
        let frame = VideoFrame {
            image,
            index: self.index,
        };
        self.index += 1;
        Ok(frame)
    }

    fn size(&self) -> (u32, u32) {
        self.frames.first().map_or((0, 0), |frame| frame.dimensions())
    }
}
