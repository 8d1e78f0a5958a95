//! # Session Configuration
//!
//! All settings one demo session needs, grouped by the subsystem that reads
//! them. Every struct is serde-serializable and `#[serde(default)]`, so a
//! config file only has to name the values it changes.
//!
//! ## Configuration Categories
//!
//! - **Video**: requested camera size and optional image source
//! - **Detection**: the live pose settings (algorithm, model, thresholds, overlay toggles)
//! - **Control**: gesture thresholds and the impulse magnitude
//! - **Physics**: world constants and the fixed timestep
//! - **Presentation**: window title and refresh rate

use crate::camera::{is_mobile, CameraProvider, ImageSequenceProvider, TestPatternProvider};
use crate::config::{Config, ConfigError};
use crate::pose::{
    Algorithm, DecodingMode, EstimateOptions, KeypointName, ModelArchitecture, PoseError, PoseModelLoader,
    RecordedPoseLoader,
};
use crate::present::OverlayFlags;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything one session needs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Camera settings
    pub video: VideoConfig,
    /// Pose estimation settings
    pub detection: DetectionConfig,
    /// Gesture mapping settings
    pub control: ControlConfig,
    /// Physics world settings
    pub physics: PhysicsConfig,
    /// Presenter settings
    pub presentation: PresentationConfig,
}

impl Config for SessionConfig {}

impl SessionConfig {
    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.video.validate()?;
        self.detection.validate()?;
        self.control.validate()?;
        self.physics.validate()
    }
}

/// Camera settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Requested frame width (ignored on mobile)
    pub width: u32,
    /// Requested frame height (ignored on mobile)
    pub height: u32,
    /// Directory of still frames to use as the camera; test pattern when unset
    pub image_dir: Option<PathBuf>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 1250,
            height: 500,
            image_dir: None,
        }
    }
}

impl VideoConfig {
    /// Camera source for these settings: the image directory when set,
    /// otherwise a test pattern of the requested size
    pub fn camera_provider(&self) -> Box<dyn CameraProvider> {
        match &self.image_dir {
            Some(directory) => Box::new(ImageSequenceProvider::new(directory.clone())),
            None => Box::new(TestPatternProvider::new((self.width, self.height))),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid {
                field: "video.width/height",
                reason: format!("{}x{} is empty", self.width, self.height),
            });
        }
        Ok(())
    }
}

/// Single-pose thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinglePoseConfig {
    /// Minimum overall pose score to draw a pose
    pub min_pose_confidence: f32,
    /// Minimum keypoint score to draw a keypoint
    pub min_part_confidence: f32,
}

impl Default for SinglePoseConfig {
    fn default() -> Self {
        Self {
            min_pose_confidence: 0.1,
            min_part_confidence: 0.5,
        }
    }
}

/// Multi-pose thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiPoseConfig {
    /// Maximum poses decoded (1..=20)
    pub max_pose_detections: usize,
    /// Minimum overall pose score to draw a pose
    pub min_pose_confidence: f32,
    /// Minimum keypoint score
    pub min_part_confidence: f32,
    /// Minimum distance between poses in pixels (0..=40)
    pub nms_radius: f32,
}

impl Default for MultiPoseConfig {
    fn default() -> Self {
        Self {
            max_pose_detections: 2,
            min_pose_confidence: 0.1,
            min_part_confidence: 0.3,
            nms_radius: 20.0,
        }
    }
}

/// What gets drawn each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Draw the mirrored camera image
    pub show_video: bool,
    /// Draw skeleton segments
    pub show_skeleton: bool,
    /// Draw keypoints
    pub show_points: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            show_video: true,
            show_skeleton: true,
            show_points: true,
        }
    }
}

/// Live pose estimation settings, read by the loop every frame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Single or multi pose decoding
    pub algorithm: Algorithm,
    /// Model size
    pub architecture: ModelArchitecture,
    /// Network output stride (8, 16 or 32)
    pub output_stride: u32,
    /// Input downscale (0.2..=1.0)
    pub image_scale_factor: f32,
    /// Mirror keypoints (webcam input)
    pub flip_horizontal: bool,
    /// Single-pose thresholds
    pub single: SinglePoseConfig,
    /// Multi-pose thresholds
    pub multi: MultiPoseConfig,
    /// Overlay toggles
    pub output: OutputConfig,
    /// Pose recording replayed in place of a live model
    pub recording: Option<PathBuf>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::SinglePose,
            architecture: ModelArchitecture::default_for(is_mobile()),
            output_stride: 16,
            image_scale_factor: 0.5,
            flip_horizontal: true,
            single: SinglePoseConfig::default(),
            multi: MultiPoseConfig::default(),
            output: OutputConfig::default(),
            recording: None,
        }
    }
}

impl DetectionConfig {
    /// Inference parameters for the current settings
    pub fn estimate_options(&self) -> EstimateOptions {
        let decoding = match self.algorithm {
            Algorithm::SinglePose => DecodingMode::SinglePerson,
            Algorithm::MultiPose => DecodingMode::MultiPerson {
                max_poses: self.multi.max_pose_detections,
                min_part_confidence: self.multi.min_part_confidence,
                nms_radius: self.multi.nms_radius,
            },
        };
        EstimateOptions {
            decoding,
            flip_horizontal: self.flip_horizontal,
            image_scale_factor: self.image_scale_factor,
            output_stride: self.output_stride,
        }
    }

    /// `(min_pose_confidence, min_part_confidence)` for the active algorithm
    pub fn confidence_thresholds(&self) -> (f32, f32) {
        match self.algorithm {
            Algorithm::SinglePose => (self.single.min_pose_confidence, self.single.min_part_confidence),
            Algorithm::MultiPose => (self.multi.min_pose_confidence, self.multi.min_part_confidence),
        }
    }

    /// Model loader for these settings
    ///
    /// Replays the configured recording; with none, every frame has no poses.
    pub fn pose_loader(&self) -> Result<Box<dyn PoseModelLoader>, PoseError> {
        match &self.recording {
            Some(path) => Ok(Box::new(RecordedPoseLoader::from_file(path)?)),
            None => {
                log::warn!("No pose recording configured, the player will not move");
                Ok(Box::new(RecordedPoseLoader::empty()))
            }
        }
    }

    /// Overlay toggles as flags
    pub fn overlay_flags(&self) -> OverlayFlags {
        let mut flags = OverlayFlags::empty();
        flags.set(OverlayFlags::VIDEO, self.output.show_video);
        flags.set(OverlayFlags::SKELETON, self.output.show_skeleton);
        flags.set(OverlayFlags::POINTS, self.output.show_points);
        flags
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if ![8, 16, 32].contains(&self.output_stride) {
            return Err(ConfigError::Invalid {
                field: "detection.output_stride",
                reason: format!("{} is not one of 8, 16, 32", self.output_stride),
            });
        }
        if !(0.2..=1.0).contains(&self.image_scale_factor) {
            return Err(ConfigError::Invalid {
                field: "detection.image_scale_factor",
                reason: format!("{} is outside 0.2..=1.0", self.image_scale_factor),
            });
        }
        if !(1..=20).contains(&self.multi.max_pose_detections) {
            return Err(ConfigError::Invalid {
                field: "detection.multi.max_pose_detections",
                reason: format!("{} is outside 1..=20", self.multi.max_pose_detections),
            });
        }
        if !(0.0..=40.0).contains(&self.multi.nms_radius) {
            return Err(ConfigError::Invalid {
                field: "detection.multi.nms_radius",
                reason: format!("{} is outside 0..=40", self.multi.nms_radius),
            });
        }
        let confidences = [
            self.single.min_pose_confidence,
            self.single.min_part_confidence,
            self.multi.min_pose_confidence,
            self.multi.min_part_confidence,
        ];
        if confidences.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ConfigError::Invalid {
                field: "detection confidences",
                reason: "confidences must lie in 0..=1".to_string(),
            });
        }
        Ok(())
    }
}

/// Gesture mapping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Landmark whose x drives horizontal motion
    pub horizontal_landmark: KeypointName,
    /// Landmark whose y drives depth motion
    pub vertical_landmark: KeypointName,
    /// Pixel x splitting left from right
    pub threshold_x: f32,
    /// Pixel y splitting up from down
    pub threshold_y: f32,
    /// World units added per frame on an active axis
    pub magnitude: f32,
    /// Keypoints scoring below this are ignored
    pub min_keypoint_confidence: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            horizontal_landmark: KeypointName::LeftWrist,
            vertical_landmark: KeypointName::RightWrist,
            threshold_x: 600.0,
            threshold_y: 200.0,
            magnitude: 0.4,
            min_keypoint_confidence: 0.1,
        }
    }
}

impl ControlConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.magnitude.is_finite() || self.magnitude < 0.0 {
            return Err(ConfigError::Invalid {
                field: "control.magnitude",
                reason: format!("{} must be finite and non-negative", self.magnitude),
            });
        }
        Ok(())
    }
}

/// Physics world settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector
    pub gravity: [f32; 3],
    /// Fixed simulation step in seconds
    pub timestep: f32,
    /// Constraint solver iterations
    pub solver_iterations: usize,
    /// Contact friction between all materials
    pub friction: f32,
    /// Contact restitution between all materials
    pub restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -20.0, 0.0],
            timestep: 1.0 / 60.0,
            solver_iterations: 10,
            friction: 0.0,
            restitution: 0.9,
        }
    }
}

impl PhysicsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.timestep > 0.0) {
            return Err(ConfigError::Invalid {
                field: "physics.timestep",
                reason: format!("{} must be positive", self.timestep),
            });
        }
        if self.solver_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "physics.solver_iterations",
                reason: "at least one iteration is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Presenter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Window title
    pub title: String,
    /// Window width
    pub width: u32,
    /// Window height
    pub height: u32,
    /// Frame rate targeted when no vsync surface exists
    pub refresh_rate: f32,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            title: "posebox".to_string(),
            width: 1280,
            height: 720,
            refresh_rate: 60.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        SessionConfig::default().validate().unwrap();
    }

    #[test]
    fn test_single_pose_options() {
        let detection = DetectionConfig::default();
        let options = detection.estimate_options();
        assert_eq!(options.decoding, DecodingMode::SinglePerson);
        assert!(options.flip_horizontal);
        assert_eq!(options.output_stride, 16);
        assert_eq!(detection.confidence_thresholds(), (0.1, 0.5));
    }

    #[test]
    fn test_multi_pose_options() {
        let detection = DetectionConfig {
            algorithm: Algorithm::MultiPose,
            ..Default::default()
        };
        assert_eq!(
            detection.estimate_options().decoding,
            DecodingMode::MultiPerson {
                max_poses: 2,
                min_part_confidence: 0.3,
                nms_radius: 20.0,
            }
        );
        assert_eq!(detection.confidence_thresholds(), (0.1, 0.3));
    }

    #[test]
    fn test_missing_recording_is_an_error() {
        let detection = DetectionConfig {
            recording: Some(PathBuf::from("/nonexistent/poses.jsonl")),
            ..Default::default()
        };
        assert!(detection.pose_loader().is_err());
        assert!(DetectionConfig::default().pose_loader().is_ok());
    }

    #[test]
    fn test_rejects_bad_stride() {
        let mut config = SessionConfig::default();
        config.detection.output_stride = 12;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "detection.output_stride", .. })
        ));
    }

    #[test]
    fn test_overlay_flags_follow_toggles() {
        let mut detection = DetectionConfig::default();
        detection.output.show_video = false;
        let flags = detection.overlay_flags();
        assert!(!flags.contains(OverlayFlags::VIDEO));
        assert!(flags.contains(OverlayFlags::SKELETON | OverlayFlags::POINTS));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SessionConfig = toml::from_str(
            r#"
            [control]
            threshold_x = 625.0

            [detection]
            architecture = "0.75"
            "#,
        )
        .unwrap();
        assert_eq!(config.control.threshold_x, 625.0);
        assert_eq!(config.control.magnitude, 0.4);
        assert_eq!(config.detection.architecture, ModelArchitecture::MobileNet075);
        assert_eq!(config.video.width, 1250);
    }

    #[test]
    fn test_save_and_load_toml() {
        let path = std::env::temp_dir().join(format!("pose_engine_session_{}.toml", std::process::id()));
        let mut config = SessionConfig::default();
        config.physics.solver_iterations = 4;
        config.save_to_file(&path).unwrap();

        let loaded = SessionConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.physics.solver_iterations, 4);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            SessionConfig::load_from_file("settings.yaml"),
            Err(ConfigError::Io(_)) | Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            SessionConfig::default().save_to_file("settings.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
