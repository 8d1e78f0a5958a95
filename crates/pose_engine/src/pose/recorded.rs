//! Pose model that replays a recording instead of running inference
//!
//! A recording is JSON lines: each non-blank line is the array of poses one
//! frame produced, in PoseNet's output shape
//! (`[{"score":..,"keypoints":[{"part":"nose","score":..,"position":{"x":..,"y":..}}]}]`).
//! Positions are stored unmirrored.

use super::estimator::{DecodingMode, EstimateOptions, ModelArchitecture, PoseError, PoseModel, PoseModelLoader};
use super::Pose;
use crate::camera::VideoFrame;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

/// Loader handing out replay models over one shared recording
pub struct RecordedPoseLoader {
    frames: Arc<Vec<Vec<Pose>>>,
    available: Vec<ModelArchitecture>,
}

impl RecordedPoseLoader {
    /// Parse a recording from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PoseError> {
        let file = std::fs::File::open(path.as_ref())?;
        let loader = Self::from_reader(std::io::BufReader::new(file))?;
        log::info!(
            "Loaded pose recording with {} frames from {}",
            loader.frame_count(),
            path.as_ref().display()
        );
        Ok(loader)
    }

    /// Parse a recording from any buffered reader
    pub fn from_reader(reader: impl BufRead) -> Result<Self, PoseError> {
        let mut frames = Vec::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let poses: Vec<Pose> = serde_json::from_str(&line)
                .map_err(|source| PoseError::Parse { line: number + 1, source })?;
            frames.push(poses);
        }
        Ok(Self::from_frames(frames))
    }

    /// Replay frames built in memory
    pub fn from_frames(frames: Vec<Vec<Pose>>) -> Self {
        Self {
            frames: Arc::new(frames),
            available: vec![
                ModelArchitecture::MobileNet101,
                ModelArchitecture::MobileNet100,
                ModelArchitecture::MobileNet075,
                ModelArchitecture::MobileNet050,
            ],
        }
    }

    /// A loader whose models never see anybody
    pub fn empty() -> Self {
        Self::from_frames(Vec::new())
    }

    /// Restrict which architectures load successfully
    pub fn with_available(mut self, available: Vec<ModelArchitecture>) -> Self {
        self.available = available;
        self
    }

    /// Number of recorded frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl PoseModelLoader for RecordedPoseLoader {
    fn load(&mut self, architecture: ModelArchitecture) -> Result<Box<dyn PoseModel>, PoseError> {
        if !self.available.contains(&architecture) {
            return Err(PoseError::ModelLoad {
                architecture,
                reason: "architecture not available for this recording".to_string(),
            });
        }
        Ok(Box::new(RecordedPoseModel {
            frames: Arc::clone(&self.frames),
            architecture,
            cursor: 0,
            disposed: false,
        }))
    }
}

/// Replays recorded frames in order, looping at the end
pub struct RecordedPoseModel {
    frames: Arc<Vec<Vec<Pose>>>,
    architecture: ModelArchitecture,
    cursor: usize,
    disposed: bool,
}

impl PoseModel for RecordedPoseModel {
    fn architecture(&self) -> ModelArchitecture {
        self.architecture
    }

    fn estimate(&mut self, frame: &VideoFrame, options: &EstimateOptions) -> Result<Vec<Pose>, PoseError> {
        if self.disposed {
            return Err(PoseError::Estimation("model was disposed".to_string()));
        }
        if self.frames.is_empty() {
            return Ok(Vec::new());
        }

        let mut poses = self.frames[self.cursor % self.frames.len()].clone();
        self.cursor = self.cursor.wrapping_add(1);

        if options.flip_horizontal {
            let width = frame.width() as f32;
            for pose in &mut poses {
                pose.flip_horizontal(width);
            }
        }
        Ok(decode(poses, &options.decoding))
    }

    fn dispose(&mut self) {
        log::debug!("Disposing recorded {} model", self.architecture);
        self.disposed = true;
    }
}

/// Order by confidence and apply the decoding mode's limits
fn decode(mut poses: Vec<Pose>, mode: &DecodingMode) -> Vec<Pose> {
    poses.sort_by(|a, b| b.score.total_cmp(&a.score));

    match *mode {
        DecodingMode::SinglePerson => {
            poses.truncate(1);
            poses
        }
        DecodingMode::MultiPerson {
            max_poses,
            min_part_confidence,
            nms_radius,
        } => {
            let mut kept: Vec<Pose> = Vec::new();
            for pose in poses {
                if kept.len() >= max_poses {
                    break;
                }
                let Some(root) = pose
                    .keypoints
                    .iter()
                    .filter(|keypoint| keypoint.is_confident(min_part_confidence))
                    .max_by(|a, b| a.score.total_cmp(&b.score))
                else {
                    continue;
                };
                let suppressed = kept.iter().any(|other| {
                    other
                        .keypoint(root.part)
                        .map_or(false, |twin| twin.position.distance(&root.position) <= nms_radius)
                });
                if !suppressed {
                    kept.push(pose);
                }
            }
            kept
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Keypoint, KeypointName};
    use image::RgbImage;

    fn frame(width: u32) -> VideoFrame {
        VideoFrame {
            image: RgbImage::new(width, 10),
            index: 0,
        }
    }

    fn single() -> EstimateOptions {
        EstimateOptions {
            decoding: DecodingMode::SinglePerson,
            flip_horizontal: false,
            image_scale_factor: 0.5,
            output_stride: 16,
        }
    }

    fn multi(max_poses: usize, min_part_confidence: f32, nms_radius: f32) -> EstimateOptions {
        EstimateOptions {
            decoding: DecodingMode::MultiPerson {
                max_poses,
                min_part_confidence,
                nms_radius,
            },
            ..single()
        }
    }

    fn person(score: f32, x: f32) -> Pose {
        Pose::new(score, vec![Keypoint::new(KeypointName::Nose, x, 50.0, score)])
    }

    #[test]
    fn test_parse_recording_skips_blank_lines() {
        let text = "[]\n\n[{\"score\":0.9,\"keypoints\":[]}]\n";
        let loader = RecordedPoseLoader::from_reader(text.as_bytes()).unwrap();
        assert_eq!(loader.frame_count(), 2);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let text = "[]\nnot json\n";
        match RecordedPoseLoader::from_reader(text.as_bytes()) {
            Err(PoseError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other.map(|l| l.frame_count())),
        }
    }

    #[test]
    fn test_replay_loops() {
        let mut loader = RecordedPoseLoader::from_frames(vec![vec![person(0.9, 1.0)], vec![]]);
        let mut model = loader.load(ModelArchitecture::MobileNet101).unwrap();

        assert_eq!(model.estimate(&frame(100), &single()).unwrap().len(), 1);
        assert!(model.estimate(&frame(100), &single()).unwrap().is_empty());
        assert_eq!(model.estimate(&frame(100), &single()).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_recording_yields_no_poses() {
        let mut loader = RecordedPoseLoader::empty();
        let mut model = loader.load(ModelArchitecture::MobileNet050).unwrap();
        assert!(model.estimate(&frame(100), &single()).unwrap().is_empty());
    }

    #[test]
    fn test_single_person_keeps_most_confident() {
        let mut loader = RecordedPoseLoader::from_frames(vec![vec![person(0.2, 1.0), person(0.8, 2.0)]]);
        let mut model = loader.load(ModelArchitecture::MobileNet101).unwrap();
        let poses = model.estimate(&frame(100), &single()).unwrap();
        assert_eq!(poses.len(), 1);
        assert_eq!(poses[0].score, 0.8);
    }

    #[test]
    fn test_flip_uses_frame_width() {
        let mut loader = RecordedPoseLoader::from_frames(vec![vec![person(0.9, 100.0)]]);
        let mut model = loader.load(ModelArchitecture::MobileNet101).unwrap();
        let options = EstimateOptions {
            flip_horizontal: true,
            ..single()
        };
        let poses = model.estimate(&frame(1250), &options).unwrap();
        assert_eq!(poses[0].keypoints[0].position.x, 1150.0);
    }

    #[test]
    fn test_multi_person_caps_and_suppresses() {
        let frames = vec![vec![
            person(0.9, 100.0),
            person(0.8, 110.0), // within radius of the first
            person(0.7, 400.0),
            person(0.6, 700.0),
            person(0.1, 900.0), // below part confidence
        ]];
        let mut loader = RecordedPoseLoader::from_frames(frames);
        let mut model = loader.load(ModelArchitecture::MobileNet101).unwrap();

        let poses = model.estimate(&frame(1250), &multi(2, 0.3, 20.0)).unwrap();
        let xs: Vec<f32> = poses.iter().map(|p| p.keypoints[0].position.x).collect();
        assert_eq!(xs, vec![100.0, 400.0]);

        let poses = model.estimate(&frame(1250), &multi(10, 0.3, 20.0)).unwrap();
        assert_eq!(poses.len(), 3);
    }

    #[test]
    fn test_unavailable_architecture_fails_to_load() {
        let mut loader = RecordedPoseLoader::empty().with_available(vec![ModelArchitecture::MobileNet101]);
        assert!(matches!(
            loader.load(ModelArchitecture::MobileNet075),
            Err(PoseError::ModelLoad { .. })
        ));
    }

    #[test]
    fn test_disposed_model_refuses_to_estimate() {
        let mut loader = RecordedPoseLoader::from_frames(vec![vec![person(0.9, 1.0)]]);
        let mut model = loader.load(ModelArchitecture::MobileNet101).unwrap();
        model.dispose();
        assert!(model.estimate(&frame(10), &single()).is_err());
    }
}
