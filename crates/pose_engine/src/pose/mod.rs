//! Pose data produced by the estimator each frame
//!
//! Keypoint naming and ordering follow the 17-part PoseNet layout, so index 9
//! is always the left wrist and index 10 the right wrist.

pub mod estimator;
pub mod recorded;

use serde::{Deserialize, Serialize};

pub use estimator::{
    Algorithm, DecodingMode, EstimateOptions, ModelArchitecture, ModelSlot, PoseError, PoseModel,
    PoseModelLoader,
};
pub use recorded::{RecordedPoseLoader, RecordedPoseModel};

/// Named anatomical landmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeypointName {
    /// Nose
    Nose,
    /// Left eye
    LeftEye,
    /// Right eye
    RightEye,
    /// Left ear
    LeftEar,
    /// Right ear
    RightEar,
    /// Left shoulder
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// Left elbow
    LeftElbow,
    /// Right elbow
    RightElbow,
    /// Left wrist
    LeftWrist,
    /// Right wrist
    RightWrist,
    /// Left hip
    LeftHip,
    /// Right hip
    RightHip,
    /// Left knee
    LeftKnee,
    /// Right knee
    RightKnee,
    /// Left ankle
    LeftAnkle,
    /// Right ankle
    RightAnkle,
}

impl KeypointName {
    /// All parts in estimator output order
    pub const ALL: [KeypointName; 17] = [
        KeypointName::Nose,
        KeypointName::LeftEye,
        KeypointName::RightEye,
        KeypointName::LeftEar,
        KeypointName::RightEar,
        KeypointName::LeftShoulder,
        KeypointName::RightShoulder,
        KeypointName::LeftElbow,
        KeypointName::RightElbow,
        KeypointName::LeftWrist,
        KeypointName::RightWrist,
        KeypointName::LeftHip,
        KeypointName::RightHip,
        KeypointName::LeftKnee,
        KeypointName::RightKnee,
        KeypointName::LeftAnkle,
        KeypointName::RightAnkle,
    ];

    /// Position of this part in the estimator's keypoint list
    pub fn index(self) -> usize {
        self as usize
    }

    /// Part at the given estimator index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Connected part pairs drawn as skeleton segments
pub const ADJACENT_PARTS: [(KeypointName, KeypointName); 12] = [
    (KeypointName::LeftHip, KeypointName::LeftShoulder),
    (KeypointName::LeftElbow, KeypointName::LeftShoulder),
    (KeypointName::LeftElbow, KeypointName::LeftWrist),
    (KeypointName::LeftHip, KeypointName::LeftKnee),
    (KeypointName::LeftKnee, KeypointName::LeftAnkle),
    (KeypointName::RightHip, KeypointName::RightShoulder),
    (KeypointName::RightElbow, KeypointName::RightShoulder),
    (KeypointName::RightElbow, KeypointName::RightWrist),
    (KeypointName::RightHip, KeypointName::RightKnee),
    (KeypointName::RightKnee, KeypointName::RightAnkle),
    (KeypointName::LeftShoulder, KeypointName::RightShoulder),
    (KeypointName::LeftHip, KeypointName::RightHip),
];

/// Image-space position in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImagePoint {
    /// Horizontal pixel coordinate
    pub x: f32,
    /// Vertical pixel coordinate (grows downwards)
    pub y: f32,
}

impl ImagePoint {
    /// Create a point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &ImagePoint) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// One detected landmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Which landmark this is
    pub part: KeypointName,
    /// Where it is in the frame
    pub position: ImagePoint,
    /// Confidence in [0, 1]; NaN when the estimator did not report one
    pub score: f32,
}

impl Keypoint {
    /// Create a keypoint
    pub fn new(part: KeypointName, x: f32, y: f32, score: f32) -> Self {
        Self {
            part,
            position: ImagePoint::new(x, y),
            score,
        }
    }

    /// Whether the score is known and at least `min_confidence`
    pub fn is_confident(&self, min_confidence: f32) -> bool {
        !self.score.is_nan() && self.score >= min_confidence
    }
}

/// One detected person
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Overall pose confidence
    pub score: f32,
    /// Detected keypoints, normally in [`KeypointName::ALL`] order
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    /// Create a pose
    pub fn new(score: f32, keypoints: Vec<Keypoint>) -> Self {
        Self { score, keypoints }
    }

    /// Look up a keypoint by part
    ///
    /// Tries the canonical index first and falls back to a scan for
    /// estimators that emit parts in a different order or drop some.
    pub fn keypoint(&self, part: KeypointName) -> Option<&Keypoint> {
        self.keypoints
            .get(part.index())
            .filter(|keypoint| keypoint.part == part)
            .or_else(|| self.keypoints.iter().find(|keypoint| keypoint.part == part))
    }

    /// Mirror every keypoint around the vertical centre line of a frame
    pub fn flip_horizontal(&mut self, frame_width: f32) {
        for keypoint in &mut self.keypoints {
            keypoint.position.x = frame_width - keypoint.position.x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_pose(x: f32, y: f32) -> Pose {
        let keypoints = KeypointName::ALL
            .iter()
            .map(|&part| Keypoint::new(part, x, y, 0.9))
            .collect();
        Pose::new(0.9, keypoints)
    }

    #[test]
    fn test_wrist_indices_match_estimator_layout() {
        assert_eq!(KeypointName::LeftWrist.index(), 9);
        assert_eq!(KeypointName::RightWrist.index(), 10);
        assert_eq!(KeypointName::from_index(16), Some(KeypointName::RightAnkle));
        assert_eq!(KeypointName::from_index(17), None);
    }

    #[test]
    fn test_keypoint_lookup_by_index() {
        let pose = full_pose(10.0, 20.0);
        let wrist = pose.keypoint(KeypointName::LeftWrist).unwrap();
        assert_eq!(wrist.part, KeypointName::LeftWrist);
    }

    #[test]
    fn test_keypoint_lookup_out_of_order() {
        let pose = Pose::new(
            0.5,
            vec![
                Keypoint::new(KeypointName::RightWrist, 1.0, 2.0, 0.7),
                Keypoint::new(KeypointName::LeftWrist, 3.0, 4.0, 0.8),
            ],
        );
        assert_eq!(pose.keypoint(KeypointName::LeftWrist).unwrap().position.x, 3.0);
        assert!(pose.keypoint(KeypointName::Nose).is_none());
    }

    #[test]
    fn test_nan_score_is_never_confident() {
        let keypoint = Keypoint::new(KeypointName::Nose, 0.0, 0.0, f32::NAN);
        assert!(!keypoint.is_confident(0.0));
    }

    #[test]
    fn test_flip_horizontal() {
        let mut pose = full_pose(100.0, 5.0);
        pose.flip_horizontal(1250.0);
        assert_eq!(pose.keypoints[0].position.x, 1150.0);
        assert_eq!(pose.keypoints[0].position.y, 5.0);
    }

    #[test]
    fn test_parse_posenet_json() {
        let json = r#"{"score":0.8,"keypoints":[{"part":"leftWrist","score":0.9,"position":{"x":700.0,"y":150.0}}]}"#;
        let pose: Pose = serde_json::from_str(json).unwrap();
        assert_eq!(pose.keypoints[0].part, KeypointName::LeftWrist);
        assert_eq!(pose.keypoints[0].position.x, 700.0);
    }
}
