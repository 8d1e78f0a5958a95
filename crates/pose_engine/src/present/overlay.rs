//! Pose overlay
//!
//! What gets drawn over the video each frame: keypoints and skeleton segments
//! of every pose confident enough to show.

use crate::pose::{ImagePoint, Pose, ADJACENT_PARTS};
use bitflags::bitflags;

bitflags! {
    /// Which overlay layers are drawn
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OverlayFlags: u8 {
        /// The camera image
        const VIDEO = 1 << 0;
        /// Segments between adjacent keypoints
        const SKELETON = 1 << 1;
        /// Individual keypoints
        const POINTS = 1 << 2;
    }
}

impl Default for OverlayFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Image-space primitives for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    /// Layers to draw
    pub flags: OverlayFlags,
    /// Draw the video mirrored left to right
    pub mirror_video: bool,
    /// Keypoint markers
    pub points: Vec<ImagePoint>,
    /// Skeleton segments
    pub segments: Vec<(ImagePoint, ImagePoint)>,
}

impl Overlay {
    /// Build the overlay for this frame's poses
    ///
    /// Poses scoring below `min_pose_confidence` are skipped. Keypoints, and
    /// segments whose two ends, must reach `min_part_confidence`.
    pub fn build(
        poses: &[Pose],
        min_pose_confidence: f32,
        min_part_confidence: f32,
        flags: OverlayFlags,
        mirror_video: bool,
    ) -> Self {
        let mut overlay = Overlay {
            flags,
            mirror_video,
            ..Default::default()
        };

        for pose in poses.iter().filter(|pose| pose.score >= min_pose_confidence) {
            if flags.contains(OverlayFlags::POINTS) {
                overlay.points.extend(
                    pose.keypoints
                        .iter()
                        .filter(|keypoint| keypoint.is_confident(min_part_confidence))
                        .map(|keypoint| keypoint.position),
                );
            }
            if flags.contains(OverlayFlags::SKELETON) {
                for (from, to) in ADJACENT_PARTS {
                    let (Some(a), Some(b)) = (pose.keypoint(from), pose.keypoint(to)) else {
                        continue;
                    };
                    if a.is_confident(min_part_confidence) && b.is_confident(min_part_confidence) {
                        overlay.segments.push((a.position, b.position));
                    }
                }
            }
        }

        overlay
    }

    /// Whether the camera image is drawn
    pub fn shows_video(&self) -> bool {
        self.flags.contains(OverlayFlags::VIDEO)
    }
}
