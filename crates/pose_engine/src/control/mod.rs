//! Gesture-to-control mapping
//!
//! Turns the first detected pose into a [`ControlSignal`]: the horizontal
//! landmark's x picks left or right, the vertical landmark's y picks towards
//! or away from the camera. Each active axis moves a fixed amount per frame.

use crate::core::ControlConfig;
use crate::physics::{BodyHandle, PhysicsError, PhysicsWorld};
use crate::foundation::math::Vec3;
use crate::pose::{KeypointName, Pose};

/// Per-frame directional input
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlSignal {
    /// Change along world x
    pub horizontal: f32,
    /// Change along world z
    pub depth: f32,
}

impl ControlSignal {
    /// No movement
    pub const ZERO: ControlSignal = ControlSignal {
        horizontal: 0.0,
        depth: 0.0,
    };

    /// Whether both deltas are zero
    pub fn is_zero(&self) -> bool {
        self.horizontal == 0.0 && self.depth == 0.0
    }

    /// World-space offset for this signal
    pub fn offset(&self) -> Vec3 {
        Vec3::new(self.horizontal, 0.0, self.depth)
    }
}

/// Maps poses to control signals
#[derive(Debug, Clone)]
pub struct GestureMapper {
    config: ControlConfig,
}

impl GestureMapper {
    /// Create a mapper
    pub fn new(config: ControlConfig) -> Self {
        Self { config }
    }

    /// Current settings
    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Signal for this frame's poses
    ///
    /// Never fails: no pose, a missing landmark or an unconfident landmark
    /// all contribute zero on their axis.
    pub fn map(&self, poses: &[Pose]) -> ControlSignal {
        let Some(pose) = poses.first() else {
            return ControlSignal::ZERO;
        };

        let horizontal = self
            .landmark(pose, self.config.horizontal_landmark)
            .map_or(0.0, |(x, _)| step(x, self.config.threshold_x, self.config.magnitude));
        let depth = self
            .landmark(pose, self.config.vertical_landmark)
            .map_or(0.0, |(_, y)| step(y, self.config.threshold_y, self.config.magnitude));

        ControlSignal { horizontal, depth }
    }

    fn landmark(&self, pose: &Pose, part: KeypointName) -> Option<(f32, f32)> {
        pose.keypoint(part)
            .filter(|keypoint| keypoint.is_confident(self.config.min_keypoint_confidence))
            .map(|keypoint| (keypoint.position.x, keypoint.position.y))
    }
}

/// `+magnitude` above the threshold, `-magnitude` below, zero on it
fn step(value: f32, threshold: f32, magnitude: f32) -> f32 {
    if value > threshold {
        magnitude
    } else if value < threshold {
        -magnitude
    } else {
        0.0
    }
}

/// Add a signal to a body's position in place
///
/// A zero signal leaves the body untouched.
pub fn apply_control(world: &mut PhysicsWorld, body: BodyHandle, signal: ControlSignal) -> Result<(), PhysicsError> {
    if signal.is_zero() {
        return Ok(());
    }
    world.translate(body, signal.offset())
}
