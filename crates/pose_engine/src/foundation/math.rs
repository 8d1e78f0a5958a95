//! Math utilities and types
//!
//! Thin aliases over nalgebra, shared by the physics adapter and the scene graph.

pub use nalgebra::{Quaternion, Unit, Vector2, Vector3};

/// 2D vector type (image space, pixels)
pub type Vec2 = Vector2<f32>;

/// 3D vector type (world space)
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = nalgebra::UnitQuaternion<f32>;

/// Rigid transform copied from a physics body into its renderable
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Overwrite position and rotation, keeping scale
    pub fn copy_pose(&mut self, position: &Vec3, rotation: &Quat) {
        self.position = *position;
        self.rotation = *rotation;
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;
}

/// Rotation of `angle` radians about the X axis
pub fn rotation_x(angle: f32) -> Quat {
    Quat::from_axis_angle(&Vec3::x_axis(), angle)
}
