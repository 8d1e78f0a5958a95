//! Play volume and stock bodies
//!
//! A closed box of six static slabs around the origin, the controllable
//! player box and the free ball. Units are world units; y is up.

use super::{BodyDesc, BodyShape, Material};
use crate::foundation::math::{constants::HALF_PI, rotation_x, Vec3};

/// Half-extents of the player box
pub const PLAYER_HALF_EXTENT: f32 = 1.0;

/// Radius of every ball
pub const BALL_RADIUS: f32 = 1.0;

/// Mass of every ball
pub const BALL_MASS: f32 = 5.0;

/// Linear damping of every ball
pub const BALL_LINEAR_DAMPING: f32 = 0.9;

/// The six static boundaries: floor, ceiling, two side walls, two end walls
pub fn play_volume() -> Vec<BodyDesc> {
    let horizontal = rotation_x(-HALF_PI);
    let slab = |half_extents: Vec3, position: Vec3| {
        BodyDesc::fixed(BodyShape::Cuboid { half_extents }, Material::Wall).with_position(position)
    };

    vec![
        // Floor and ceiling
        slab(Vec3::new(30.0, 30.0, 10.0), Vec3::new(0.0, -20.0, 0.0)).with_rotation(horizontal),
        slab(Vec3::new(30.0, 30.0, 10.0), Vec3::new(0.0, 20.0, 0.0)).with_rotation(horizontal),
        // Near and far
        slab(Vec3::new(20.0, 10.0, 20.0), Vec3::new(0.0, 0.0, -20.0)).with_rotation(horizontal),
        slab(Vec3::new(20.0, 10.0, 20.0), Vec3::new(0.0, 0.0, 20.0)).with_rotation(horizontal),
        // Left and right
        slab(Vec3::new(20.0, 10.0, 20.0), Vec3::new(-40.0, 0.0, 0.0)),
        slab(Vec3::new(20.0, 10.0, 20.0), Vec3::new(40.0, 0.0, 0.0)),
    ]
}

/// The controllable box at the origin
pub fn player_box() -> BodyDesc {
    BodyDesc::dynamic(
        BodyShape::Cuboid {
            half_extents: Vec3::repeat(PLAYER_HALF_EXTENT),
        },
        1.0,
        Material::Player,
    )
    .with_angular_damping(0.2)
}

/// A ball at `position`
pub fn ball(position: Vec3) -> BodyDesc {
    BodyDesc::dynamic(BodyShape::Ball { radius: BALL_RADIUS }, BALL_MASS, Material::Ball)
        .with_position(position)
        .with_linear_damping(BALL_LINEAR_DAMPING)
}

/// The free ball that shares the volume with the player in the nudge demo
pub fn free_ball() -> BodyDesc {
    ball(Vec3::new(0.0, 5.0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_is_six_static_walls() {
        let walls = play_volume();
        assert_eq!(walls.len(), 6);
        assert!(walls.iter().all(|wall| wall.is_static() && wall.material == Material::Wall));
    }

    #[test]
    fn test_player_box_is_unit_mass() {
        let player = player_box();
        assert_eq!(player.mass(), Some(1.0));
        assert_eq!(player.position, Vec3::zeros());
    }
}
