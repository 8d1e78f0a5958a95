//! Contact materials
//!
//! Every body carries one material. Collision consumers only see material
//! identifiers, so a contact between the player and a wall can be told apart
//! from one between the player and a ball without looking at bodies.

use serde::{Deserialize, Serialize};

/// Surface material attached to a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Material {
    /// The controllable box
    Player,
    /// Static play-volume boundaries
    Wall,
    /// Free and spawned balls
    Ball,
}

impl Material {
    /// Stable identifier reported with contacts
    pub fn name(self) -> &'static str {
        match self {
            Material::Player => "playerMaterial",
            Material::Wall => "wallMaterial",
            Material::Ball => "ballMaterial",
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Friction and restitution applied where two materials meet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMaterial {
    /// Coulomb friction coefficient
    pub friction: f32,
    /// Bounciness in 0..=1
    pub restitution: f32,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self {
            friction: 0.0,
            restitution: 0.9,
        }
    }
}
