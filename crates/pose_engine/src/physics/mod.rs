//! Rigid-body physics
//!
//! A thin adapter over `rapier3d`. The frame loop only needs to add and
//! remove bodies, step at a fixed rate, move the controllable body in place
//! and learn which contacts began during the last step. Everything else stays
//! inside rapier.

pub mod arena;
pub mod material;

pub use material::{ContactMaterial, Material};

use crate::core::PhysicsConfig;
use crate::foundation::math::{Quat, Vec3};
use rapier3d::prelude::{
    BroadPhase, CCDSolver, ColliderBuilder, ColliderHandle, ColliderSet, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Physics errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    /// Handle does not name a live body
    #[error("Unknown body handle: {0:?}")]
    UnknownBody(BodyHandle),
}

/// Stable handle to a body in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

impl BodyHandle {
    fn sort_key(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }
}

/// Collision shape of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    /// Box given by half-extents
    Cuboid {
        /// Half size along each axis
        half_extents: Vec3,
    },
    /// Sphere
    Ball {
        /// Sphere radius
        radius: f32,
    },
}

/// Static or simulated
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    /// Moved by the solver
    Dynamic {
        /// Body mass
        mass: f32,
    },
    /// Never moves
    Static,
}

/// Everything needed to create a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    /// Collision shape
    pub shape: BodyShape,
    /// Static or dynamic
    pub kind: BodyKind,
    /// Surface material
    pub material: Material,
    /// Initial position
    pub position: Vec3,
    /// Initial rotation
    pub rotation: Quat,
    /// Initial linear velocity
    pub linear_velocity: Vec3,
    /// Linear velocity damping
    pub linear_damping: f32,
    /// Angular velocity damping
    pub angular_damping: f32,
}

impl BodyDesc {
    /// A simulated body of the given mass at the origin
    pub fn dynamic(shape: BodyShape, mass: f32, material: Material) -> Self {
        Self::new(shape, BodyKind::Dynamic { mass }, material)
    }

    /// A static body at the origin
    pub fn fixed(shape: BodyShape, material: Material) -> Self {
        Self::new(shape, BodyKind::Static, material)
    }

    fn new(shape: BodyShape, kind: BodyKind, material: Material) -> Self {
        Self {
            shape,
            kind,
            material,
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            linear_velocity: Vec3::zeros(),
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// Set the initial position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the initial rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the initial linear velocity
    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set linear damping
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Set angular damping
    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }

    /// Whether the body never moves
    pub fn is_static(&self) -> bool {
        matches!(self.kind, BodyKind::Static)
    }

    /// Mass of a dynamic body
    pub fn mass(&self) -> Option<f32> {
        match self.kind {
            BodyKind::Dynamic { mass } => Some(mass),
            BodyKind::Static => None,
        }
    }
}

/// A contact that began during the last step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// First body
    pub body_a: BodyHandle,
    /// First body's material
    pub material_a: Material,
    /// Second body
    pub body_b: BodyHandle,
    /// Second body's material
    pub material_b: Material,
}

impl Contact {
    /// Whether either side has `material`
    pub fn involves(&self, material: Material) -> bool {
        self.material_a == material || self.material_b == material
    }

    /// Whether the two sides are exactly `first` and `second`, in either order
    pub fn is_between(&self, first: Material, second: Material) -> bool {
        (self.material_a == first && self.material_b == second)
            || (self.material_a == second && self.material_b == first)
    }

    /// The side opposite a body of `material`
    pub fn other_than(&self, material: Material) -> Option<(BodyHandle, Material)> {
        if self.material_a == material {
            Some((self.body_b, self.material_b))
        } else if self.material_b == material {
            Some((self.body_a, self.material_a))
        } else {
            None
        }
    }

    /// Material identifiers of both sides
    pub fn material_names(&self) -> (&'static str, &'static str) {
        (self.material_a.name(), self.material_b.name())
    }
}

type ColliderPair = (ColliderHandle, ColliderHandle);

fn ordered(a: ColliderHandle, b: ColliderHandle) -> ColliderPair {
    if a.into_raw_parts() <= b.into_raw_parts() {
        (a, b)
    } else {
        (b, a)
    }
}

/// Pairs in `current` that were not in `previous`, in a stable order
fn newly_started(current: &HashSet<ColliderPair>, previous: &HashSet<ColliderPair>) -> Vec<ColliderPair> {
    let mut started: Vec<_> = current.difference(previous).copied().collect();
    started.sort_by_key(|(a, b)| (a.into_raw_parts(), b.into_raw_parts()));
    started
}

/// The simulated world
pub struct PhysicsWorld {
    gravity: Vec3,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    contact_material: ContactMaterial,
    materials: HashMap<RigidBodyHandle, Material>,

    /// Touching collider pairs after the last step
    current_pairs: HashSet<ColliderPair>,

    /// Contacts that began during the last step
    new_contacts: Vec<Contact>,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new(config: &PhysicsConfig) -> Self {
        let params = IntegrationParameters {
            dt: config.timestep,
            max_velocity_iterations: config.solver_iterations,
            ..IntegrationParameters::default()
        };
        let [gx, gy, gz] = config.gravity;

        Self {
            gravity: Vec3::new(gx, gy, gz),
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            contact_material: ContactMaterial {
                friction: config.friction,
                restitution: config.restitution,
            },
            materials: HashMap::new(),
            current_pairs: HashSet::new(),
            new_contacts: Vec::new(),
        }
    }

    /// Fixed step length in seconds
    pub fn timestep(&self) -> f32 {
        self.params.dt
    }

    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Whether `body` is live
    pub fn contains(&self, body: BodyHandle) -> bool {
        self.bodies.contains(body.0)
    }

    /// Add a body and its collider
    pub fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let builder = match desc.kind {
            BodyKind::Dynamic { .. } => RigidBodyBuilder::dynamic(),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        };
        let body = builder
            .position(nalgebra::Isometry3::from_parts(desc.position.into(), desc.rotation))
            .linvel(desc.linear_velocity)
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .build();
        let handle = self.bodies.insert(body);

        let mut collider = match desc.shape {
            BodyShape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            BodyShape::Ball { radius } => ColliderBuilder::ball(radius),
        }
        .friction(self.contact_material.friction)
        .restitution(self.contact_material.restitution);
        if let Some(mass) = desc.mass() {
            collider = collider.mass(mass);
        }
        self.colliders.insert_with_parent(collider.build(), handle, &mut self.bodies);
        self.materials.insert(handle, desc.material);

        log::trace!("Added {} body {:?}", desc.material, handle);
        BodyHandle(handle)
    }

    /// Remove a body and its collider
    pub fn remove_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        self.bodies
            .remove(
                body.0,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .ok_or(PhysicsError::UnknownBody(body))?;
        self.materials.remove(&body.0);
        Ok(())
    }

    /// Advance the simulation by one fixed step
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
        self.collect_contacts();
    }

    fn collect_contacts(&mut self) {
        let previous = std::mem::take(&mut self.current_pairs);
        self.current_pairs = self
            .narrow_phase
            .contact_pairs()
            .filter(|pair| pair.has_any_active_contact)
            .map(|pair| ordered(pair.collider1, pair.collider2))
            .collect();

        self.new_contacts = newly_started(&self.current_pairs, &previous)
            .into_iter()
            .filter_map(|(a, b)| self.contact_between(a, b))
            .collect();
        self.new_contacts
            .sort_by_key(|contact| (contact.body_a.sort_key(), contact.body_b.sort_key()));
    }

    fn contact_between(&self, a: ColliderHandle, b: ColliderHandle) -> Option<Contact> {
        let body_a = self.colliders.get(a)?.parent()?;
        let body_b = self.colliders.get(b)?.parent()?;
        Some(Contact {
            body_a: BodyHandle(body_a),
            material_a: *self.materials.get(&body_a)?,
            body_b: BodyHandle(body_b),
            material_b: *self.materials.get(&body_b)?,
        })
    }

    /// Contacts that began during the last step
    pub fn new_contacts(&self) -> &[Contact] {
        &self.new_contacts
    }

    /// Current position of a body
    pub fn translation(&self, body: BodyHandle) -> Result<Vec3, PhysicsError> {
        self.bodies
            .get(body.0)
            .map(|rigid_body| *rigid_body.translation())
            .ok_or(PhysicsError::UnknownBody(body))
    }

    /// Current rotation of a body
    pub fn rotation(&self, body: BodyHandle) -> Result<Quat, PhysicsError> {
        self.bodies
            .get(body.0)
            .map(|rigid_body| *rigid_body.rotation())
            .ok_or(PhysicsError::UnknownBody(body))
    }

    /// Material of a body
    pub fn material(&self, body: BodyHandle) -> Option<Material> {
        self.materials.get(&body.0).copied()
    }

    /// Add `offset` to a body's position in place
    pub fn translate(&mut self, body: BodyHandle, offset: Vec3) -> Result<(), PhysicsError> {
        let rigid_body = self.bodies.get_mut(body.0).ok_or(PhysicsError::UnknownBody(body))?;
        let position = rigid_body.translation() + offset;
        rigid_body.set_translation(position, true);
        Ok(())
    }
}
