//! Scene graph
//!
//! Renderables keyed by stable handles, plus the body/renderable pairing the
//! frame loop uses to copy simulated poses into what gets drawn.

use crate::foundation::collections::{HandleMap, RenderHandle};
use crate::foundation::math::{Transform, Vec3};
use crate::physics::{BodyHandle, BodyShape, PhysicsWorld};

/// Drawable shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Axis-aligned box in local space
    Box {
        /// Half size along each axis
        half_extents: Vec3,
    },
    /// Sphere
    Sphere {
        /// Sphere radius
        radius: f32,
    },
}

impl From<BodyShape> for Geometry {
    fn from(shape: BodyShape) -> Self {
        match shape {
            BodyShape::Cuboid { half_extents } => Geometry::Box { half_extents },
            BodyShape::Ball { radius } => Geometry::Sphere { radius },
        }
    }
}

/// RGB colour in 0..=1
pub type Color = [f32; 3];

/// Something the presenter draws
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    /// Shape
    pub geometry: Geometry,
    /// Base colour
    pub color: Color,
    /// World transform
    pub transform: Transform,
    /// Whether this object is drawn
    pub visible: bool,
}

impl Renderable {
    /// Create a visible renderable at the origin
    pub fn new(geometry: Geometry, color: Color) -> Self {
        Self {
            geometry,
            color,
            transform: Transform::default(),
            visible: true,
        }
    }

    /// Place the renderable
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// A simulated body and the renderable that shows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPair {
    /// Physics side
    pub body: BodyHandle,
    /// Render side
    pub renderable: RenderHandle,
}

/// All renderables in the session
#[derive(Debug, Default)]
pub struct SceneGraph {
    renderables: HandleMap<Renderable>,
    released: usize,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a renderable
    pub fn add(&mut self, renderable: Renderable) -> RenderHandle {
        self.renderables.insert(renderable)
    }

    /// Remove a renderable and release what it holds
    ///
    /// Returns `None` when the handle was already removed.
    pub fn remove(&mut self, handle: RenderHandle) -> Option<Renderable> {
        let removed = self.renderables.remove(handle)?;
        self.released += 1;
        Some(removed)
    }

    /// Look up a renderable
    pub fn get(&self, handle: RenderHandle) -> Option<&Renderable> {
        self.renderables.get(handle)
    }

    /// Look up a renderable mutably
    pub fn get_mut(&mut self, handle: RenderHandle) -> Option<&mut Renderable> {
        self.renderables.get_mut(handle)
    }

    /// Whether `handle` is still in the scene
    pub fn contains(&self, handle: RenderHandle) -> bool {
        self.renderables.contains_key(handle)
    }

    /// Number of renderables
    pub fn len(&self) -> usize {
        self.renderables.len()
    }

    /// Whether the scene is empty
    pub fn is_empty(&self) -> bool {
        self.renderables.is_empty()
    }

    /// Renderables removed over the scene's lifetime
    pub fn released_count(&self) -> usize {
        self.released
    }

    /// Iterate visible renderables
    pub fn visible(&self) -> impl Iterator<Item = (RenderHandle, &Renderable)> {
        self.renderables.iter().filter(|(_, renderable)| renderable.visible)
    }
}

/// Copy each paired body's position and rotation into its renderable
///
/// Pairs whose body or renderable is gone are skipped.
pub fn sync_transforms<'a>(
    world: &PhysicsWorld,
    scene: &mut SceneGraph,
    pairs: impl IntoIterator<Item = &'a BodyPair>,
) {
    for pair in pairs {
        let (Ok(position), Ok(rotation)) = (world.translation(pair.body), world.rotation(pair.body)) else {
            continue;
        };
        if let Some(renderable) = scene.get_mut(pair.renderable) {
            renderable.transform.copy_pose(&position, &rotation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PhysicsConfig;
    use crate::physics::arena;

    #[test]
    fn test_remove_releases_once() {
        let mut scene = SceneGraph::new();
        let handle = scene.add(Renderable::new(Geometry::Sphere { radius: 1.0 }, [1.0, 0.0, 0.0]));

        assert!(scene.remove(handle).is_some());
        assert!(scene.remove(handle).is_none());
        assert_eq!(scene.released_count(), 1);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_sync_copies_body_pose() {
        let mut world = PhysicsWorld::new(&PhysicsConfig::default());
        let mut scene = SceneGraph::new();
        let desc = arena::free_ball();
        let pair = BodyPair {
            body: world.add_body(&desc),
            renderable: scene.add(Renderable::new(desc.shape.into(), [0.5, 0.5, 0.5])),
        };

        world.step();
        sync_transforms(&world, &mut scene, [&pair]);

        let transform = &scene.get(pair.renderable).unwrap().transform;
        assert_eq!(transform.position, world.translation(pair.body).unwrap());
        assert_eq!(transform.rotation, world.rotation(pair.body).unwrap());
    }

    #[test]
    fn test_sync_skips_removed_bodies() {
        let mut world = PhysicsWorld::new(&PhysicsConfig::default());
        let mut scene = SceneGraph::new();
        let pair = BodyPair {
            body: world.add_body(&arena::free_ball()),
            renderable: scene.add(Renderable::new(Geometry::Sphere { radius: 1.0 }, [0.0; 3])),
        };
        world.remove_body(pair.body).unwrap();

        sync_transforms(&world, &mut scene, [&pair]);
        assert_eq!(scene.get(pair.renderable).unwrap().transform, Transform::default());
    }
}
