//! Per-run state owned by the frame loop
//!
//! The world, the scene and every body/renderable pairing live here. The
//! controllable body is created once and only ever moved in place.

use crate::control::{apply_control, ControlSignal, GestureMapper};
use crate::core::SessionConfig;
use crate::physics::{arena, BodyDesc, BodyHandle, PhysicsError, PhysicsWorld};
use crate::scene::{sync_transforms, BodyPair, Color, Renderable, SceneGraph};
use crate::foundation::math::Transform;

/// Colour of the play-volume walls
pub const WALL_COLOR: Color = [0.25, 0.3, 0.35];

/// Colour of the controllable box
pub const PLAYER_COLOR: Color = [0.9, 0.45, 0.1];

/// State of one demo run
pub struct Session {
    /// Live settings
    pub config: SessionConfig,
    /// Physics world
    pub world: PhysicsWorld,
    /// Renderables
    pub scene: SceneGraph,
    mapper: GestureMapper,
    controllable: BodyPair,
    boundaries: Vec<BodyPair>,
    props: Vec<BodyPair>,
    spawned: Vec<BodyPair>,
}

impl Session {
    /// Build the play volume and the controllable box
    pub fn new(config: SessionConfig) -> Self {
        let mut world = PhysicsWorld::new(&config.physics);
        let mut scene = SceneGraph::new();

        let boundaries = arena::play_volume()
            .iter()
            .map(|desc| pair(&mut world, &mut scene, desc, WALL_COLOR))
            .collect();
        let controllable = pair(&mut world, &mut scene, &arena::player_box(), PLAYER_COLOR);

        Self {
            mapper: GestureMapper::new(config.control.clone()),
            config,
            world,
            scene,
            controllable,
            boundaries,
            props: Vec::new(),
            spawned: Vec::new(),
        }
    }

    /// The controllable body and its renderable
    pub fn controllable(&self) -> BodyPair {
        self.controllable
    }

    /// Gesture mapper built from the control settings
    pub fn mapper(&self) -> &GestureMapper {
        &self.mapper
    }

    /// Move the controllable body by `signal`
    pub fn apply_control(&mut self, signal: ControlSignal) -> Result<(), PhysicsError> {
        apply_control(&mut self.world, self.controllable.body, signal)
    }

    /// Add a permanent body
    pub fn add_prop(&mut self, desc: &BodyDesc, color: Color) -> BodyPair {
        let added = pair(&mut self.world, &mut self.scene, desc, color);
        self.props.push(added);
        added
    }

    /// Add a body that a reset removes
    pub fn spawn(&mut self, desc: &BodyDesc, color: Color) -> BodyPair {
        let added = pair(&mut self.world, &mut self.scene, desc, color);
        self.spawned.push(added);
        added
    }

    /// Bodies added with [`spawn`](Self::spawn) and not yet cleared
    pub fn spawned(&self) -> &[BodyPair] {
        &self.spawned
    }

    /// Whether `body` is a tracked spawned body
    pub fn is_spawned(&self, body: BodyHandle) -> bool {
        self.spawned.iter().any(|pair| pair.body == body)
    }

    /// Remove every spawned body and its renderable
    ///
    /// Returns how many were removed. Every pair is removed even when one
    /// body is missing from the world; the first such error is returned.
    pub fn clear_spawned(&mut self) -> Result<usize, PhysicsError> {
        let cleared = self.spawned.len();
        let mut first_error = None;
        for pair in self.spawned.drain(..) {
            self.scene.remove(pair.renderable);
            if let Err(e) = self.world.remove_body(pair.body) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(cleared),
        }
    }

    /// Every body paired with a renderable
    pub fn body_pairs(&self) -> impl Iterator<Item = &BodyPair> {
        std::iter::once(&self.controllable)
            .chain(&self.boundaries)
            .chain(&self.props)
            .chain(&self.spawned)
    }

    /// Copy simulated poses into the renderables
    pub fn sync_transforms(&mut self) {
        let pairs: Vec<BodyPair> = self.body_pairs().copied().collect();
        sync_transforms(&self.world, &mut self.scene, &pairs);
    }
}

fn pair(world: &mut PhysicsWorld, scene: &mut SceneGraph, desc: &BodyDesc, color: Color) -> BodyPair {
    let renderable = Renderable::new(desc.shape.into(), color)
        .with_transform(Transform::from_position_rotation(desc.position, desc.rotation));
    BodyPair {
        body: world.add_body(desc),
        renderable: scene.add(renderable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_session_has_volume_and_player() {
        let session = Session::new(SessionConfig::default());
        assert_eq!(session.world.body_count(), 7);
        assert_eq!(session.scene.len(), 7);
        assert!(session.spawned().is_empty());
    }

    #[test]
    fn test_zero_signal_leaves_player_untouched() {
        let mut session = Session::new(SessionConfig::default());
        let body = session.controllable().body;
        let before = session.world.translation(body).unwrap();

        session.apply_control(ControlSignal::ZERO).unwrap();
        assert_eq!(session.world.translation(body).unwrap(), before);
    }

    #[test]
    fn test_control_moves_player_in_place() {
        let mut session = Session::new(SessionConfig::default());
        let player = session.controllable();
        session.apply_control(ControlSignal { horizontal: 0.4, depth: -0.4 }).unwrap();

        assert_eq!(session.controllable(), player);
        let position = session.world.translation(player.body).unwrap();
        assert_relative_eq!(position.x, 0.4);
        assert_relative_eq!(position.z, -0.4);
    }

    #[test]
    fn test_clear_spawned_removes_both_sides() {
        let mut session = Session::new(SessionConfig::default());
        let first = session.spawn(&arena::ball(Vec3::new(3.0, 0.0, 0.0)), [1.0; 3]);
        session.spawn(&arena::ball(Vec3::new(-3.0, 0.0, 0.0)), [1.0; 3]);
        session.add_prop(&arena::free_ball(), [1.0; 3]);
        assert!(session.is_spawned(first.body));

        assert_eq!(session.clear_spawned().unwrap(), 2);
        assert!(!session.is_spawned(first.body));
        assert!(!session.world.contains(first.body));
        assert!(!session.scene.contains(first.renderable));
        assert_eq!(session.scene.released_count(), 2);
        assert_eq!(session.world.body_count(), 8);
    }

    #[test]
    fn test_clear_spawned_finishes_after_missing_body() {
        let mut session = Session::new(SessionConfig::default());
        let gone = session.spawn(&arena::ball(Vec3::new(3.0, 0.0, 0.0)), [1.0; 3]);
        let kept = session.spawn(&arena::ball(Vec3::new(-3.0, 0.0, 0.0)), [1.0; 3]);
        session.world.remove_body(gone.body).unwrap();

        assert_eq!(session.clear_spawned(), Err(PhysicsError::UnknownBody(gone.body)));
        assert!(session.spawned().is_empty());
        assert!(!session.world.contains(kept.body));
        assert!(!session.scene.contains(kept.renderable));
        assert!(!session.scene.contains(gone.renderable));
        assert_eq!(session.world.body_count(), 7);
        assert_eq!(session.scene.len(), 7);
    }

    #[test]
    fn test_sync_moves_renderables_with_bodies() {
        let mut session = Session::new(SessionConfig::default());
        let ball = session.add_prop(&arena::free_ball(), [1.0; 3]);
        for _ in 0..5 {
            session.world.step();
        }
        session.sync_transforms();

        let drawn = session.scene.get(ball.renderable).unwrap().transform.position;
        assert_eq!(drawn, session.world.translation(ball.body).unwrap());
        assert!(drawn.y < 5.0);
    }
}
