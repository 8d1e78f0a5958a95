//! # Pose Engine
//!
//! A frame loop that turns camera pose estimates into motion in a rigid-body
//! scene, with collision-driven audio.
//!
//! ## Features
//!
//! - **Pose input**: camera providers and pose models behind traits, with a
//!   recording replay model bundled
//! - **Gesture control**: wrist positions mapped to per-frame nudges
//! - **Physics**: `rapier3d` world with a closed play volume and contact reporting
//! - **Presentation**: scene graph, pose overlay, headless or glfw presenter
//! - **Audio**: sampled and synthesized cues through rodio, silent fallback
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pose_engine::prelude::*;
//!
//! struct Demo;
//!
//! impl Application for Demo {
//!     fn initialize(&mut self, session: &mut Session) -> Result<(), AppError> {
//!         session.add_prop(&arena::free_ball(), [0.2, 0.6, 0.9]);
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _session: &mut Session, _contacts: &[Contact], _dt: f32) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _session: &mut Session) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::default();
//!     let mut cameras = TestPatternProvider::new((1250, 500));
//!     let loader = Box::new(RecordedPoseLoader::empty());
//!     let presenter = create_presenter(&config.presentation)?;
//!
//!     let mut engine = Engine::start(config, &mut cameras, loader, presenter)?;
//!     engine.run(&mut Demo)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod camera;
pub mod pose;
pub mod control;
pub mod physics;
pub mod scene;
pub mod present;
pub mod input;
pub mod audio;

mod application;
mod engine;
mod session;

pub use application::{AppError, AppEvent, Application};
pub use engine::{architecture_for_key, Engine, EngineError};
pub use session::{Session, PLAYER_COLOR, WALL_COLOR};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError, AppEvent,
        Engine, EngineError, Session,
        audio::{AudioBackendConfig, AudioSystem, Voice},
        camera::{CameraProvider, ImageSequenceProvider, TestPatternProvider},
        config::Config,
        control::{ControlSignal, GestureMapper},
        core::SessionConfig,
        foundation::{
            math::{Quat, Transform, Vec3},
            time::{IntervalTimer, Timer},
        },
        input::KeyCode,
        physics::{arena, BodyDesc, BodyHandle, Contact, Material, PhysicsWorld},
        pose::{PoseModelLoader, RecordedPoseLoader},
        present::{create_presenter, HeadlessPresenter, Presenter},
        scene::{BodyPair, Color},
    };
}
