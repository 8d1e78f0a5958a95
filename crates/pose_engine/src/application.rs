//! Application trait and lifecycle management

use crate::control::ControlSignal;
use crate::input::KeyCode;
use crate::physics::{Contact, PhysicsError};
use crate::session::Session;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to build a demo on the frame loop. Each frame the
/// loop calls [`control`](Application::control) with the gesture signal,
/// steps physics, then calls [`update`](Application::update) with the
/// contacts that began during that step.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame. The session already holds the
    /// play volume and the controllable body.
    fn initialize(&mut self, session: &mut Session) -> Result<(), AppError>;

    /// Apply this frame's control signal
    ///
    /// The default moves the controllable body.
    fn control(&mut self, session: &mut Session, signal: ControlSignal) -> Result<(), AppError> {
        session.apply_control(signal)?;
        Ok(())
    }

    /// Run game logic after the physics step
    ///
    /// # Arguments
    /// * `session` - World, scene and tracked bodies
    /// * `contacts` - Contacts that began during this frame's step
    /// * `delta_time` - Simulated time covered by this frame in seconds
    fn update(&mut self, session: &mut Session, contacts: &[Contact], delta_time: f32) -> Result<(), AppError>;

    /// Handle application events
    ///
    /// Called for every event after the loop has handled its own keys.
    fn handle_event(&mut self, _session: &mut Session, _event: &AppEvent) -> Result<(), AppError> {
        Ok(())
    }

    /// One-line status shown by the presenter
    fn status(&self) -> Option<String> {
        None
    }

    /// Cleanup the application
    ///
    /// Called when the loop stops.
    fn cleanup(&mut self, session: &mut Session);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Physics error propagated to application level
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}

/// Application events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Key was pressed
    KeyPressed(KeyCode),

    /// Window close or quit requested
    CloseRequested,
}
