//! # Dodge
//!
//! Keep the box away from the falling balls by moving your wrists in front
//! of the camera. The score climbs every spawn; the first ball that touches
//! the box ends the round, and the reset key starts a new one.

#![warn(missing_docs)]

pub mod config;
pub mod cues;
pub mod game;
pub mod state;

pub use config::DodgeConfig;
pub use cues::{select_cue, Cue, ScoreTier};
pub use game::DodgeGame;
pub use state::{GameInput, GameState};
