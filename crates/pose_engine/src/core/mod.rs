//! Core engine modules
//!
//! This module contains the session-wide configuration consumed by every
//! subsystem of the frame loop.

pub mod config;

pub use config::{
    ControlConfig, DetectionConfig, MultiPoseConfig, OutputConfig, PhysicsConfig,
    PresentationConfig, SessionConfig, SinglePoseConfig, VideoConfig,
};
