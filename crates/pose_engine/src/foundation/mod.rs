//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and transforms
//! - Handle-based collections
//! - Frame timing, fixed-interval timers and frame pacing
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
