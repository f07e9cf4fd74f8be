//! Core engine types and utilities for the shooting range.
//!
//! This crate provides the foundational types used across all simulation systems:
//! - Game time and fixed-step scheduling
//! - Camera transform and orientation
//! - Time-keyed lifetime component and decay helpers

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
