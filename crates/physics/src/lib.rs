//! Geometry primitives and intersection tests for hit detection and collision.
//!
//! Only axis-aligned boxes and spheres are supported; there is no rigid-body
//! simulation and no swept collision.

pub mod collision;
pub mod raycast;

pub use collision::*;
pub use raycast::*;
