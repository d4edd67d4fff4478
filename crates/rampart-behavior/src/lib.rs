//! Hostile agent movement for RAMPART.
//!
//! Implements the movement behavior state machines, path following,
//! batch behavior assignment and the stat profiles that go with each
//! behavior. No ECS dependency; operates on plain data.

pub mod assignment;
pub mod movement;
pub mod path;
pub mod profiles;

pub use rampart_core as core;
