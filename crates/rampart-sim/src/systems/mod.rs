//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They do not own state. All state lives in components and services.

pub mod cleanup;
pub mod effects;
pub mod fire_control;
pub mod movement;
pub mod snapshot;
