//! Simulation engine for RAMPART.
//!
//! Owns the hecs ECS world, runs the wave director and the per-tick systems,
//! and produces `SimSnapshot`s for observers.

pub mod combat;
pub mod components;
pub mod core_health;
pub mod director;
pub mod economy;
pub mod effects;
pub mod elemental;
pub mod engine;
pub mod event_bus;
pub mod placement;
pub mod scenario;
pub mod systems;
pub mod targeting;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use rampart_core as core;

#[cfg(test)]
mod tests;
