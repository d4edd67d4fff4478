//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

/// World-space position in simulation units. `y` is up.
pub type Position = glam::DVec3;

/// Facing of an entity. The identity orientation looks down +Z.
pub type Orientation = glam::DQuat;

/// Identifier of a hostile agent. Assigned in spawn order, so comparing two
/// ids tells which agent spawned first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AgentId(pub u32);

/// Identifier of a placed defender.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DefenderId(pub u32);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
