//! Player commands sent to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::{ElementType, TargetStrategyKind};
use crate::types::{DefenderId, Position};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Leave preparation and start the next wave.
    StartRound,
    /// Build a defender, optionally with an element staged on it.
    PlaceDefender {
        template_id: String,
        position: Position,
        element: Option<ElementType>,
    },
    /// Attach an element at tier 1 (paid).
    ApplyElement {
        defender: DefenderId,
        element: ElementType,
    },
    /// Raise an element to the given tier (paid).
    PurchaseUpgrade {
        defender: DefenderId,
        element: ElementType,
        level: u8,
    },
    /// Strip the element and restore base stats.
    RemoveElement { defender: DefenderId },
    SetTargetStrategy {
        defender: DefenderId,
        strategy: TargetStrategyKind,
    },
    /// Restore core health, gold, the world and the wave director.
    ResetSession,
}
