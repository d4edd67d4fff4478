//! Target selection strategies.
//!
//! Selection is a pure function over the in-range candidates. Ties are
//! broken by spawn order, which is `AgentId` order.

use rampart_core::enums::TargetStrategyKind;
use rampart_core::types::{AgentId, Position};

/// What a defender knows about a live agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetCandidate {
    pub id: AgentId,
    pub position: Position,
    pub health: i32,
}

pub trait TargetSelector {
    fn select(&self, origin: Position, candidates: &[TargetCandidate]) -> Option<AgentId>;
}

/// Minimum distance to the defender.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nearest;

/// Minimum current health.
#[derive(Debug, Clone, Copy, Default)]
pub struct Weakest;

impl TargetSelector for Nearest {
    fn select(&self, origin: Position, candidates: &[TargetCandidate]) -> Option<AgentId> {
        candidates
            .iter()
            .min_by(|a, b| {
                origin
                    .distance(a.position)
                    .total_cmp(&origin.distance(b.position))
                    .then(a.id.cmp(&b.id))
            })
            .map(|c| c.id)
    }
}

impl TargetSelector for Weakest {
    fn select(&self, _origin: Position, candidates: &[TargetCandidate]) -> Option<AgentId> {
        candidates
            .iter()
            .min_by(|a, b| a.health.cmp(&b.health).then(a.id.cmp(&b.id)))
            .map(|c| c.id)
    }
}

/// Selector for a strategy kind.
pub fn selector(kind: TargetStrategyKind) -> &'static dyn TargetSelector {
    match kind {
        TargetStrategyKind::Nearest => &Nearest,
        TargetStrategyKind::Weakest => &Weakest,
    }
}

/// Candidates within `range` of `origin`, boundary included.
pub fn in_range(
    origin: Position,
    range: f64,
    candidates: &[TargetCandidate],
) -> Vec<TargetCandidate> {
    candidates
        .iter()
        .filter(|c| origin.distance(c.position) <= range)
        .copied()
        .collect()
}
