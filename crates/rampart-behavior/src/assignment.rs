//! Weighted behavior assignment over a spawned batch.

use rand::seq::SliceRandom;
use rand::Rng;

use rampart_core::enums::BehaviorKind;

/// Number of agents of each behavior, in [`BehaviorKind::ALL`] order.
///
/// Weights are normalized to sum to one. Steady, Surge and Weave each get
/// `round(count * weight)`, clamped to what is left of the batch; every
/// remaining slot goes to Juggernaut.
pub fn quotas(count: u32, weights: [f64; 4]) -> [u32; 4] {
    let total: f64 = weights.iter().sum();
    let mut quotas = [0u32; 4];
    let mut left = count;

    if total > 0.0 {
        for (quota, weight) in quotas.iter_mut().zip(weights.iter()).take(3) {
            let share = (count as f64 * weight / total).round_ties_even().max(0.0) as u32;
            *quota = share.min(left);
            left -= *quota;
        }
    }
    quotas[3] = left;
    quotas
}

/// Shuffled behavior list for a batch of `count` agents.
pub fn plan<R: Rng + ?Sized>(count: u32, weights: [f64; 4], rng: &mut R) -> Vec<BehaviorKind> {
    let quotas = quotas(count, weights);
    let mut kinds = Vec::with_capacity(count as usize);
    for (kind, quota) in BehaviorKind::ALL.iter().zip(quotas.iter()) {
        kinds.extend(std::iter::repeat(*kind).take(*quota as usize));
    }
    kinds.shuffle(rng);
    kinds
}

/// Tally a list of behaviors, in [`BehaviorKind::ALL`] order.
pub fn tally(kinds: &[BehaviorKind]) -> [u32; 4] {
    let mut counts = [0u32; 4];
    for kind in kinds {
        counts[kind.index()] += 1;
    }
    counts
}
