//! The protected objective.

use log::info;

/// Outcome of a hit on the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreDamage {
    pub current: u32,
    /// True only for the hit that took the core to zero.
    pub depleted_now: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreHealth {
    current: u32,
    max: u32,
    depletion_reported: bool,
}

impl CoreHealth {
    pub fn new(max: u32) -> Self {
        Self {
            current: max,
            max,
            depletion_reported: false,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Subtract `amount`, saturating at zero.
    pub fn apply_damage(&mut self, amount: u32) -> CoreDamage {
        self.current = self.current.saturating_sub(amount);
        let depleted_now = self.current == 0 && !self.depletion_reported;
        if depleted_now {
            self.depletion_reported = true;
            info!("core destroyed");
        }
        CoreDamage {
            current: self.current,
            depleted_now,
        }
    }

    pub fn reset(&mut self) {
        self.current = self.max;
        self.depletion_reported = false;
    }
}
