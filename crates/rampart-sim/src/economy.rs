//! Gold ledger used for building, upgrades and kill rewards.

use log::debug;

/// Economy collaborator. Spending never goes below zero.
pub trait EconomyLedger {
    fn balance(&self) -> u32;

    /// Deduct `amount` if affordable. On `false` nothing changed.
    fn spend(&mut self, amount: u32) -> bool;

    fn reward(&mut self, amount: u32);

    /// Restore the opening balance for a new session.
    fn reset(&mut self, balance: u32);
}

/// In-memory gold balance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Treasury {
    gold: u32,
}

impl Treasury {
    pub fn new(gold: u32) -> Self {
        Self { gold }
    }
}

impl EconomyLedger for Treasury {
    fn balance(&self) -> u32 {
        self.gold
    }

    fn spend(&mut self, amount: u32) -> bool {
        if amount > self.gold {
            debug!("spend of {} refused, balance {}", amount, self.gold);
            return false;
        }
        self.gold -= amount;
        true
    }

    fn reward(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    fn reset(&mut self, balance: u32) {
        self.gold = balance;
    }
}
