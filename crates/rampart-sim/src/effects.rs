//! Timed status effects carried by agents.
//!
//! Each agent holds at most one entry per kind. Reapplying an effect restarts
//! its window instead of stacking.

use rampart_core::constants::{BURN_TICK_INTERVAL, TIMER_EPSILON};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burn {
    /// Damage per burn tick.
    pub potency: f64,
    pub started_at: f64,
    pub duration: f64,
    pub next_tick_at: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slow {
    /// Multiplier on base speed while active.
    pub factor: f64,
    pub started_at: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stun {
    pub started_at: f64,
    pub duration: f64,
}

/// Per-agent effect registry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActiveEffects {
    pub burn: Option<Burn>,
    pub slow: Option<Slow>,
    pub stun: Option<Stun>,
}

impl Burn {
    pub fn ends_at(&self) -> f64 {
        self.started_at + self.duration
    }
}

impl Slow {
    pub fn ends_at(&self) -> f64 {
        self.started_at + self.duration
    }
}

impl Stun {
    pub fn ends_at(&self) -> f64 {
        self.started_at + self.duration
    }
}

impl ActiveEffects {
    /// Damage `potency` every second for `duration`. A running burn restarts
    /// and keeps the stronger potency.
    pub fn apply_burn(&mut self, potency: f64, duration: f64, now: f64) {
        if !(duration > 0.0) || !(potency > 0.0) {
            return;
        }
        let potency = self.burn.map_or(potency, |b| b.potency.max(potency));
        self.burn = Some(Burn {
            potency,
            started_at: now,
            duration,
            next_tick_at: now + BURN_TICK_INTERVAL,
        });
    }

    /// Scale speed by `1 - potency` for `duration`.
    pub fn apply_slow(&mut self, potency: f64, duration: f64, now: f64) {
        if !(duration > 0.0) {
            return;
        }
        self.slow = Some(Slow {
            factor: (1.0 - potency).clamp(0.0, 1.0),
            started_at: now,
            duration,
        });
    }

    /// Suspend movement for `duration`.
    pub fn apply_stun(&mut self, duration: f64, now: f64) {
        if !(duration > 0.0) {
            return;
        }
        self.stun = Some(Stun {
            started_at: now,
            duration,
        });
    }

    pub fn is_stunned(&self, now: f64) -> bool {
        self.stun.is_some_and(|s| now + TIMER_EPSILON < s.ends_at())
    }

    pub fn is_slowed(&self, now: f64) -> bool {
        self.slow.is_some_and(|s| now + TIMER_EPSILON < s.ends_at())
    }

    pub fn is_burning(&self, now: f64) -> bool {
        self.burn.is_some_and(|b| now + TIMER_EPSILON < b.ends_at())
    }

    /// Multiplier to apply to base speed at `now`.
    pub fn speed_factor(&self, now: f64) -> f64 {
        match self.slow {
            Some(slow) if now + TIMER_EPSILON < slow.ends_at() => slow.factor,
            _ => 1.0,
        }
    }

    /// Number of burn ticks due up to `now`. Advances the burn's tick clock.
    /// Each tick deals the burn's potency as a separate hit.
    pub fn take_burn_ticks(&mut self, now: f64) -> u32 {
        let Some(burn) = self.burn.as_mut() else {
            return 0;
        };
        let mut ticks = 0;
        while burn.next_tick_at <= now + TIMER_EPSILON
            && burn.next_tick_at <= burn.ends_at() + TIMER_EPSILON
        {
            ticks += 1;
            burn.next_tick_at += BURN_TICK_INTERVAL;
        }
        ticks
    }

    /// Drop every entry whose window has closed by `now`.
    pub fn expire(&mut self, now: f64) {
        if self.burn.is_some_and(|b| b.ends_at() <= now + TIMER_EPSILON) {
            self.burn = None;
        }
        if self.slow.is_some_and(|s| s.ends_at() <= now + TIMER_EPSILON) {
            self.slow = None;
        }
        if self.stun.is_some_and(|s| s.ends_at() <= now + TIMER_EPSILON) {
            self.stun = None;
        }
    }
}
