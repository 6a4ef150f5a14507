//! Tick counters backing the attack schedulers.
//!
//! A [`CycleTimer`] counts ticks up to a period and wraps to zero; the zero
//! tick is the "fire" tick. Periods are passed on every call so health-derived
//! cadences can change from one tick to the next without latching.

use serde::{Deserialize, Serialize};

use crate::actor::Health;

/// Elapsed-tick counter for one scheduler.
///
/// # Examples
///
/// ```
/// use talon::schedule::CycleTimer;
/// let mut timer = CycleTimer::default();
/// let fired: Vec<bool> = (0..4).map(|_| timer.advance(1)).collect();
/// assert_eq!(fired, vec![false, true, false, true]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTimer {
    elapsed: u32,
}

impl CycleTimer {
    /// Increments the counter, wrapping to zero once it exceeds `period`.
    ///
    /// Returns `true` on the wrap tick. The counter never exceeds `period`
    /// after the call returns.
    pub fn advance(&mut self, period: u32) -> bool {
        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed > period {
            self.elapsed = 0;
        }
        self.elapsed == 0
    }

    /// Fires at the start of each cycle: checks for the zero tick, then counts.
    ///
    /// A fresh timer fires on its first call. Used by schedulers that should
    /// act as soon as their phase begins.
    pub fn advance_leading(&mut self, period: u32) -> bool {
        if self.elapsed > period {
            self.elapsed = 0;
        }
        let fire = self.elapsed == 0;
        self.elapsed = self.elapsed.saturating_add(1);
        fire
    }

    /// Ticks counted in the current cycle.
    #[must_use]
    pub const fn elapsed(&self) -> u32 {
        self.elapsed
    }
}

/// Progress of a heal-to-full spread over a fixed number of ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenBudget {
    spent: u32,
}

impl RegenBudget {
    /// Applies one tick of healing worth `max / budget`.
    ///
    /// Stops exactly at maximum health and marks the budget spent once full,
    /// so later calls neither heal nor advance the counter. Returns the amount
    /// healed this tick, or `None` once the budget is exhausted.
    pub fn apply(&mut self, health: &mut Health, budget: u32) -> Option<u32> {
        if budget == 0 || self.spent >= budget {
            return None;
        }
        self.spent += 1;
        let per_tick = health.max() / budget;
        let before = health.current();
        if before.saturating_add(per_tick) <= health.max() {
            health.set(before + per_tick);
        } else {
            health.set(health.max());
            self.spent = budget;
        }
        Some(health.current() - before)
    }

    /// Ticks of the budget already used.
    #[must_use]
    pub const fn spent(&self) -> u32 {
        self.spent
    }

    /// Whether no healing remains in the budget.
    #[must_use]
    pub const fn is_exhausted(&self, budget: u32) -> bool {
        self.spent >= budget
    }

    /// Makes the full budget available again.
    pub fn reset(&mut self) {
        self.spent = 0;
    }
}
