//! # Multi-cycle clearance accounting for the primary lane.
//!
//! Given one intersection's desired green time per lane, how long until the
//! primary lane has received *all* of its green time? No single phase may
//! exceed the cap, and every time the primary lane exhausts a capped phase
//! without finishing, each other lane gets one phase (plus the yellow buffer)
//! before the primary lane's next turn.
//!
//! ## Termination
//! The outer loop decrements `remaining` by `cap` on every iteration,
//! independent of any other lane's state. That is the sole progress
//! guarantee: with zero other lanes the loop still terminates, which the
//! tests cover explicitly (an accounting tied to lane iteration instead
//! would spin forever on that input).

use crate::route::demand::LaneDemand;

/// Phase-cap accounting rules for batch clearance estimates.
///
/// Defaults mirror the live timing constants: 60 s cap, 5 s buffer, 5 s
/// minimum green.
#[derive(Clone, Copy, Debug)]
pub struct CycleRules {
    /// Longest green any single phase may hold, in seconds.
    pub cap: u64,
    /// Fixed buffer following each phase, in seconds.
    pub buffer: u64,
    /// Floor granted to an exhausted lane so every lane keeps a turn.
    pub min_green: u64,
}

impl Default for CycleRules {
    fn default() -> Self {
        Self {
            cap: 60,
            buffer: 5,
            min_green: 5,
        }
    }
}

impl CycleRules {
    /// Total seconds until the primary lane's demand is fully served.
    ///
    /// Demand at or under the cap is served in one uncapped phase: the result
    /// is exactly the demand, with no trailing buffer.
    pub fn clearance_time(&self, demand: &LaneDemand) -> u64 {
        let mut remaining = demand.primary();
        let mut others: Vec<(&str, u64)> = demand.others().collect();
        let mut total = 0u64;

        while remaining > self.cap {
            total += self.cap + self.buffer;
            remaining -= self.cap;

            for (_, left) in others.iter_mut() {
                let mut grant = (*left).min(self.cap);
                if grant == 0 {
                    grant = self.min_green;
                }
                total += grant + self.buffer;
                *left = left.saturating_sub(grant);
            }
        }

        // Final short phase for the primary lane: no trailing buffer.
        total + remaining
    }
}
