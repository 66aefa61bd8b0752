use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::ROUND_HISTORY_CAPACITY;

/// A round in flight.
///
/// Created when a wager is accepted and dropped once the round resolves.
/// While the round is live, `current_multiplier <= crash_point` holds;
/// the tick that would breach it resolves the round instead.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Stake in cents, already debited from the account.
    pub wager: u64,
    /// Hidden resolution point for this round.
    pub crash_point: f64,
    /// Multiplier computed by the most recent tick.
    pub current_multiplier: f64,
    /// Host timestamp at which the round started, in milliseconds.
    pub started_at_ms: u64,
}

impl Round {
    pub fn new(wager: u64, crash_point: f64, started_at_ms: u64) -> Self {
        Self {
            wager,
            crash_point,
            current_multiplier: 1.0,
            started_at_ms,
        }
    }

    /// The multiplier this round shows at `now_ms` under `growth_rate`.
    ///
    /// Pure in `(started_at_ms, now_ms, growth_rate)`: linear growth,
    /// unclamped. Timestamps before the start count as zero elapsed time.
    pub fn multiplier_at(&self, now_ms: u64, growth_rate: f64) -> f64 {
        let elapsed_ms = now_ms.saturating_sub(self.started_at_ms);
        1.0 + (elapsed_ms as f64 / 1_000.0) * growth_rate
    }

    /// Milliseconds from start until this round crashes naturally.
    ///
    /// Linear growth keeps this invertible: `(crash - 1.0) / rate`.
    pub fn ms_to_crash(&self, growth_rate: f64) -> u64 {
        (((self.crash_point - 1.0) / growth_rate) * 1_000.0).ceil() as u64
    }
}

/// How a resolved round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// The multiplier reached the crash point; the wager was lost.
    Crashed,
    /// The player cashed out before the crash.
    CashedOut,
}

/// A resolved round as recorded in history.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// The multiplier at resolution: the cash-out value, or the crash
    /// point if the round crashed.
    pub multiplier: f64,
    pub resolution: Resolution,
}

/// Bounded record of recent round outcomes, most recent first.
///
/// Display-only: holds the last `ROUND_HISTORY_CAPACITY` resolutions and
/// evicts the oldest beyond that.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundHistory {
    entries: VecDeque<RoundOutcome>,
}

impl RoundHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome, evicting the oldest entry if at capacity.
    pub fn push(&mut self, outcome: RoundOutcome) {
        self.entries.push_front(outcome);
        self.entries.truncate(ROUND_HISTORY_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outcomes in recency order (most recent first).
    pub fn iter(&self) -> impl Iterator<Item = &RoundOutcome> {
        self.entries.iter()
    }

    /// The most recently resolved outcome.
    pub fn latest(&self) -> Option<&RoundOutcome> {
        self.entries.front()
    }
}
