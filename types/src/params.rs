use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_GROWTH_RATE, MAX_CRASH_POINT, MAX_GROWTH_RATE, MIN_CRASH_POINT, MIN_GROWTH_RATE,
};

/// Operator-tunable round parameters.
///
/// `next_crash_point` is consumed by the round that starts next; overriding
/// it while a round is in flight only affects rounds not yet started.
/// `growth_rate` is read live on every tick, so changing it bends the
/// in-flight round's multiplier curve immediately.
///
/// Both setters clamp out-of-range values into their legal interval rather
/// than rejecting them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundParameters {
    next_crash_point: Option<f64>,
    growth_rate: f64,
}

impl RoundParameters {
    pub fn new() -> Self {
        Self {
            next_crash_point: None,
            growth_rate: DEFAULT_GROWTH_RATE,
        }
    }

    /// The crash point queued for the next round, if one has been staged.
    pub fn next_crash_point(&self) -> Option<f64> {
        self.next_crash_point
    }

    /// Consume the staged crash point, leaving `None` behind.
    pub fn take_next_crash_point(&mut self) -> Option<f64> {
        self.next_crash_point.take()
    }

    /// Stage the crash point for the next round, clamped to
    /// `[MIN_CRASH_POINT, MAX_CRASH_POINT]`.
    pub fn set_next_crash_point(&mut self, value: f64) {
        self.next_crash_point = Some(value.clamp(MIN_CRASH_POINT, MAX_CRASH_POINT));
    }

    /// Multiplier growth per elapsed second.
    pub fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    /// Set the growth rate, clamped to `[MIN_GROWTH_RATE, MAX_GROWTH_RATE]`.
    pub fn set_growth_rate(&mut self, value: f64) {
        self.growth_rate = value.clamp(MIN_GROWTH_RATE, MAX_GROWTH_RATE);
    }
}

impl Default for RoundParameters {
    fn default() -> Self {
        Self::new()
    }
}
