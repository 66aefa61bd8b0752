//! Crash-point generation.
//!
//! Crash points come from a three-tier mixture biased toward low
//! multipliers (the house edge of the simulation):
//!
//! - 20%: uniform in `[1.01, 1.50]`
//! - 60%: uniform in `[1.51, 10.00]`
//! - 20%: uniform in `[10.01, 100.00]`

use aviator_types::{
    HIGH_TIER_MIN, LOW_TIER_MAX, LOW_TIER_PROBABILITY, MAX_CRASH_POINT, MID_TIER_MAX, MID_TIER_MIN,
    MID_TIER_PROBABILITY, MIN_CRASH_POINT,
};
use rand::Rng;

/// Draw a crash point from the tiered distribution.
///
/// Pure with respect to the supplied random source; the result always lies
/// in `[MIN_CRASH_POINT, MAX_CRASH_POINT]`.
pub fn generate_crash_point(rng: &mut impl Rng) -> f64 {
    let tier: f64 = rng.gen();
    if tier < LOW_TIER_PROBABILITY {
        rng.gen_range(MIN_CRASH_POINT..=LOW_TIER_MAX)
    } else if tier < LOW_TIER_PROBABILITY + MID_TIER_PROBABILITY {
        rng.gen_range(MID_TIER_MIN..=MID_TIER_MAX)
    } else {
        rng.gen_range(HIGH_TIER_MIN..=MAX_CRASH_POINT)
    }
}
