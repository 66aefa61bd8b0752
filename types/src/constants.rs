//! Tuning constants shared by the engine and its hosts.

/// Lowest crash point the outcome generator may produce.
pub const MIN_CRASH_POINT: f64 = 1.01;

/// Highest crash point the outcome generator may produce.
pub const MAX_CRASH_POINT: f64 = 100.0;

/// Lowest settable multiplier growth rate (per second).
pub const MIN_GROWTH_RATE: f64 = 0.1;

/// Highest settable multiplier growth rate (per second).
pub const MAX_GROWTH_RATE: f64 = 2.0;

/// Default multiplier growth rate (per second).
pub const DEFAULT_GROWTH_RATE: f64 = 0.5;

/// Resolved rounds retained for display, most recent first.
pub const ROUND_HISTORY_CAPACITY: usize = 10;

/// Starting balance for a fresh session, in cents ($100.00).
pub const STARTING_BALANCE_CENTS: u64 = 10_000;

/// Low-tier crash points (`1.01..=1.50`) are drawn with this probability.
pub const LOW_TIER_PROBABILITY: f64 = 0.20;

/// Mid-tier crash points (`1.51..=10.00`) are drawn with this probability.
pub const MID_TIER_PROBABILITY: f64 = 0.60;

/// Upper bound of the low crash-point tier.
pub const LOW_TIER_MAX: f64 = 1.50;

/// Lower bound of the mid crash-point tier.
pub const MID_TIER_MIN: f64 = 1.51;

/// Upper bound of the mid crash-point tier.
pub const MID_TIER_MAX: f64 = 10.0;

/// Lower bound of the high crash-point tier.
pub const HIGH_TIER_MIN: f64 = 10.01;

/// Maximum attempts against the inference provider before surfacing the error.
pub const MAX_PROVIDER_ATTEMPTS: u32 = 5;
