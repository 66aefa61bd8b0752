//! Common types for the aviator crash-game core.
//!
//! Defines account/round/parameter state and constants used by the engine
//! and its hosts. Money is carried in integer cents; multipliers and crash
//! points are `f64` displayed to two decimal places.

mod account;
mod constants;
mod params;
mod round;

pub use account::{format_cents, Account, LedgerError};
pub use constants::*;
pub use params::RoundParameters;
pub use round::{Resolution, Round, RoundHistory, RoundOutcome};
