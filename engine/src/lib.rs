//! Deterministic execution core for the aviator crash game.
//!
//! The engine is a synchronous state machine with no I/O and no clock of
//! its own: hosts supply millisecond timestamps to `tick` and a random
//! source to `place_wager`, which makes every round fully reproducible
//! under a seeded RNG.

pub mod outcome;
pub mod session;

pub use outcome::generate_crash_point;
pub use session::{CashOut, GameError, GameSession, TickResult};
