//! The round state machine.
//!
//! A `GameSession` bundles one account, the operator parameters, the round
//! slot, and the outcome history. Every command takes `&mut GameSession`;
//! there are no ambient globals and no internal scheduling. The host polls
//! `tick(now_ms)` at whatever cadence it likes: the multiplier is a pure
//! function of `(started_at_ms, now_ms, growth_rate)`, so polling twice at
//! the same timestamp computes the same value.
//!
//! Resolution is the race between the player's `cash_out` command and the
//! tick that reaches the crash point; whichever lands first settles the
//! round, and the loser of the race is rejected (`NotRunning`), never
//! silently ignored.

use aviator_types::{
    Account, LedgerError, Resolution, Round, RoundHistory, RoundOutcome, RoundParameters,
    STARTING_BALANCE_CENTS,
};
use rand::Rng;
use thiserror::Error as ThisError;
use tracing::{debug, info};

use crate::outcome::generate_crash_point;

/// A declined command. Every variant leaves the session unchanged.
#[derive(Debug, ThisError, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("a round is already running")]
    AlreadyRunning,
    #[error("no round is running")]
    NotRunning,
    #[error("invalid amount")]
    InvalidAmount,
    #[error("insufficient funds (requested={requested}, balance={balance})")]
    InsufficientFunds { requested: u64, balance: u64 },
}

impl From<LedgerError> for GameError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount => GameError::InvalidAmount,
            LedgerError::InsufficientFunds { requested, balance } => {
                GameError::InsufficientFunds { requested, balance }
            }
        }
    }
}

/// What a poll observed.
///
/// `Crashed` is reported exactly once, by the tick that resolves the
/// round; later polls see `Idle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickResult {
    /// No round is running.
    Idle,
    /// The round is live at the given multiplier (strictly below the
    /// crash point).
    Running { multiplier: f64 },
    /// This tick reached the crash point; the wager is lost and the
    /// round slot is idle again.
    Crashed { crash_point: f64 },
}

/// A settled cash-out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CashOut {
    /// Multiplier the payout was computed at.
    pub multiplier: f64,
    /// Amount credited, in cents.
    pub payout: u64,
}

/// One player's complete game state, owned by the caller.
#[derive(Clone, Debug)]
pub struct GameSession {
    account: Account,
    params: RoundParameters,
    round: Option<Round>,
    history: RoundHistory,
}

impl GameSession {
    pub fn new(starting_balance: u64) -> Self {
        Self {
            account: Account::new(starting_balance),
            params: RoundParameters::new(),
            round: None,
            history: RoundHistory::new(),
        }
    }

    /// Balance in cents.
    pub fn balance(&self) -> u64 {
        self.account.balance()
    }

    /// Whether a round is currently running.
    pub fn is_running(&self) -> bool {
        self.round.is_some()
    }

    /// The running round, if any.
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// The multiplier computed by the most recent tick, if a round is live.
    pub fn current_multiplier(&self) -> Option<f64> {
        self.round.map(|r| r.current_multiplier)
    }

    /// Recent outcomes, most recent first.
    pub fn history(&self) -> &RoundHistory {
        &self.history
    }

    /// Operator parameters (read side).
    pub fn params(&self) -> &RoundParameters {
        &self.params
    }

    /// Operator hook: stage the crash point for the next round. Clamped to
    /// the legal range; never affects a round already in flight.
    pub fn set_next_crash_point(&mut self, value: f64) {
        self.params.set_next_crash_point(value);
    }

    /// Operator hook: set the growth rate. Clamped to the legal range;
    /// takes effect on the very next tick, in-flight rounds included.
    pub fn set_growth_rate(&mut self, value: f64) {
        self.params.set_growth_rate(value);
    }

    /// Wallet deposit, routed through the ledger's credit path.
    pub fn deposit(&mut self, amount: u64) -> Result<(), GameError> {
        if amount == 0 {
            return Err(GameError::InvalidAmount);
        }
        self.account.credit(amount)?;
        Ok(())
    }

    /// Wallet withdrawal, routed through the ledger's debit path.
    pub fn withdraw(&mut self, amount: u64) -> Result<(), GameError> {
        self.account.debit(amount)?;
        Ok(())
    }

    /// Place the round's single wager and start it.
    ///
    /// The debit and the round creation are one atomic step: if the debit
    /// is declined, no round exists and the balance is untouched. On
    /// success the staged crash point is consumed (or generated when none
    /// was staged) and the *following* round's crash point is generated
    /// and staged immediately, so an operator can always inspect and
    /// override the upcoming value before it is used.
    pub fn place_wager(
        &mut self,
        amount: u64,
        now_ms: u64,
        rng: &mut impl Rng,
    ) -> Result<(), GameError> {
        if self.round.is_some() {
            return Err(GameError::AlreadyRunning);
        }
        self.account.debit(amount)?;

        let crash_point = self
            .params
            .take_next_crash_point()
            .unwrap_or_else(|| generate_crash_point(rng));
        self.round = Some(Round::new(amount, crash_point, now_ms));
        self.params.set_next_crash_point(generate_crash_point(rng));

        info!(wager = amount, started_at_ms = now_ms, "round started");
        Ok(())
    }

    /// Advance the round to `now_ms`.
    ///
    /// Recomputes `multiplier = 1.00 + elapsed_secs * growth_rate` from
    /// scratch; the stored multiplier is only a snapshot for display and
    /// cash-out. A tick that meets the crash point clamps the multiplier
    /// to it, records the loss, and frees the round slot.
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        let Some(round) = self.round.as_mut() else {
            return TickResult::Idle;
        };

        let multiplier = round.multiplier_at(now_ms, self.params.growth_rate());
        if multiplier >= round.crash_point {
            let crash_point = round.crash_point;
            round.current_multiplier = crash_point;
            info!(crash_point, wager = round.wager, "round crashed");
            self.history.push(RoundOutcome {
                multiplier: crash_point,
                resolution: Resolution::Crashed,
            });
            self.round = None;
            return TickResult::Crashed { crash_point };
        }

        round.current_multiplier = multiplier;
        debug!(multiplier, "tick");
        TickResult::Running { multiplier }
    }

    /// Cash out at the multiplier of the most recent tick.
    ///
    /// Payout is `wager × multiplier` at full precision, rounded to cents
    /// only at the credit boundary. Rejected with `NotRunning` once the
    /// round has crashed; an accepted cash-out frees the round slot, so a
    /// later tick cannot pay anything further.
    pub fn cash_out(&mut self) -> Result<CashOut, GameError> {
        let round = self.round.ok_or(GameError::NotRunning)?;

        let multiplier = round.current_multiplier;
        let payout = (round.wager as f64 * multiplier).round() as u64;
        self.account.credit(payout)?;
        self.history.push(RoundOutcome {
            multiplier,
            resolution: Resolution::CashedOut,
        });
        self.round = None;

        info!(multiplier, payout, "cashed out");
        Ok(CashOut { multiplier, payout })
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(STARTING_BALANCE_CENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(99)
    }

    /// Session with a known crash point staged, starting balance $100.00.
    fn staged_session(crash_point: f64) -> GameSession {
        let mut session = GameSession::new(10_000);
        session.set_next_crash_point(crash_point);
        session
    }

    #[test]
    fn test_place_wager_debits_exactly() {
        let mut session = staged_session(2.0);
        session
            .place_wager(1_000, 0, &mut test_rng())
            .expect("wager accepted");
        assert_eq!(session.balance(), 9_000);
        assert!(session.is_running());
    }

    #[test]
    fn test_place_wager_rejects_zero() {
        let mut session = staged_session(2.0);
        let result = session.place_wager(0, 0, &mut test_rng());
        assert_eq!(result, Err(GameError::InvalidAmount));
        assert_eq!(session.balance(), 10_000);
        assert!(!session.is_running());
    }

    #[test]
    fn test_place_wager_rejects_overdraft() {
        let mut session = staged_session(2.0);
        let result = session.place_wager(10_001, 0, &mut test_rng());
        assert_eq!(
            result,
            Err(GameError::InsufficientFunds {
                requested: 10_001,
                balance: 10_000,
            })
        );
        assert_eq!(session.balance(), 10_000);
        assert!(!session.is_running());
    }

    #[test]
    fn test_place_wager_rejects_second_round() {
        let mut session = staged_session(2.0);
        session
            .place_wager(1_000, 0, &mut test_rng())
            .expect("first wager");
        let result = session.place_wager(1_000, 10, &mut test_rng());
        assert_eq!(result, Err(GameError::AlreadyRunning));
        // The declined wager must not have been debited.
        assert_eq!(session.balance(), 9_000);
    }

    #[test]
    fn test_staged_crash_point_is_consumed_and_repipelined() {
        let mut session = staged_session(3.5);
        session
            .place_wager(1_000, 0, &mut test_rng())
            .expect("wager accepted");
        let round = session.round().expect("running round");
        assert_eq!(round.crash_point, 3.5);
        // A fresh crash point was staged for the following round.
        assert!(session.params().next_crash_point().is_some());
    }

    #[test]
    fn test_tick_is_idempotent_at_fixed_timestamp() {
        let mut session = staged_session(5.0);
        session
            .place_wager(1_000, 0, &mut test_rng())
            .expect("wager accepted");
        let first = session.tick(2_000);
        let second = session.tick(2_000);
        assert_eq!(first, second);
        assert_eq!(first, TickResult::Running { multiplier: 2.0 });
    }

    #[test]
    fn test_tick_clamps_to_crash_point() {
        let mut session = staged_session(2.0);
        session
            .place_wager(1_000, 0, &mut test_rng())
            .expect("wager accepted");
        // Well past the crash instant; the reported value is the crash
        // point, not the unclamped multiplier.
        let result = session.tick(60_000);
        assert_eq!(result, TickResult::Crashed { crash_point: 2.0 });
        assert!(!session.is_running());
        assert_eq!(session.balance(), 9_000);
    }

    #[test]
    fn test_cash_out_when_idle_is_rejected() {
        let mut session = staged_session(2.0);
        assert_eq!(session.cash_out(), Err(GameError::NotRunning));
    }

    #[test]
    fn test_cash_out_after_crash_is_rejected() {
        let mut session = staged_session(2.0);
        session
            .place_wager(1_000, 0, &mut test_rng())
            .expect("wager accepted");
        assert_eq!(session.tick(2_000), TickResult::Crashed { crash_point: 2.0 });
        assert_eq!(session.cash_out(), Err(GameError::NotRunning));
        assert_eq!(session.balance(), 9_000);
    }

    #[test]
    fn test_tick_after_cash_out_pays_nothing() {
        let mut session = staged_session(2.0);
        session
            .place_wager(1_000, 0, &mut test_rng())
            .expect("wager accepted");
        session.tick(1_000);
        let cash_out = session.cash_out().expect("cash-out accepted");
        assert_eq!(cash_out.multiplier, 1.5);
        let balance = session.balance();
        assert_eq!(session.tick(1_000), TickResult::Idle);
        assert_eq!(session.tick(60_000), TickResult::Idle);
        assert_eq!(session.balance(), balance);
    }

    #[test]
    fn test_cash_out_before_first_tick_returns_stake() {
        let mut session = staged_session(2.0);
        session
            .place_wager(1_000, 0, &mut test_rng())
            .expect("wager accepted");
        let cash_out = session.cash_out().expect("cash-out accepted");
        assert_eq!(cash_out.multiplier, 1.0);
        assert_eq!(cash_out.payout, 1_000);
        assert_eq!(session.balance(), 10_000);
    }

    #[test]
    fn test_growth_rate_change_bends_inflight_round() {
        let mut session = staged_session(50.0);
        session
            .place_wager(1_000, 0, &mut test_rng())
            .expect("wager accepted");
        assert_eq!(session.tick(2_000), TickResult::Running { multiplier: 2.0 });
        session.set_growth_rate(2.0);
        assert_eq!(session.tick(2_000), TickResult::Running { multiplier: 5.0 });
    }

    #[test]
    fn test_deposit_and_withdraw_use_ledger_rules() {
        let mut session = GameSession::new(0);
        assert_eq!(session.deposit(0), Err(GameError::InvalidAmount));
        session.deposit(5_000).expect("deposit");
        assert_eq!(session.balance(), 5_000);
        assert!(matches!(
            session.withdraw(6_000),
            Err(GameError::InsufficientFunds { .. })
        ));
        session.withdraw(5_000).expect("withdraw");
        assert_eq!(session.balance(), 0);
    }
}
