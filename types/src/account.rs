use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Errors raised by the two ledger mutators.
#[derive(Debug, ThisError, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient funds (requested={requested}, balance={balance})")]
    InsufficientFunds { requested: u64, balance: u64 },
    #[error("invalid amount")]
    InvalidAmount,
}

/// A single player balance, denominated in cents.
///
/// `debit` and `credit` are the only mutators; the balance can never go
/// negative because debits are checked against it first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    balance: u64,
}

impl Account {
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }

    /// Current balance in cents.
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Remove `amount` cents from the balance.
    ///
    /// Fails with `InvalidAmount` for a zero amount and `InsufficientFunds`
    /// when the balance cannot cover it. The balance is untouched on failure.
    pub fn debit(&mut self, amount: u64) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                balance: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Add `amount` cents to the balance.
    ///
    /// Fails with `InvalidAmount` if the balance would overflow `u64`.
    pub fn credit(&mut self, amount: u64) -> Result<(), LedgerError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount)?;
        Ok(())
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new(super::STARTING_BALANCE_CENTS)
    }
}

/// Format a cent amount as a dollar string, e.g. `1550` -> `"15.50"`.
pub fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
