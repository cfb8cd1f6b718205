//! Running balance replay.
//!
//! Reports rebuild an account's history by replaying posted lines from the
//! opening balance. Each step records the balance before and after the line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::NormalBalance;

/// Running balance after one replayed line.
///
/// - `current_balance[N] = previous_balance[N] + change`
/// - `previous_balance[N] = current_balance[N-1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Number of lines replayed so far.
    pub sequence: u64,
    /// Balance before this line.
    pub previous_balance: Decimal,
    /// Balance after this line.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Starting point of a replay.
    #[must_use]
    pub const fn opening(balance: Decimal) -> Self {
        Self {
            sequence: 0,
            previous_balance: balance,
            current_balance: balance,
        }
    }

    /// Advances by one line with the given normal balance side.
    #[must_use]
    pub fn next(&self, side: NormalBalance, debit: Decimal, credit: Decimal) -> Self {
        self.next_change(side.balance_change(debit, credit))
    }

    /// Advances by an already signed change.
    #[must_use]
    pub fn next_change(&self, change: Decimal) -> Self {
        Self {
            sequence: self.sequence + 1,
            previous_balance: self.current_balance,
            current_balance: self.current_balance + change,
        }
    }
}
