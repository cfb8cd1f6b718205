//! Ledger service for journal line validation.
//!
//! This module provides the business rules a journal entry must satisfy
//! before it is stored: every line is well-formed, every account exists and
//! is active, and debits equal credits within the configured tolerance.

use estate_shared::types::AccountId;
use estate_shared::types::money::checked_sum;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{AccountType, EntryTotals, JournalLineInput, JournalStatus};

/// Information about an account needed for validation.
#[derive(Debug, Clone, Copy)]
pub struct AccountInfo {
    /// The account ID.
    pub id: AccountId,
    /// Whether the account is active.
    pub is_active: bool,
    /// The account's type.
    pub account_type: AccountType,
}

/// Ledger service for journal line validation.
///
/// This service contains pure business logic with no storage dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Validates journal lines and returns their totals.
    ///
    /// Checks, in order:
    /// 1. At least one line
    /// 2. No negative amount, at most one nonzero side per line
    /// 3. Every account exists and is active
    /// 4. `|debit - credit| <= tolerance`
    ///
    /// A line with both sides zero is accepted.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` for the first failed check.
    pub fn validate_lines<A>(
        lines: &[JournalLineInput],
        tolerance: Decimal,
        account_lookup: A,
    ) -> Result<EntryTotals, LedgerError>
    where
        A: Fn(AccountId) -> Result<AccountInfo, LedgerError>,
    {
        if lines.is_empty() {
            return Err(LedgerError::NoLines);
        }

        for (index, line) in lines.iter().enumerate() {
            let line_no = index + 1;
            if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
                return Err(LedgerError::NegativeAmount { line: line_no });
            }
            if !line.debit.is_zero() && !line.credit.is_zero() {
                return Err(LedgerError::BothSidesSet { line: line_no });
            }

            let account = account_lookup(line.account_id)?;
            if !account.is_active {
                return Err(LedgerError::AccountInactive(account.id));
            }
        }

        let totals = Self::calculate_totals(lines)?;
        if !totals.is_balanced(tolerance) {
            return Err(LedgerError::UnbalancedEntry {
                debit: totals.total_debit,
                credit: totals.total_credit,
            });
        }

        Ok(totals)
    }

    /// Calculates entry totals from lines.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` if either side does not fit in a `Decimal`.
    pub fn calculate_totals(lines: &[JournalLineInput]) -> Result<EntryTotals, LedgerError> {
        let total_debit = checked_sum(lines.iter().map(|l| l.debit)).ok_or(LedgerError::AmountOverflow)?;
        let total_credit = checked_sum(lines.iter().map(|l| l.credit)).ok_or(LedgerError::AmountOverflow)?;

        Ok(EntryTotals::new(total_debit, total_credit))
    }

    /// Validates that an entry can be modified.
    ///
    /// # Errors
    ///
    /// Returns error if the entry is posted or voided.
    pub const fn validate_can_modify(status: JournalStatus) -> Result<(), LedgerError> {
        match status {
            JournalStatus::Draft => Ok(()),
            JournalStatus::Posted => Err(LedgerError::CannotModifyPosted),
            JournalStatus::Void => Err(LedgerError::CannotModifyVoided),
        }
    }

    /// Validates that an entry can be deleted.
    ///
    /// Only drafts can be deleted; posted and voided entries are history.
    ///
    /// # Errors
    ///
    /// Returns error if the entry is not a draft.
    pub const fn validate_can_delete(status: JournalStatus) -> Result<(), LedgerError> {
        match status {
            JournalStatus::Draft => Ok(()),
            JournalStatus::Posted | JournalStatus::Void => Err(LedgerError::CanOnlyDeleteDraft),
        }
    }
}
