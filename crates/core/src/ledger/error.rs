//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur during account and journal
//! operations: line validation, account hierarchy rules, lifecycle
//! transitions and balance propagation.

use estate_shared::types::{AccountId, JournalEntryId};
use estate_shared::{AppError, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::JournalStatus;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least one line.
    #[error("Journal entry must have at least one line")]
    NoLines,

    /// Line amount cannot be negative.
    #[error("Line {line}: amounts cannot be negative")]
    NegativeAmount {
        /// 1-based line number.
        line: usize,
    },

    /// Line carries both a debit and a credit.
    #[error("Line {line}: specify either debit or credit, not both")]
    BothSidesSet {
        /// 1-based line number.
        line: usize,
    },

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Status transition is not allowed.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: JournalStatus,
        /// Requested status.
        to: JournalStatus,
    },

    /// Cannot modify a posted entry.
    #[error("Cannot modify posted journal entry")]
    CannotModifyPosted,

    /// Cannot modify a voided entry.
    #[error("Cannot modify voided journal entry")]
    CannotModifyVoided,

    /// Can only delete draft entries.
    #[error("Can only delete draft journal entries")]
    CanOnlyDeleteDraft,

    /// Void reason is required.
    #[error("Void reason is required")]
    VoidReasonRequired,

    /// Account has child accounts.
    #[error("Account {0} has child accounts; deactivate it instead")]
    AccountHasChildren(AccountId),

    /// Account is referenced by journal lines.
    #[error("Account {0} is referenced by journal lines; deactivate it instead")]
    AccountHasLines(AccountId),

    /// Reparenting would create a cycle.
    #[error("Account {account} cannot be placed under {parent}: cycle in hierarchy")]
    ParentCycle {
        /// The account being moved.
        account: AccountId,
        /// The requested parent.
        parent: AccountId,
    },

    /// Account data is invalid.
    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    // ========== Conflict Errors ==========
    /// Account code already in use.
    #[error("Account code already exists: {0}")]
    DuplicateAccountCode(String),

    // ========== Not Found Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// No account with the given code.
    #[error("Account not found for code: {0}")]
    AccountCodeNotFound(String),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(AccountId),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// No journal entry with the given number.
    #[error("Journal entry not found for number: {0}")]
    EntryNumberNotFound(String),

    // ========== Consistency Errors ==========
    /// Balance arithmetic overflowed while propagating a posting.
    #[error("Balance overflow while updating account {0}")]
    BalanceOverflow(AccountId),

    /// Line totals of an entry are not representable.
    #[error("Journal entry totals overflow")]
    AmountOverflow,

    // ========== Storage Errors ==========
    /// Backing store error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the error code for callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines => "NO_LINES",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::BothSidesSet { .. } => "BOTH_SIDES_SET",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CannotModifyPosted => "CANNOT_MODIFY_POSTED",
            Self::CannotModifyVoided => "CANNOT_MODIFY_VOIDED",
            Self::CanOnlyDeleteDraft => "CAN_ONLY_DELETE_DRAFT",
            Self::VoidReasonRequired => "VOID_REASON_REQUIRED",
            Self::AccountHasChildren(_) => "ACCOUNT_HAS_CHILDREN",
            Self::AccountHasLines(_) => "ACCOUNT_HAS_LINES",
            Self::ParentCycle { .. } => "PARENT_CYCLE",
            Self::InvalidAccount(_) => "INVALID_ACCOUNT",
            Self::DuplicateAccountCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountCodeNotFound(_) => "ACCOUNT_CODE_NOT_FOUND",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::EntryNumberNotFound(_) => "ENTRY_NUMBER_NOT_FOUND",
            Self::BalanceOverflow(_) => "BALANCE_OVERFLOW",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoLines
            | Self::NegativeAmount { .. }
            | Self::BothSidesSet { .. }
            | Self::UnbalancedEntry { .. }
            | Self::AccountInactive(_)
            | Self::InvalidTransition { .. }
            | Self::CannotModifyPosted
            | Self::CannotModifyVoided
            | Self::CanOnlyDeleteDraft
            | Self::VoidReasonRequired
            | Self::AccountHasChildren(_)
            | Self::AccountHasLines(_)
            | Self::ParentCycle { .. }
            | Self::InvalidAccount(_)
            | Self::AmountOverflow => ErrorKind::Validation,

            Self::DuplicateAccountCode(_) => ErrorKind::Conflict,

            Self::AccountNotFound(_)
            | Self::AccountCodeNotFound(_)
            | Self::ParentNotFound(_)
            | Self::EntryNotFound(_)
            | Self::EntryNumberNotFound(_) => ErrorKind::NotFound,

            Self::BalanceOverflow(_) => ErrorKind::Consistency,

            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::NoLines.error_code(), "NO_LINES");
        assert_eq!(
            LedgerError::UnbalancedEntry {
                debit: dec!(1000),
                credit: dec!(900),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(
            LedgerError::NegativeAmount { line: 1 }.error_code(),
            "NEGATIVE_AMOUNT"
        );
    }

    #[rstest]
    #[case(LedgerError::NoLines, ErrorKind::Validation)]
    #[case(LedgerError::VoidReasonRequired, ErrorKind::Validation)]
    #[case(LedgerError::AmountOverflow, ErrorKind::Validation)]
    #[case(LedgerError::DuplicateAccountCode("1001".into()), ErrorKind::Conflict)]
    #[case(LedgerError::AccountNotFound(AccountId::new()), ErrorKind::NotFound)]
    #[case(LedgerError::EntryNotFound(JournalEntryId::new()), ErrorKind::NotFound)]
    #[case(LedgerError::BalanceOverflow(AccountId::new()), ErrorKind::Consistency)]
    #[case(LedgerError::Storage("lock".into()), ErrorKind::Storage)]
    fn test_error_kinds(#[case] err: LedgerError, #[case] kind: ErrorKind) {
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::UnbalancedEntry {
            debit: dec!(1000.00),
            credit: dec!(900.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 1000.00, Credit: 900.00"
        );

        let err = LedgerError::InvalidTransition {
            from: JournalStatus::Void,
            to: JournalStatus::Posted,
        };
        assert_eq!(
            err.to_string(),
            "Invalid status transition from void to posted"
        );
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = LedgerError::NoLines.into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");

        let app: AppError = LedgerError::BalanceOverflow(AccountId::new()).into();
        assert_eq!(app.error_code(), "CONSISTENCY_ERROR");
    }
}
