//! Report error types.

use chrono::NaiveDate;
use estate_shared::types::{AccountId, BankAccountId};
use estate_shared::{AppError, ErrorKind};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// No account with the given code.
    #[error("Account not found for code: {0}")]
    AccountCodeNotFound(String),

    /// Bank account record not found.
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(BankAccountId),

    /// No ledger account matches the bank account name.
    #[error("No ledger account matches bank account '{0}'")]
    BankLedgerNotResolved(String),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Backing store error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ReportError {
    /// Returns the error code for callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountCodeNotFound(_) => "ACCOUNT_CODE_NOT_FOUND",
            Self::BankAccountNotFound(_) => "BANK_ACCOUNT_NOT_FOUND",
            Self::BankLedgerNotResolved(_) => "BANK_LEDGER_NOT_RESOLVED",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound(_)
            | Self::AccountCodeNotFound(_)
            | Self::BankAccountNotFound(_)
            | Self::BankLedgerNotResolved(_) => ErrorKind::NotFound,
            Self::InvalidDateRange { .. } => ErrorKind::Validation,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
