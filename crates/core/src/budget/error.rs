//! Budget error types.

use estate_shared::types::{AccountId, BudgetId};
use estate_shared::{AppError, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(BudgetId),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// A budget already exists for this account, department and year.
    #[error("Budget already exists for account {account_id} in {fiscal_year}")]
    Duplicate {
        /// Account ID.
        account_id: AccountId,
        /// Fiscal year.
        fiscal_year: i32,
    },

    /// Amount cannot be negative.
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// Fiscal year out of range.
    #[error("Invalid fiscal year: {0}")]
    InvalidFiscalYear(i32),

    /// Backing store error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BudgetError {
    /// Returns the error code for callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "BUDGET_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::Duplicate { .. } => "DUPLICATE_BUDGET",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::InvalidFiscalYear(_) => "INVALID_FISCAL_YEAR",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::AccountNotFound(_) => ErrorKind::NotFound,
            Self::Duplicate { .. } => ErrorKind::Conflict,
            Self::NegativeAmount(_) | Self::InvalidFiscalYear(_) => ErrorKind::Validation,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
