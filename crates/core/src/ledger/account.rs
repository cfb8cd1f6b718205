//! Chart of accounts records.

use chrono::{DateTime, Utc};
use estate_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::types::{AccountType, CreateAccountRequest, NormalBalance};

/// Maximum length of an account code.
pub const MAX_CODE_LEN: usize = 20;

/// A node in the chart of accounts.
///
/// `current_balance` is owned by the journal engine: it starts at the
/// opening balance and moves only when entries are posted or voided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Unique, sortable account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account (forest: at most one).
    pub parent_id: Option<AccountId>,
    /// Balance before any posting.
    pub opening_balance: Decimal,
    /// Balance after every posted entry.
    pub current_balance: Decimal,
    /// Inactive accounts reject new lines.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Builds a new active account from a validated request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccount` if the code or name is blank or the code is too long.
    pub fn from_request(request: CreateAccountRequest, now: DateTime<Utc>) -> Result<Self, LedgerError> {
        let code = validate_code(&request.code)?;
        let name = validate_name(&request.name)?;

        Ok(Self {
            id: AccountId::new(),
            code,
            name,
            description: request.description,
            account_type: request.account_type,
            parent_id: request.parent_id,
            opening_balance: request.opening_balance,
            current_balance: request.opening_balance,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the side on which this account grows.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }

    /// Applies a signed balance delta with overflow detection.
    ///
    /// # Errors
    ///
    /// Returns `BalanceOverflow` if the new balance is not representable.
    pub fn apply_delta(&mut self, delta: Decimal) -> Result<(), LedgerError> {
        self.current_balance = self
            .current_balance
            .checked_add(delta)
            .ok_or(LedgerError::BalanceOverflow(self.id))?;
        Ok(())
    }
}

/// Trims and checks an account code.
///
/// # Errors
///
/// Returns `InvalidAccount` for blank or oversized codes.
pub fn validate_code(code: &str) -> Result<String, LedgerError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(LedgerError::InvalidAccount("code is required".into()));
    }
    if code.len() > MAX_CODE_LEN {
        return Err(LedgerError::InvalidAccount(format!(
            "code must be at most {MAX_CODE_LEN} characters"
        )));
    }
    Ok(code.to_string())
}

/// Trims and checks an account name.
///
/// # Errors
///
/// Returns `InvalidAccount` for blank names.
pub fn validate_name(name: &str) -> Result<String, LedgerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::InvalidAccount("name is required".into()));
    }
    Ok(name.to_string())
}
