//! In-process transactional store.
//!
//! All records live in one [`LedgerState`] behind a single `RwLock`.
//! Readers share the lock; a transaction takes the write lock, mutates a
//! working copy and swaps it in only when the closure returns `Ok`. Every
//! multi-record operation is therefore all-or-nothing, and writers touching
//! the same accounts serialize.
//!
//! Each table is a copy-on-write [`Table`], so the working copy shares every
//! table with the committed state until the transaction first writes to it.

use std::collections::{HashMap, HashSet};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use estate_core::budget::Budget;
use estate_core::collection::{BankAccount, Booking, FlatPaymentPlan, Payment};
use estate_core::ledger::{
    Account, AccountInfo, AccountType, BalanceDeltas, JournalEntry, JournalLine, JournalStatus, LedgerError,
    format_entry_number,
};
use estate_core::refund::PaymentRefund;
use estate_core::reports::PostedLine;
use estate_core::schedule::{PlanType, ScheduleEntry};
use estate_shared::types::{
    AccountId, BankAccountId, BookingId, BudgetId, JournalEntryId, JournalLineId, PaymentId, PaymentPlanId, RefundId,
};
use estate_shared::{AppError, ErrorKind};
use thiserror::Error;

/// Errors raised by the store itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A writer panicked while holding the lock.
    #[error("Store lock poisoned")]
    Poisoned,
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::from_kind(ErrorKind::Storage, err.to_string())
    }
}

macro_rules! storage_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<StoreError> for $ty {
                fn from(err: StoreError) -> Self {
                    Self::Storage(err.to_string())
                }
            }
        )+
    };
}

storage_error!(
    LedgerError,
    estate_core::reports::ReportError,
    estate_core::schedule::ScheduleError,
    estate_core::collection::CollectionError,
    estate_core::refund::RefundError,
    estate_core::budget::BudgetError,
);

/// A table shared between state snapshots.
///
/// Reads go through `Deref`. The first mutable access clones the table if
/// another snapshot still holds it.
#[derive(Debug, Default)]
pub struct Table<T>(Arc<T>);

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Table<T> {
    /// Returns true if both handles point at the same table.
    #[must_use]
    pub fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Deref for Table<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Clone> DerefMut for Table<T> {
    fn deref_mut(&mut self) -> &mut T {
        Arc::make_mut(&mut self.0)
    }
}

/// Every record held by the store.
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    /// Chart of accounts.
    pub accounts: Table<HashMap<AccountId, Account>>,
    /// Journal entries with their lines.
    pub entries: Table<HashMap<JournalEntryId, JournalEntry>>,
    /// Global insertion order of journal lines.
    pub line_sequence: Table<HashMap<JournalLineId, u64>>,
    /// Payment schedules per booking, in sequence order.
    pub schedules: Table<HashMap<BookingId, Vec<ScheduleEntry>>>,
    /// Plan type each booking's schedule was generated with.
    pub plan_types: Table<HashMap<BookingId, PlanType>>,
    /// Mirrored bookings.
    pub bookings: Table<HashMap<BookingId, Booking>>,
    /// Mirrored payments.
    pub payments: Table<HashMap<PaymentId, Payment>>,
    /// Flat payment plans.
    pub plans: Table<HashMap<PaymentPlanId, FlatPaymentPlan>>,
    /// Company bank accounts.
    pub bank_accounts: Table<HashMap<BankAccountId, BankAccount>>,
    /// Refunds.
    pub refunds: Table<HashMap<RefundId, PaymentRefund>>,
    /// Budgets.
    pub budgets: Table<HashMap<BudgetId, Budget>>,
    /// Payments that already went through the completion cascade.
    pub processed_payments: Table<HashSet<PaymentId>>,
    entry_seq: u64,
    line_seq: u64,
}

impl LedgerState {
    /// Allocates the next entry number.
    pub fn next_entry_number(&mut self, prefix: &str) -> String {
        self.entry_seq += 1;
        format_entry_number(prefix, self.entry_seq)
    }

    /// Records the insertion order of freshly created lines.
    pub fn assign_line_sequences(&mut self, lines: &[JournalLine]) {
        for line in lines {
            self.line_seq += 1;
            self.line_sequence.insert(line.id, self.line_seq);
        }
    }

    /// Looks up the fields line validation needs.
    pub fn account_info(&self, id: AccountId) -> Result<AccountInfo, LedgerError> {
        self.accounts
            .get(&id)
            .map(|a| AccountInfo {
                id: a.id,
                is_active: a.is_active,
                account_type: a.account_type,
            })
            .ok_or(LedgerError::AccountNotFound(id))
    }

    /// Looks up an account's type.
    pub fn account_type(&self, id: AccountId) -> Result<AccountType, LedgerError> {
        self.accounts
            .get(&id)
            .map(|a| a.account_type)
            .ok_or(LedgerError::AccountNotFound(id))
    }

    /// Finds an account by its code.
    pub fn account_by_code(&self, code: &str) -> Option<&Account> {
        let code = code.trim();
        self.accounts.values().find(|a| a.code == code)
    }

    /// Applies balance deltas to current balances.
    ///
    /// Stops at the first overflow; the caller's transaction discards any
    /// balances already moved.
    pub fn apply_deltas(&mut self, deltas: &BalanceDeltas, now: DateTime<Utc>) -> Result<(), LedgerError> {
        for (account_id, delta) in deltas {
            let account = self
                .accounts
                .get_mut(account_id)
                .ok_or(LedgerError::AccountNotFound(*account_id))?;
            account.apply_delta(*delta)?;
            account.updated_at = now;
        }
        Ok(())
    }

    /// Returns true if any journal line references the account.
    pub fn account_has_lines(&self, id: AccountId) -> bool {
        self.entries
            .values()
            .any(|e| e.lines.iter().any(|l| l.account_id == id))
    }

    /// Lines of every Posted entry, flattened for reporting.
    pub fn posted_lines(&self) -> Vec<PostedLine> {
        let mut lines: Vec<PostedLine> = self
            .entries
            .values()
            .filter(|e| e.status == JournalStatus::Posted)
            .flat_map(|entry| {
                entry.lines.iter().map(|line| PostedLine {
                    entry_id: entry.id,
                    entry_number: entry.entry_number.clone(),
                    entry_date: entry.entry_date,
                    sequence: self.line_sequence.get(&line.id).copied().unwrap_or_default(),
                    account_id: line.account_id,
                    debit: line.debit,
                    credit: line.credit,
                    description: line
                        .description
                        .clone()
                        .unwrap_or_else(|| entry.description.clone()),
                    reference: entry.reference,
                })
            })
            .collect();
        lines.sort_by_key(|l| (l.entry_date, l.sequence));
        lines
    }

    /// All accounts ordered by code.
    pub fn accounts_by_code(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        accounts
    }
}

/// Shared handle to the store. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<LedgerState>>,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a projection under the shared lock.
    pub fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&LedgerState) -> Result<T, E>,
        E: From<StoreError>,
    {
        let state = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        f(&state)
    }

    /// Runs `f` against a working copy and commits it only on `Ok`.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut LedgerState) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut state = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let mut working = state.clone();
        let value = f(&mut working)?;
        *state = working;
        Ok(value)
    }
}
