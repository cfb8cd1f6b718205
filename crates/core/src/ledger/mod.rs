//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Chart of accounts records and hierarchy
//! - Journal entries and lines with a Draft → Posted → Void lifecycle
//! - Line validation (balance, sides, active accounts)
//! - Balance propagation on post and void
//! - Running balance replay for reports

pub mod account;
pub mod balance;
pub mod chart;
pub mod entry;
pub mod error;
pub mod posting;
pub mod service;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod service_props;

pub use account::Account;
pub use balance::RunningBalance;
pub use chart::{AccountNode, ChartOfAccounts, TypeSummary, TypeTotal, summarize_by_type};
pub use entry::{EntryAudit, JournalEntry, JournalLine, format_entry_number};
pub use error::LedgerError;
pub use posting::{BalanceDeltas, posting_deltas, void_deltas};
pub use service::{AccountInfo, LedgerService};
pub use types::{
    AccountType, CreateAccountRequest, CreateEntryRequest, EntryReference, EntryTotals,
    JournalLineInput, JournalStatus, NormalBalance, PostRequest, ReferenceKind,
    UpdateAccountRequest, UpdateEntryRequest, VoidRequest,
};
pub use workflow::{JournalAction, JournalWorkflow};
