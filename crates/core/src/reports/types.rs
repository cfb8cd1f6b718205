//! Report data types.

use chrono::NaiveDate;
use estate_shared::types::{AccountId, JournalEntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{AccountType, EntryReference};

/// One line of a posted journal entry, flattened for projection.
///
/// Only lines of Posted entries are ever turned into `PostedLine`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedLine {
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// Entry number.
    pub entry_number: String,
    /// Accounting date of the entry.
    pub entry_date: NaiveDate,
    /// Global insertion order, ties broken within a date.
    pub sequence: u64,
    /// Account moved.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line description, falling back to the entry description.
    pub description: String,
    /// Link to the external event.
    pub reference: Option<EntryReference>,
}

/// One row of an account ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// Entry number.
    pub entry_number: String,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance after this row.
    pub balance: Decimal,
}

/// Account ledger for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLedgerReport {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Inclusive start date, if bounded.
    pub from: Option<NaiveDate>,
    /// Inclusive end date, if bounded.
    pub to: Option<NaiveDate>,
    /// Balance at the start of the range.
    pub opening_balance: Decimal,
    /// Rows in (date, insertion) order.
    pub rows: Vec<LedgerRow>,
    /// Sum of row debits.
    pub total_debit: Decimal,
    /// Sum of row credits.
    pub total_credit: Decimal,
    /// Balance at the end of the range.
    pub closing_balance: Decimal,
}

/// One account row of the trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Active accounts ordered by code.
    pub rows: Vec<TrialBalanceRow>,
    /// Total of the debit column.
    pub total_debit: Decimal,
    /// Total of the credit column.
    pub total_credit: Decimal,
    /// Whether the columns agree.
    pub is_balanced: bool,
}

/// Per-day totals within a weekly ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    /// The day.
    pub date: NaiveDate,
    /// Debits posted that day.
    pub debit: Decimal,
    /// Credits posted that day.
    pub credit: Decimal,
    /// Balance at the end of the day.
    pub closing_balance: Decimal,
}

/// Account ledger for seven consecutive days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyLedgerReport {
    /// First day.
    pub week_start: NaiveDate,
    /// Last day (inclusive).
    pub week_end: NaiveDate,
    /// The underlying ledger.
    pub ledger: AccountLedgerReport,
    /// One total per day, including days without activity.
    pub days: Vec<DailyTotal>,
}

/// Amount attributed to one account in a sectioned report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAmount {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Amount, signed by the account's normal balance.
    pub amount: Decimal,
}

/// A group of accounts and their total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in code order.
    pub accounts: Vec<AccountAmount>,
}

impl ReportSection {
    pub(crate) fn push(&mut self, account: AccountAmount) {
        self.total += account.amount;
        self.accounts.push(account);
    }
}

/// Profit and loss for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitAndLossReport {
    /// Inclusive start.
    pub period_start: NaiveDate,
    /// Inclusive end.
    pub period_end: NaiveDate,
    /// Income accounts.
    pub income: ReportSection,
    /// Expense accounts.
    pub expenses: ReportSection,
    /// Income minus expenses.
    pub net_profit: Decimal,
}

/// Balance sheet as of a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Cut-off date (inclusive).
    pub as_of: NaiveDate,
    /// Asset accounts.
    pub assets: ReportSection,
    /// Liability accounts.
    pub liabilities: ReportSection,
    /// Equity accounts.
    pub equity: ReportSection,
    /// Income minus expenses up to `as_of`, not yet closed to equity.
    pub current_earnings: Decimal,
    /// Liabilities plus equity plus current earnings.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities and equity.
    pub is_balanced: bool,
}
