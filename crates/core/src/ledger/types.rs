//! Ledger domain types for account and journal entry operations.
//!
//! This module defines the request structs accepted by the ledger and the
//! small enums every other module relies on (account type, entry status).

use chrono::NaiveDate;
use estate_shared::types::{AccountId, Actor, JournalEntryId, PaymentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Account type classification in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, bank, receivables).
    Asset,
    /// Obligations owed (customer advances, payables).
    Liability,
    /// Owner's equity.
    Equity,
    /// Income earned.
    Income,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// All account types in reporting order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Income,
        Self::Expense,
    ];

    /// Returns the side on which this account type increases.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Income => NormalBalance::Credit,
        }
    }

    /// Returns true for types reported on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses an account type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "income" | "revenue" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The side on which an account's balance grows.
///
/// - Debit-normal (Asset, Expense): `balance += debit - credit`
/// - Credit-normal (Liability, Equity, Income): `balance += credit - debit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Balance grows with debits.
    Debit,
    /// Balance grows with credits.
    Credit,
}

impl NormalBalance {
    /// Calculates the balance change for one line.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Journal entry status.
///
/// The valid transitions are:
/// - Draft → Posted (post)
/// - Posted → Void (void)
///
/// Void is terminal and there is no path back to Draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Entry is being drafted and can be modified.
    Draft,
    /// Entry has been posted to the ledger (immutable).
    Posted,
    /// Entry has been voided (immutable, terminal).
    Void,
}

impl JournalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Void => "void",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "posted" => Some(Self::Posted),
            "void" | "voided" => Some(Self::Void),
            _ => None,
        }
    }

    /// Returns true if the entry can be modified.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry is immutable.
    #[must_use]
    pub const fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Void)
    }
}

impl fmt::Display for JournalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of external event a journal entry was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// A received payment.
    Payment,
    /// A processed refund.
    Refund,
    /// A sale booking.
    Booking,
    /// A manual adjustment.
    Manual,
}

/// Link from a journal entry back to the event that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryReference {
    /// The event kind.
    pub kind: ReferenceKind,
    /// The event's identifier.
    pub id: Uuid,
}

impl EntryReference {
    /// Reference to a payment.
    #[must_use]
    pub const fn payment(id: PaymentId) -> Self {
        Self {
            kind: ReferenceKind::Payment,
            id: id.into_inner(),
        }
    }

    /// Reference to any other event.
    #[must_use]
    pub const fn new(kind: ReferenceKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

/// Input for a single journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount (zero for credit lines).
    pub debit: Decimal,
    /// Credit amount (zero for debit lines).
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
    /// Optional cost-center / project tag.
    pub cost_center: Option<String>,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
            cost_center: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
            cost_center: None,
        }
    }

    /// Sets the line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the cost-center tag.
    #[must_use]
    pub fn with_cost_center(mut self, cost_center: impl Into<String>) -> Self {
        self.cost_center = Some(cost_center.into());
        self
    }
}

/// Request to create a draft journal entry.
#[derive(Debug, Clone)]
pub struct CreateEntryRequest {
    /// The accounting date of the entry.
    pub entry_date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Optional link to the external event.
    pub reference: Option<EntryReference>,
    /// The lines (debits must equal credits).
    pub lines: Vec<JournalLineInput>,
    /// Who is creating the entry.
    pub created_by: Actor,
}

/// Patch applied to a draft entry. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateEntryRequest {
    /// The entry to update.
    pub entry_id: JournalEntryId,
    /// New accounting date.
    pub entry_date: Option<NaiveDate>,
    /// New description.
    pub description: Option<String>,
    /// New reference (`Some(None)` clears it).
    pub reference: Option<Option<EntryReference>>,
    /// Replacement lines, re-validated as a whole.
    pub lines: Option<Vec<JournalLineInput>>,
    /// Who is updating the entry.
    pub updated_by: Option<Actor>,
}

/// Request to post a draft entry.
#[derive(Debug, Clone, Copy)]
pub struct PostRequest {
    /// The entry to post.
    pub entry_id: JournalEntryId,
    /// Who is posting.
    pub actor: Actor,
}

/// Request to void a posted entry.
#[derive(Debug, Clone)]
pub struct VoidRequest {
    /// The entry to void.
    pub entry_id: JournalEntryId,
    /// Who is voiding.
    pub actor: Actor,
    /// Why the entry is voided (required).
    pub reason: String,
}

/// Entry totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of line debits.
    pub total_debit: Decimal,
    /// Sum of line credits.
    pub total_credit: Decimal,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub const fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }

    /// Returns true if debits and credits agree within `tolerance`.
    #[must_use]
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        self.difference().abs() <= tolerance
    }
}

/// Request to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountRequest {
    /// Account code (unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account for the hierarchy.
    pub parent_id: Option<AccountId>,
    /// Opening balance.
    pub opening_balance: Decimal,
}

impl CreateAccountRequest {
    /// Creates a root account request with a zero opening balance.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            account_type,
            parent_id: None,
            opening_balance: Decimal::ZERO,
        }
    }

    /// Places the account under `parent_id`.
    #[must_use]
    pub const fn with_parent(mut self, parent_id: AccountId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Sets the opening balance.
    #[must_use]
    pub const fn with_opening_balance(mut self, opening_balance: Decimal) -> Self {
        self.opening_balance = opening_balance;
        self
    }
}

/// Patch applied to an account. `None` fields are left unchanged.
///
/// Balances are deliberately absent: only posting and voiding move them.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountRequest {
    /// New code.
    pub code: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// New description (`Some(None)` clears it).
    pub description: Option<Option<String>>,
    /// New parent (`Some(None)` makes it a root).
    pub parent_id: Option<Option<AccountId>>,
}
