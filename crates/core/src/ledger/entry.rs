//! Journal entry aggregate.

use chrono::{DateTime, NaiveDate, Utc};
use estate_shared::types::{AccountId, Actor, JournalEntryId, JournalLineId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{EntryReference, EntryTotals, JournalLineInput, JournalStatus};

/// One account movement within an entry.
///
/// Lines are owned by their entry and never outlive it; a voided entry keeps
/// its lines as history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier.
    pub id: JournalLineId,
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// 1-based position within the entry.
    pub line_no: u32,
    /// Account moved by this line.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Optional description.
    pub description: Option<String>,
    /// Optional cost-center / project tag.
    pub cost_center: Option<String>,
}

impl JournalLine {
    /// Materializes validated inputs as lines of `entry_id`.
    #[must_use]
    pub fn from_inputs(entry_id: JournalEntryId, inputs: Vec<JournalLineInput>) -> Vec<Self> {
        inputs
            .into_iter()
            .zip(1u32..)
            .map(|(input, line_no)| Self {
                id: JournalLineId::new(),
                entry_id,
                line_no,
                account_id: input.account_id,
                debit: input.debit,
                credit: input.credit,
                description: input.description,
                cost_center: input.cost_center,
            })
            .collect()
    }
}

/// Audit trail of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAudit {
    /// Creator.
    pub created_by: Actor,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last draft modification time.
    pub updated_at: DateTime<Utc>,
    /// Who posted the entry.
    pub posted_by: Option<Actor>,
    /// When the entry was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// Who voided the entry.
    pub voided_by: Option<Actor>,
    /// When the entry was voided.
    pub voided_at: Option<DateTime<Utc>>,
    /// Why the entry was voided.
    pub void_reason: Option<String>,
}

impl EntryAudit {
    /// Audit trail for a freshly created draft.
    #[must_use]
    pub const fn created(created_by: Actor, now: DateTime<Utc>) -> Self {
        Self {
            created_by,
            created_at: now,
            updated_at: now,
            posted_by: None,
            posted_at: None,
            voided_by: None,
            voided_at: None,
            void_reason: None,
        }
    }
}

/// One balanced transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Unique human-readable number, e.g. `JE-000042`.
    pub entry_number: String,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Link to the external event.
    pub reference: Option<EntryReference>,
    /// Lifecycle status.
    pub status: JournalStatus,
    /// Sum of line debits, fixed at creation.
    pub total_debit: Decimal,
    /// Sum of line credits, fixed at creation.
    pub total_credit: Decimal,
    /// Lines in `line_no` order.
    pub lines: Vec<JournalLine>,
    /// Audit trail.
    pub audit: EntryAudit,
}

impl JournalEntry {
    /// Returns the stored totals.
    #[must_use]
    pub const fn totals(&self) -> EntryTotals {
        EntryTotals::new(self.total_debit, self.total_credit)
    }

    /// Replaces the lines and their totals.
    pub fn replace_lines(&mut self, lines: Vec<JournalLineInput>, totals: EntryTotals) {
        self.lines = JournalLine::from_inputs(self.id, lines);
        self.total_debit = totals.total_debit;
        self.total_credit = totals.total_credit;
    }
}

/// Formats an entry number as `{prefix}-{seq:06}`.
#[must_use]
pub fn format_entry_number(prefix: &str, sequence: u64) -> String {
    format!("{prefix}-{sequence:06}")
}
