//! Journal repository: the only writer of account balances.
//!
//! Entries are created as drafts, validated as a whole, and move balances
//! only when posted (and back when voided). Each operation runs in one store
//! transaction, so a failure half-way through propagation leaves every
//! balance untouched.

use chrono::{DateTime, NaiveDate, Utc};
use estate_core::ledger::{
    CreateEntryRequest, EntryAudit, JournalEntry, JournalLine, JournalStatus, JournalWorkflow, LedgerError,
    LedgerService, PostRequest, UpdateEntryRequest, VoidRequest, posting_deltas, void_deltas,
};
use estate_shared::config::LedgerConfig;
use estate_shared::types::{AccountId, Actor, JournalEntryId, PageRequest, PageResponse};
use tracing::{debug, info, warn};

use crate::store::{LedgerState, Store};

/// Filter options for listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by status.
    pub status: Option<JournalStatus>,
    /// Entries dated on or after.
    pub from: Option<NaiveDate>,
    /// Entries dated on or before.
    pub to: Option<NaiveDate>,
    /// Entries with at least one line on this account.
    pub account_id: Option<AccountId>,
}

impl EntryFilter {
    fn matches(&self, entry: &JournalEntry) -> bool {
        self.status.is_none_or(|s| s == entry.status)
            && self.from.is_none_or(|from| entry.entry_date >= from)
            && self.to.is_none_or(|to| entry.entry_date <= to)
            && self
                .account_id
                .is_none_or(|id| entry.lines.iter().any(|l| l.account_id == id))
    }
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    store: Store,
    config: LedgerConfig,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(store: Store, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Validates and stores a draft entry.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the lines are empty, malformed,
    /// reference unknown or inactive accounts, or do not balance.
    pub fn create_entry(&self, request: CreateEntryRequest) -> Result<JournalEntry, LedgerError> {
        self.store
            .transaction(|state| insert_draft(state, &self.config, request, Utc::now()))
            .inspect_err(|err| warn!(error = %err, "Rejected journal entry"))
    }

    /// Patches a draft entry. Replacement lines are re-validated as a whole.
    ///
    /// # Errors
    ///
    /// Returns `CannotModifyPosted`/`CannotModifyVoided` for non-drafts and
    /// any line validation error.
    pub fn update_entry(&self, request: UpdateEntryRequest) -> Result<JournalEntry, LedgerError> {
        self.store.transaction(|state| {
            let id = request.entry_id;
            let status = state
                .entries
                .get(&id)
                .map(|e| e.status)
                .ok_or(LedgerError::EntryNotFound(id))?;
            LedgerService::validate_can_modify(status)?;

            let totals = match &request.lines {
                Some(lines) => Some(LedgerService::validate_lines(
                    lines,
                    self.config.balance_tolerance,
                    |account_id| state.account_info(account_id),
                )?),
                None => None,
            };

            let mut entry = state
                .entries
                .get(&id)
                .cloned()
                .ok_or(LedgerError::EntryNotFound(id))?;
            if let Some(entry_date) = request.entry_date {
                entry.entry_date = entry_date;
            }
            if let Some(description) = request.description {
                entry.description = description.trim().to_string();
            }
            if let Some(reference) = request.reference {
                entry.reference = reference;
            }
            if let (Some(lines), Some(totals)) = (request.lines, totals) {
                for line in &entry.lines {
                    state.line_sequence.remove(&line.id);
                }
                entry.replace_lines(lines, totals);
                state.assign_line_sequences(&entry.lines);
            }
            entry.audit.updated_at = Utc::now();

            state.entries.insert(id, entry.clone());
            info!(
                entry_id = %id,
                updated_by = ?request.updated_by.map(|a| a.to_string()),
                "Journal entry updated"
            );
            Ok(entry)
        })
    }

    /// Deletes a draft entry.
    ///
    /// # Errors
    ///
    /// Returns `CanOnlyDeleteDraft` for posted or voided entries.
    pub fn delete_draft(&self, id: JournalEntryId) -> Result<(), LedgerError> {
        self.store.transaction(|state| {
            let entry = state.entries.get(&id).ok_or(LedgerError::EntryNotFound(id))?;
            LedgerService::validate_can_delete(entry.status)?;

            if let Some(entry) = state.entries.remove(&id) {
                for line in &entry.lines {
                    state.line_sequence.remove(&line.id);
                }
            }
            info!(entry_id = %id, "Draft journal entry deleted");
            Ok(())
        })
    }

    /// Posts a draft entry and moves account balances.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the entry is a draft, and
    /// `BalanceOverflow` if a balance would overflow (nothing is applied).
    pub fn post(&self, request: PostRequest) -> Result<JournalEntry, LedgerError> {
        self.store
            .transaction(|state| post_entry(state, request.entry_id, request.actor, Utc::now()))
            .inspect_err(|err| warn!(entry_id = %request.entry_id, error = %err, "Rejected post"))
    }

    /// Voids a posted entry and reverses its balance changes.
    ///
    /// # Errors
    ///
    /// Returns `VoidReasonRequired` for a blank reason and
    /// `InvalidTransition` unless the entry is posted.
    pub fn void(&self, request: VoidRequest) -> Result<JournalEntry, LedgerError> {
        self.store
            .transaction(|state| void_entry(state, request.entry_id, request.actor, &request.reason, Utc::now()))
            .inspect_err(|err| warn!(entry_id = %request.entry_id, error = %err, "Rejected void"))
    }

    /// Gets an entry by id.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` for an unknown id.
    pub fn get(&self, id: JournalEntryId) -> Result<JournalEntry, LedgerError> {
        self.store.read(|state| {
            state
                .entries
                .get(&id)
                .cloned()
                .ok_or(LedgerError::EntryNotFound(id))
        })
    }

    /// Gets an entry by its number.
    ///
    /// # Errors
    ///
    /// Returns `EntryNumberNotFound` for an unknown number.
    pub fn find_by_number(&self, entry_number: &str) -> Result<JournalEntry, LedgerError> {
        self.store.read(|state| {
            state
                .entries
                .values()
                .find(|e| e.entry_number == entry_number)
                .cloned()
                .ok_or_else(|| LedgerError::EntryNumberNotFound(entry_number.to_string()))
        })
    }

    /// Lists entries by date and number.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn list(&self, filter: &EntryFilter, page: &PageRequest) -> Result<PageResponse<JournalEntry>, LedgerError> {
        self.store.read(|state| {
            let mut entries: Vec<JournalEntry> = state
                .entries
                .values()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect();
            entries.sort_by(|a, b| {
                a.entry_date
                    .cmp(&b.entry_date)
                    .then_with(|| a.entry_number.cmp(&b.entry_number))
            });
            debug!(total = entries.len(), page = page.page, "Listed journal entries");
            Ok(PageResponse::paginate(entries, page))
        })
    }
}

/// Validates and inserts a draft entry inside an open transaction.
pub(crate) fn insert_draft(
    state: &mut LedgerState,
    config: &LedgerConfig,
    request: CreateEntryRequest,
    now: DateTime<Utc>,
) -> Result<JournalEntry, LedgerError> {
    let totals = LedgerService::validate_lines(&request.lines, config.balance_tolerance, |id| {
        state.account_info(id)
    })?;

    let id = JournalEntryId::new();
    let entry_number = state.next_entry_number(&config.entry_number_prefix);
    let lines = JournalLine::from_inputs(id, request.lines);
    state.assign_line_sequences(&lines);

    let entry = JournalEntry {
        id,
        entry_number,
        entry_date: request.entry_date,
        description: request.description.trim().to_string(),
        reference: request.reference,
        status: JournalStatus::Draft,
        total_debit: totals.total_debit,
        total_credit: totals.total_credit,
        lines,
        audit: EntryAudit::created(request.created_by, now),
    };
    state.entries.insert(id, entry.clone());

    info!(
        entry_id = %entry.id,
        entry_number = %entry.entry_number,
        total = %entry.total_debit,
        created_by = %entry.audit.created_by,
        "Journal entry created"
    );
    Ok(entry)
}

/// Posts a draft inside an open transaction.
pub(crate) fn post_entry(
    state: &mut LedgerState,
    id: JournalEntryId,
    actor: Actor,
    now: DateTime<Utc>,
) -> Result<JournalEntry, LedgerError> {
    let entry = state.entries.get(&id).ok_or(LedgerError::EntryNotFound(id))?;
    let action = JournalWorkflow::post(entry.status, actor)?;
    let deltas = posting_deltas(&entry.lines, |account_id| state.account_type(account_id))?;

    state.apply_deltas(&deltas, now)?;
    let entry = state.entries.get_mut(&id).ok_or(LedgerError::EntryNotFound(id))?;
    action.apply_to(entry);

    info!(
        entry_id = %id,
        entry_number = %entry.entry_number,
        accounts = deltas.len(),
        posted_by = %actor,
        "Journal entry posted"
    );
    Ok(entry.clone())
}

/// Voids a posted entry inside an open transaction.
pub(crate) fn void_entry(
    state: &mut LedgerState,
    id: JournalEntryId,
    actor: Actor,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<JournalEntry, LedgerError> {
    let entry = state.entries.get(&id).ok_or(LedgerError::EntryNotFound(id))?;
    let action = JournalWorkflow::void(entry.status, actor, reason)?;
    let deltas = void_deltas(&entry.lines, |account_id| state.account_type(account_id))?;

    state.apply_deltas(&deltas, now)?;
    let entry = state.entries.get_mut(&id).ok_or(LedgerError::EntryNotFound(id))?;
    action.apply_to(entry);

    info!(
        entry_id = %id,
        entry_number = %entry.entry_number,
        voided_by = %actor,
        "Journal entry voided"
    );
    Ok(entry.clone())
}
