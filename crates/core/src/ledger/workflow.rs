//! Journal entry lifecycle state machine.
//!
//! Draft → Posted → Void. There is no path back to Draft and Void is terminal.

use chrono::{DateTime, Utc};
use estate_shared::types::Actor;

use super::entry::JournalEntry;
use super::error::LedgerError;
use super::types::JournalStatus;

/// A validated status transition with its audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalAction {
    /// Draft → Posted.
    Post {
        /// Status after the transition.
        new_status: JournalStatus,
        /// Who posted.
        posted_by: Actor,
        /// When.
        posted_at: DateTime<Utc>,
    },
    /// Posted → Void.
    Void {
        /// Status after the transition.
        new_status: JournalStatus,
        /// Who voided.
        voided_by: Actor,
        /// When.
        voided_at: DateTime<Utc>,
        /// Why.
        void_reason: String,
    },
}

impl JournalAction {
    /// Returns the status after this action.
    #[must_use]
    pub const fn new_status(&self) -> JournalStatus {
        match self {
            Self::Post { new_status, .. } | Self::Void { new_status, .. } => *new_status,
        }
    }

    /// Writes the transition into the entry's status and audit trail.
    pub fn apply_to(self, entry: &mut JournalEntry) {
        match self {
            Self::Post {
                new_status,
                posted_by,
                posted_at,
            } => {
                entry.status = new_status;
                entry.audit.posted_by = Some(posted_by);
                entry.audit.posted_at = Some(posted_at);
            }
            Self::Void {
                new_status,
                voided_by,
                voided_at,
                void_reason,
            } => {
                entry.status = new_status;
                entry.audit.voided_by = Some(voided_by);
                entry.audit.voided_at = Some(voided_at);
                entry.audit.void_reason = Some(void_reason);
            }
        }
    }
}

/// Stateless validator for journal status transitions.
pub struct JournalWorkflow;

impl JournalWorkflow {
    /// Posts a draft entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the entry is a draft.
    pub fn post(current_status: JournalStatus, posted_by: Actor) -> Result<JournalAction, LedgerError> {
        match current_status {
            JournalStatus::Draft => Ok(JournalAction::Post {
                new_status: JournalStatus::Posted,
                posted_by,
                posted_at: Utc::now(),
            }),
            _ => Err(LedgerError::InvalidTransition {
                from: current_status,
                to: JournalStatus::Posted,
            }),
        }
    }

    /// Voids a posted entry.
    ///
    /// # Errors
    ///
    /// Returns `VoidReasonRequired` for a blank reason and
    /// `InvalidTransition` unless the entry is posted.
    pub fn void(
        current_status: JournalStatus,
        voided_by: Actor,
        void_reason: &str,
    ) -> Result<JournalAction, LedgerError> {
        let void_reason = void_reason.trim();
        if void_reason.is_empty() {
            return Err(LedgerError::VoidReasonRequired);
        }

        match current_status {
            JournalStatus::Posted => Ok(JournalAction::Void {
                new_status: JournalStatus::Void,
                voided_by,
                voided_at: Utc::now(),
                void_reason: void_reason.to_string(),
            }),
            _ => Err(LedgerError::InvalidTransition {
                from: current_status,
                to: JournalStatus::Void,
            }),
        }
    }

    /// Ensures the entry is still a draft.
    ///
    /// # Errors
    ///
    /// Returns `CannotModifyPosted` or `CannotModifyVoided`.
    pub const fn ensure_editable(current_status: JournalStatus) -> Result<(), LedgerError> {
        super::service::LedgerService::validate_can_modify(current_status)
    }

    /// Checks whether a status transition is allowed.
    #[must_use]
    pub const fn is_valid_transition(from: JournalStatus, to: JournalStatus) -> bool {
        matches!(
            (from, to),
            (JournalStatus::Draft, JournalStatus::Posted) | (JournalStatus::Posted, JournalStatus::Void)
        )
    }
}
