//! Status maintenance of generated obligations outside the payment cascade.

use chrono::NaiveDate;
use estate_shared::types::ScheduleId;

use super::error::ScheduleError;
use super::types::{ScheduleEntry, ScheduleStatus};

/// Flags Pending and Partial obligations due before `as_of` as Overdue.
///
/// Returns the ids that changed. Overdue obligations stay payable.
pub fn mark_overdue<'a>(
    entries: impl IntoIterator<Item = &'a mut ScheduleEntry>,
    as_of: NaiveDate,
) -> Vec<ScheduleId> {
    entries
        .into_iter()
        .filter(|s| matches!(s.status, ScheduleStatus::Pending | ScheduleStatus::Partial) && s.due_date < as_of)
        .map(|s| {
            s.status = ScheduleStatus::Overdue;
            s.id
        })
        .collect()
}

/// Waives an obligation.
///
/// # Errors
///
/// Returns `CannotWaivePaid` for a paid obligation.
pub fn waive(entry: &mut ScheduleEntry) -> Result<(), ScheduleError> {
    if entry.status == ScheduleStatus::Paid {
        return Err(ScheduleError::CannotWaivePaid(entry.id));
    }
    entry.status = ScheduleStatus::Waived;
    Ok(())
}
