//! Schedule repository.

use chrono::NaiveDate;
use estate_core::collection::{PlanStatus, mirror_to_plan};
use estate_core::schedule::{
    GenerateScheduleRequest, RoundingPolicy, ScheduleEntry, ScheduleError, ScheduleGenerator, mark_overdue, waive,
};
use estate_shared::types::{BookingId, ScheduleId};
use tracing::{debug, info, warn};

use crate::store::Store;

/// Schedule repository.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    store: Store,
    rounding: RoundingPolicy,
}

impl ScheduleRepository {
    /// Creates a new schedule repository.
    #[must_use]
    pub const fn new(store: Store, rounding: RoundingPolicy) -> Self {
        Self { store, rounding }
    }

    /// Generates and stores a booking's schedule.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyGenerated` if the booking already has a schedule, or a
    /// validation error for the request. Nothing is stored on error.
    pub fn generate(&self, request: &GenerateScheduleRequest) -> Result<Vec<ScheduleEntry>, ScheduleError> {
        self.store.transaction(|state| {
            let existing = state
                .schedules
                .get(&request.booking_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            if let Err(err) = ScheduleGenerator::ensure_not_generated(request.booking_id, existing) {
                warn!(booking_id = %request.booking_id, "Rejected duplicate schedule generation");
                return Err(err);
            }

            let schedule = ScheduleGenerator::generate(request, self.rounding)?;
            state.schedules.insert(request.booking_id, schedule.clone());
            state.plan_types.insert(request.booking_id, request.plan_type);
            info!(
                booking_id = %request.booking_id,
                plan_type = request.plan_type.as_str(),
                obligations = schedule.len(),
                "Payment schedule generated"
            );
            Ok(schedule)
        })
    }

    /// Lists a booking's schedule in sequence order.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn list_for_booking(&self, booking_id: BookingId) -> Result<Vec<ScheduleEntry>, ScheduleError> {
        self.store.read(|state| {
            let schedule = state.schedules.get(&booking_id).cloned().unwrap_or_default();
            debug!(booking_id = %booking_id, obligations = schedule.len(), "Listed schedule");
            Ok(schedule)
        })
    }

    /// Flags every Pending or Partial obligation due before `as_of` as Overdue.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn mark_overdue(&self, as_of: NaiveDate) -> Result<Vec<ScheduleId>, ScheduleError> {
        self.store.transaction(|state| {
            let changed = mark_overdue(state.schedules.values_mut().flatten(), as_of);
            info!(as_of = %as_of, count = changed.len(), "Marked overdue obligations");
            Ok(changed)
        })
    }

    /// Waives an obligation and mirrors it onto the active plan, if any.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleNotFound`, `CannotWaivePaid` or `AmountOverflow`.
    pub fn waive(&self, schedule_id: ScheduleId) -> Result<ScheduleEntry, ScheduleError> {
        self.store.transaction(|state| {
            let entry = state
                .schedules
                .values_mut()
                .flatten()
                .find(|s| s.id == schedule_id)
                .ok_or(ScheduleError::ScheduleNotFound(schedule_id))?;
            waive(entry)?;
            let entry = entry.clone();

            if let Some(plan) = state
                .plans
                .values_mut()
                .find(|p| p.booking_id == entry.booking_id && p.status == PlanStatus::Active)
            {
                mirror_to_plan(plan, &entry).map_err(|_| ScheduleError::AmountOverflow(entry.booking_id))?;
            }
            info!(schedule_id = %schedule_id, booking_id = %entry.booking_id, "Obligation waived");
            Ok(entry)
        })
    }
}
