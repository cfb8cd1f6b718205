//! Payment completion cascade.
//!
//! A confirmed payment flows schedule → milestone → plan → booking:
//!
//! 1. [`select_target`] picks one schedule entry: a triggered (or part-paid)
//!    milestone's entry first, else the first outstanding entry.
//! 2. [`apply_payment`] applies at most the entry's balance.
//! 3. [`mirror_to_plan`] copies the result onto the matching milestone and
//!    recomputes plan totals.
//! 4. [`apply_to_booking`] adds the full payment to the booking.
//!
//! A payment is applied to a single schedule entry. Any excess over that
//! entry's balance still counts toward the booking but does not spill into
//! the next obligation.

use chrono::{DateTime, Utc};
use estate_shared::types::ScheduleId;
use rust_decimal::Decimal;

use super::error::CollectionError;
use super::types::{
    Booking, BookingStatus, CascadeOutcome, CascadeSkip, FlatPaymentPlan, Milestone, MilestoneApplication,
    MilestoneStatus, Payment, PaymentStatus, ScheduleApplication,
};
use crate::schedule::{ScheduleEntry, ScheduleStatus};

/// Picks the schedule entry a payment should settle.
///
/// Tier 1: the lowest-sequence milestone that accepts payment (Triggered or
/// Partial) and whose linked entry is still outstanding.
/// Tier 2: the lowest-sequence outstanding entry.
#[must_use]
pub fn select_target(schedules: &[ScheduleEntry], plan: Option<&FlatPaymentPlan>) -> Option<ScheduleId> {
    let outstanding = |id: ScheduleId| {
        schedules
            .iter()
            .any(|s| s.id == id && s.status.is_outstanding())
    };

    let triggered = plan.and_then(|plan| {
        let mut milestones: Vec<&Milestone> = plan
            .milestones
            .iter()
            .filter(|m| m.status.accepts_payment())
            .collect();
        milestones.sort_by_key(|m| m.sequence);
        milestones
            .into_iter()
            .filter_map(|m| m.schedule_id)
            .find(|id| outstanding(*id))
    });

    triggered.or_else(|| {
        schedules
            .iter()
            .filter(|s| s.status.is_outstanding())
            .min_by_key(|s| s.sequence)
            .map(|s| s.id)
    })
}

/// Applies a payment to one schedule entry.
///
/// `applied = min(payment.amount, amount - paid_amount)`. The entry becomes
/// Paid, stamped with the payment and its date, once nothing is owed;
/// otherwise Partial.
pub fn apply_payment(schedule: &mut ScheduleEntry, payment: &Payment) -> ScheduleApplication {
    let applied = payment.amount.min(schedule.balance());
    schedule.paid_amount += applied;

    if schedule.amount - schedule.paid_amount <= Decimal::ZERO {
        schedule.status = ScheduleStatus::Paid;
        schedule.payment_id = Some(payment.id);
        schedule.paid_date = Some(payment.payment_date);
    } else {
        schedule.status = ScheduleStatus::Partial;
    }

    ScheduleApplication {
        schedule_id: schedule.id,
        applied,
        status: schedule.status,
    }
}

/// Mirrors a schedule entry's payment state onto the plan.
///
/// The milestone is matched by schedule link, then by name, then by
/// sequence. Returns `None` if no milestone matches.
///
/// # Errors
///
/// Returns `AmountOverflow` if the plan totals cannot be recomputed.
pub fn mirror_to_plan(
    plan: &mut FlatPaymentPlan,
    schedule: &ScheduleEntry,
) -> Result<Option<MilestoneApplication>, CollectionError> {
    let Some(index) = plan
        .milestones
        .iter()
        .position(|m| m.schedule_id == Some(schedule.id))
        .or_else(|| plan.milestones.iter().position(|m| m.name == schedule.label))
        .or_else(|| plan.milestones.iter().position(|m| m.sequence == schedule.sequence))
    else {
        return Ok(None);
    };

    let milestone = &mut plan.milestones[index];
    milestone.paid_amount = schedule.paid_amount;
    milestone.status = match schedule.status {
        ScheduleStatus::Paid => MilestoneStatus::Paid,
        ScheduleStatus::Waived => MilestoneStatus::Waived,
        ScheduleStatus::Pending | ScheduleStatus::Partial | ScheduleStatus::Overdue => MilestoneStatus::Partial,
    };
    if milestone.status == MilestoneStatus::Paid {
        milestone.payment_id = schedule.payment_id;
        milestone.paid_date = schedule.paid_date;
    }
    let milestone_id = milestone.id;
    let status = milestone.status;

    plan.recompute_totals()?;

    Ok(Some(MilestoneApplication {
        plan_id: plan.id,
        milestone_id,
        status,
        plan_status: plan.status,
    }))
}

/// Adds a payment to the booking, completing it once nothing is owed.
///
/// # Errors
///
/// Returns `AmountOverflow` if the new paid amount is not representable;
/// the booking is left unchanged.
pub fn apply_to_booking(booking: &mut Booking, amount: Decimal) -> Result<BookingStatus, CollectionError> {
    booking.paid_amount = booking
        .paid_amount
        .checked_add(amount)
        .ok_or(CollectionError::AmountOverflow(booking.id))?;
    if booking.total_amount - booking.paid_amount <= Decimal::ZERO {
        booking.status = BookingStatus::Completed;
    }
    Ok(booking.status)
}

/// Marks a milestone as triggered by a construction event.
///
/// # Errors
///
/// Returns `InvalidMilestoneTransition` unless the milestone is Pending.
pub fn trigger_milestone(milestone: &mut Milestone, now: DateTime<Utc>) -> Result<(), CollectionError> {
    if milestone.status != MilestoneStatus::Pending {
        return Err(CollectionError::InvalidMilestoneTransition {
            from: milestone.status,
            to: MilestoneStatus::Triggered,
        });
    }
    milestone.status = MilestoneStatus::Triggered;
    milestone.triggered_at = Some(now);
    Ok(())
}

/// Validates a payment amount.
///
/// # Errors
///
/// Returns `InvalidAmount` for zero or negative amounts.
pub fn validate_amount(amount: Decimal) -> Result<(), CollectionError> {
    if amount <= Decimal::ZERO {
        return Err(CollectionError::InvalidAmount(amount));
    }
    Ok(())
}

/// Moves a payment into Completed.
///
/// Returns `false` when the payment is already Completed, so the caller can
/// decide whether the cascade already ran.
///
/// # Errors
///
/// Returns `InvalidPaymentTransition` from Failed, Cancelled or Refunded.
pub fn complete(payment: &mut Payment) -> Result<bool, CollectionError> {
    match payment.status {
        PaymentStatus::Pending => {
            payment.status = PaymentStatus::Completed;
            Ok(true)
        }
        PaymentStatus::Completed => Ok(false),
        from @ (PaymentStatus::Failed | PaymentStatus::Cancelled | PaymentStatus::Refunded) => {
            Err(CollectionError::InvalidPaymentTransition {
                from,
                to: PaymentStatus::Completed,
            })
        }
    }
}

/// Runs steps 3–6 of the cascade for a resolved booking.
///
/// `plan` is either the booking's active plan or the reason it could not
/// be resolved. Every skipped step is recorded in the outcome.
///
/// # Errors
///
/// Returns `AmountOverflow` if a running total is not representable. The
/// caller is expected to discard the partially updated records.
pub fn allocate(
    payment: &Payment,
    booking: &mut Booking,
    schedules: &mut [ScheduleEntry],
    plan: Result<&mut FlatPaymentPlan, CascadeSkip>,
) -> Result<CascadeOutcome, CollectionError> {
    let mut outcome = CascadeOutcome::new(payment.id);

    let mut plan = match plan {
        Ok(plan) => Some(plan),
        Err(reason) => {
            outcome.skipped.push(reason);
            None
        }
    };

    let target = select_target(schedules, plan.as_deref());
    match target.and_then(|id| schedules.iter_mut().find(|s| s.id == id)) {
        Some(schedule) => {
            outcome.schedule = Some(apply_payment(schedule, payment));
            if let Some(plan) = plan.as_deref_mut() {
                outcome.milestone = mirror_to_plan(plan, schedule)?;
            }
        }
        None => outcome.skipped.push(CascadeSkip::NoOutstandingSchedule),
    }

    outcome.booking_status = Some(apply_to_booking(booking, payment.amount)?);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use estate_shared::types::{BookingId, FlatId, PaymentId};
    use rust_decimal_macros::dec;

    use crate::collection::types::{PaymentMethod, PlanStatus};
    use crate::schedule::{GenerateScheduleRequest, PlanType, RoundingPolicy, ScheduleGenerator};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn booking(total: Decimal) -> Booking {
        Booking {
            id: BookingId::new(),
            booking_number: "BK-7".to_string(),
            flat_id: Some(FlatId::new()),
            total_amount: total,
            token_amount: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            status: BookingStatus::Confirmed,
        }
    }

    fn payment(booking: &Booking, amount: Decimal) -> Payment {
        Payment {
            id: PaymentId::new(),
            booking_id: Some(booking.id),
            amount,
            payment_date: date(2026, 3, 1),
            method: PaymentMethod::BankTransfer,
            status: PaymentStatus::Completed,
            reference: None,
        }
    }

    fn schedule_for(booking: &Booking, plan_type: PlanType) -> Vec<ScheduleEntry> {
        let request = GenerateScheduleRequest {
            booking_id: booking.id,
            booking_number: booking.booking_number.clone(),
            total_amount: booking.total_amount,
            token_amount: booking.token_amount,
            plan_type,
            start_date: date(2026, 1, 1),
        };
        ScheduleGenerator::generate(&request, RoundingPolicy::None).unwrap()
    }

    fn plan_for(booking: &Booking, plan_type: PlanType, schedules: &[ScheduleEntry]) -> FlatPaymentPlan {
        FlatPaymentPlan::from_schedule(booking.flat_id.unwrap(), booking.id, plan_type, schedules).unwrap()
    }

    #[test]
    fn test_select_prefers_triggered_milestone() {
        let booking = booking(dec!(1000000));
        let schedules = schedule_for(&booking, PlanType::ConstructionLinked);
        let mut plan = plan_for(&booking, PlanType::ConstructionLinked, &schedules);
        trigger_milestone(&mut plan.milestones[2], Utc::now()).unwrap();

        assert_eq!(select_target(&schedules, Some(&plan)), Some(schedules[2].id));
    }

    #[test]
    fn test_select_falls_back_to_first_outstanding() {
        let booking = booking(dec!(1200));
        let mut schedules = schedule_for(&booking, PlanType::TimeLinked);
        schedules[0].status = ScheduleStatus::Paid;
        let plan = plan_for(&booking, PlanType::TimeLinked, &schedules);

        assert_eq!(select_target(&schedules, Some(&plan)), Some(schedules[1].id));
        assert_eq!(select_target(&schedules, None), Some(schedules[1].id));
    }

    #[test]
    fn test_select_ignores_triggered_milestone_with_settled_schedule() {
        let booking = booking(dec!(1000000));
        let mut schedules = schedule_for(&booking, PlanType::ConstructionLinked);
        let mut plan = plan_for(&booking, PlanType::ConstructionLinked, &schedules);
        trigger_milestone(&mut plan.milestones[3], Utc::now()).unwrap();
        schedules[3].status = ScheduleStatus::Waived;

        assert_eq!(select_target(&schedules, Some(&plan)), Some(schedules[0].id));
    }

    #[test]
    fn test_select_none_when_everything_settled() {
        let booking = booking(dec!(1000));
        let mut schedules = schedule_for(&booking, PlanType::DownPayment);
        for s in &mut schedules {
            s.status = ScheduleStatus::Paid;
        }
        assert_eq!(select_target(&schedules, None), None);
    }

    #[test]
    fn test_partial_then_paid() {
        let booking = booking(dec!(50000));
        let mut schedules = schedule_for(&booking, PlanType::DownPayment);
        let entry = &mut schedules[1];
        assert_eq!(entry.amount, dec!(40000));

        let first = apply_payment(entry, &payment(&booking, dec!(30000)));
        assert_eq!(first.applied, dec!(30000));
        assert_eq!(first.status, ScheduleStatus::Partial);
        assert_eq!(entry.payment_id, None);

        let second_payment = payment(&booking, dec!(20000));
        let second = apply_payment(entry, &second_payment);
        assert_eq!(second.applied, dec!(10000));
        assert_eq!(second.status, ScheduleStatus::Paid);
        assert_eq!(entry.paid_amount, dec!(40000));
        assert_eq!(entry.payment_id, Some(second_payment.id));
        assert_eq!(entry.paid_date, Some(date(2026, 3, 1)));
    }

    #[test]
    fn test_mirror_matches_by_name_then_sequence() {
        let booking = booking(dec!(1000));
        let mut schedules = schedule_for(&booking, PlanType::DownPayment);
        let mut plan = plan_for(&booking, PlanType::DownPayment, &schedules);
        for m in &mut plan.milestones {
            m.schedule_id = None;
        }

        apply_payment(&mut schedules[0], &payment(&booking, dec!(200)));
        let applied = mirror_to_plan(&mut plan, &schedules[0]).unwrap().unwrap();
        assert_eq!(applied.milestone_id, plan.milestones[0].id);
        assert_eq!(applied.status, MilestoneStatus::Paid);

        plan.milestones[1].name = "renamed".to_string();
        apply_payment(&mut schedules[1], &payment(&booking, dec!(100)));
        let applied = mirror_to_plan(&mut plan, &schedules[1]).unwrap().unwrap();
        assert_eq!(applied.milestone_id, plan.milestones[1].id);
        assert_eq!(applied.status, MilestoneStatus::Partial);
        assert_eq!(plan.milestones[1].paid_amount, dec!(100));
    }

    #[test]
    fn test_plan_totals_count_only_paid_milestones() {
        let booking = booking(dec!(1000));
        let mut schedules = schedule_for(&booking, PlanType::DownPayment);
        let mut plan = plan_for(&booking, PlanType::DownPayment, &schedules);

        apply_payment(&mut schedules[0], &payment(&booking, dec!(200)));
        mirror_to_plan(&mut plan, &schedules[0]).unwrap();
        apply_payment(&mut schedules[1], &payment(&booking, dec!(500)));
        mirror_to_plan(&mut plan, &schedules[1]).unwrap();

        assert_eq!(plan.paid_amount, dec!(200));
        assert_eq!(plan.balance_amount, dec!(800));
        assert_eq!(plan.status, PlanStatus::Active);

        apply_payment(&mut schedules[1], &payment(&booking, dec!(300)));
        let applied = mirror_to_plan(&mut plan, &schedules[1]).unwrap().unwrap();
        assert_eq!(applied.plan_status, PlanStatus::Completed);
        assert_eq!(plan.balance_amount, Decimal::ZERO);
    }

    #[test]
    fn test_booking_completion() {
        let mut booking = booking(dec!(1000));
        assert_eq!(apply_to_booking(&mut booking, dec!(400)), Ok(BookingStatus::Confirmed));
        assert_eq!(apply_to_booking(&mut booking, dec!(600)), Ok(BookingStatus::Completed));
        assert_eq!(booking.balance(), Decimal::ZERO);
    }

    #[test]
    fn test_booking_paid_amount_overflow() {
        let mut booking = booking(dec!(1000));
        booking.paid_amount = Decimal::MAX;

        assert_eq!(
            apply_to_booking(&mut booking, dec!(1)),
            Err(CollectionError::AmountOverflow(booking.id))
        );
        assert_eq!(booking.paid_amount, Decimal::MAX);
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_trigger_only_from_pending() {
        let booking = booking(dec!(1000000));
        let schedules = schedule_for(&booking, PlanType::ConstructionLinked);
        let mut plan = plan_for(&booking, PlanType::ConstructionLinked, &schedules);

        assert!(trigger_milestone(&mut plan.milestones[0], Utc::now()).is_ok());
        assert!(plan.milestones[0].triggered_at.is_some());
        assert_eq!(
            trigger_milestone(&mut plan.milestones[0], Utc::now()),
            Err(CollectionError::InvalidMilestoneTransition {
                from: MilestoneStatus::Triggered,
                to: MilestoneStatus::Triggered,
            })
        );
    }

    #[test]
    fn test_complete_transitions() {
        let booking = booking(dec!(1000));
        let mut p = payment(&booking, dec!(10));
        p.status = PaymentStatus::Pending;
        assert_eq!(complete(&mut p), Ok(true));
        assert_eq!(p.status, PaymentStatus::Completed);
        assert_eq!(complete(&mut p), Ok(false));

        p.status = PaymentStatus::Refunded;
        assert!(matches!(
            complete(&mut p),
            Err(CollectionError::InvalidPaymentTransition { .. })
        ));
    }

    #[test]
    fn test_allocate_without_plan_still_updates_schedule_and_booking() {
        let mut booking = booking(dec!(1200));
        let mut schedules = schedule_for(&booking, PlanType::TimeLinked);
        let p = payment(&booking, dec!(100));

        let outcome = allocate(&p, &mut booking, &mut schedules, Err(CascadeSkip::NoActivePlan)).unwrap();

        assert!(outcome.was_skipped(CascadeSkip::NoActivePlan));
        assert_eq!(outcome.schedule.map(|s| s.status), Some(ScheduleStatus::Paid));
        assert_eq!(outcome.milestone, None);
        assert_eq!(booking.paid_amount, dec!(100));
    }

    #[test]
    fn test_allocate_overpayment_does_not_spill() {
        let mut booking = booking(dec!(1200));
        let mut schedules = schedule_for(&booking, PlanType::TimeLinked);
        let mut plan = plan_for(&booking, PlanType::TimeLinked, &schedules);
        let p = payment(&booking, dec!(250));

        let outcome = allocate(&p, &mut booking, &mut schedules, Ok(&mut plan)).unwrap();

        assert_eq!(outcome.schedule.map(|s| s.applied), Some(dec!(100)));
        assert_eq!(schedules[1].status, ScheduleStatus::Pending);
        assert_eq!(booking.paid_amount, dec!(250));
        assert_eq!(outcome.milestone.map(|m| m.status), Some(MilestoneStatus::Paid));
    }

    #[test]
    fn test_allocate_nothing_outstanding() {
        let mut booking = booking(dec!(1000));
        let mut schedules: Vec<ScheduleEntry> = Vec::new();
        let p = payment(&booking, dec!(100));

        let outcome = allocate(&p, &mut booking, &mut schedules, Err(CascadeSkip::NoFlat)).unwrap();
        assert_eq!(
            outcome.skipped,
            vec![CascadeSkip::NoFlat, CascadeSkip::NoOutstandingSchedule]
        );
        assert_eq!(outcome.booking_status, Some(BookingStatus::Confirmed));
    }
}
