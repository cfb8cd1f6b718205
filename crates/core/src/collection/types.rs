//! Bookings, payments and flat payment plans as seen by the cascade.
//!
//! Bookings and payments belong to the surrounding sales system; the cascade
//! only reads them and writes back paid amounts and statuses.

use chrono::{DateTime, NaiveDate, Utc};
use estate_shared::types::money::{checked_sum, outstanding};
use estate_shared::types::{
    BankAccountId, BookingId, FlatId, JournalEntryId, MilestoneId, PaymentId, PaymentPlanId, ScheduleId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::CollectionError;
use crate::schedule::{PlanType, ScheduleEntry, ScheduleStatus};

/// Booking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting confirmation.
    Pending,
    /// Confirmed sale.
    Confirmed,
    /// Fully paid.
    Completed,
    /// Cancelled sale.
    Cancelled,
}

/// A sale booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier.
    pub id: BookingId,
    /// Human-readable number.
    pub booking_number: String,
    /// The flat sold, if assigned.
    pub flat_id: Option<FlatId>,
    /// Sale price.
    pub total_amount: Decimal,
    /// Token received at booking.
    pub token_amount: Decimal,
    /// Total received so far.
    pub paid_amount: Decimal,
    /// Status.
    pub status: BookingStatus,
}

impl Booking {
    /// Amount still owed, floored at zero.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        outstanding(self.total_amount, self.paid_amount)
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Cheque.
    Cheque,
    /// Card.
    Card,
    /// UPI.
    Upi,
    /// Anything else.
    Other,
}

/// Payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Recorded, not yet confirmed.
    Pending,
    /// Money received.
    Completed,
    /// Failed to clear.
    Failed,
    /// Cancelled.
    Cancelled,
    /// Fully refunded.
    Refunded,
}

impl PaymentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A received payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// Booking the payment is for.
    pub booking_id: Option<BookingId>,
    /// Amount received.
    pub amount: Decimal,
    /// Value date.
    pub payment_date: NaiveDate,
    /// Method.
    pub method: PaymentMethod,
    /// Status.
    pub status: PaymentStatus,
    /// External reference (cheque number, UTR …).
    pub reference: Option<String>,
}

/// Input for recording a payment. Payments start Pending.
#[derive(Debug, Clone)]
pub struct RecordPaymentRequest {
    /// Booking the payment is for.
    pub booking_id: Option<BookingId>,
    /// Amount received.
    pub amount: Decimal,
    /// Value date.
    pub payment_date: NaiveDate,
    /// Method.
    pub method: PaymentMethod,
    /// External reference.
    pub reference: Option<String>,
}

/// A company bank account record, used to resolve the bank book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Unique identifier.
    pub id: BankAccountId,
    /// Bank / account name, matched against ledger account names.
    pub name: String,
    /// Account number.
    pub account_number: String,
}

/// Flat payment plan status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Collecting.
    Active,
    /// Every milestone paid.
    Completed,
    /// Abandoned.
    Cancelled,
}

/// Milestone status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneStatus {
    /// Waiting for its trigger.
    Pending,
    /// Construction event reached, payment due.
    Triggered,
    /// Partly paid.
    Partial,
    /// Fully paid.
    Paid,
    /// Forgiven.
    Waived,
}

impl MilestoneStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Triggered => "triggered",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Waived => "waived",
        }
    }

    /// Returns true if the milestone is open for payment.
    #[must_use]
    pub const fn accepts_payment(self) -> bool {
        matches!(self, Self::Triggered | Self::Partial)
    }
}

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One obligation of a flat payment plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Unique identifier.
    pub id: MilestoneId,
    /// Owning plan.
    pub plan_id: PaymentPlanId,
    /// 1-based position.
    pub sequence: u32,
    /// Name, mirrors the schedule label.
    pub name: String,
    /// Linked schedule entry.
    pub schedule_id: Option<ScheduleId>,
    /// Amount owed.
    pub amount: Decimal,
    /// Amount paid so far.
    pub paid_amount: Decimal,
    /// Status.
    pub status: MilestoneStatus,
    /// Payment that settled it.
    pub payment_id: Option<PaymentId>,
    /// Settlement date.
    pub paid_date: Option<NaiveDate>,
    /// When the construction trigger fired.
    pub triggered_at: Option<DateTime<Utc>>,
}

/// Milestone plan for one flat and booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatPaymentPlan {
    /// Unique identifier.
    pub id: PaymentPlanId,
    /// The flat.
    pub flat_id: FlatId,
    /// The booking.
    pub booking_id: BookingId,
    /// Plan type the schedule was generated with.
    pub plan_type: PlanType,
    /// Sum of milestone amounts.
    pub total_amount: Decimal,
    /// Sum of Paid milestone amounts.
    pub paid_amount: Decimal,
    /// `total_amount - paid_amount`.
    pub balance_amount: Decimal,
    /// Status.
    pub status: PlanStatus,
    /// Milestones in sequence order.
    pub milestones: Vec<Milestone>,
}

impl FlatPaymentPlan {
    /// Builds an active plan whose milestones mirror a booking's schedule.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` if the milestone amounts cannot be totalled.
    pub fn from_schedule(
        flat_id: FlatId,
        booking_id: BookingId,
        plan_type: PlanType,
        schedule: &[ScheduleEntry],
    ) -> Result<Self, CollectionError> {
        let id = PaymentPlanId::new();
        let mut entries: Vec<&ScheduleEntry> = schedule.iter().collect();
        entries.sort_by_key(|s| s.sequence);

        let milestones: Vec<Milestone> = entries
            .into_iter()
            .map(|s| Milestone {
                id: MilestoneId::new(),
                plan_id: id,
                sequence: s.sequence,
                name: s.label.clone(),
                schedule_id: Some(s.id),
                amount: s.amount,
                paid_amount: s.paid_amount,
                status: match s.status {
                    ScheduleStatus::Paid => MilestoneStatus::Paid,
                    ScheduleStatus::Waived => MilestoneStatus::Waived,
                    ScheduleStatus::Partial => MilestoneStatus::Partial,
                    ScheduleStatus::Pending | ScheduleStatus::Overdue => MilestoneStatus::Pending,
                },
                payment_id: s.payment_id,
                paid_date: s.paid_date,
                triggered_at: None,
            })
            .collect();

        let mut plan = Self {
            id,
            flat_id,
            booking_id,
            plan_type,
            total_amount: checked_sum(milestones.iter().map(|m| m.amount))
                .ok_or(CollectionError::AmountOverflow(booking_id))?,
            paid_amount: Decimal::ZERO,
            balance_amount: Decimal::ZERO,
            status: PlanStatus::Active,
            milestones,
        };
        plan.recompute_totals()?;
        Ok(plan)
    }

    /// Recomputes paid and balance from Paid milestones and completes the
    /// plan once every milestone is Paid.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` if the paid milestones cannot be totalled.
    pub fn recompute_totals(&mut self) -> Result<(), CollectionError> {
        self.paid_amount = checked_sum(
            self.milestones
                .iter()
                .filter(|m| m.status == MilestoneStatus::Paid)
                .map(|m| m.amount),
        )
        .ok_or(CollectionError::AmountOverflow(self.booking_id))?;
        self.balance_amount = self.total_amount - self.paid_amount;

        let all_paid =
            !self.milestones.is_empty() && self.milestones.iter().all(|m| m.status == MilestoneStatus::Paid);
        if all_paid && self.status == PlanStatus::Active {
            self.status = PlanStatus::Completed;
        }
        Ok(())
    }
}

/// Why a cascade step changed nothing.
///
/// None of these is an error: each is logged as an intentional no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeSkip {
    /// The payment is not linked to a booking.
    NoBooking,
    /// The linked booking does not exist.
    BookingNotFound,
    /// The booking has no flat, so there is no plan to mirror.
    NoFlat,
    /// The flat has no active plan for the booking.
    NoActivePlan,
    /// No schedule entry is still owed.
    NoOutstandingSchedule,
    /// The payment already went through the cascade.
    AlreadyProcessed,
}

impl CascadeSkip {
    /// Returns the string representation of the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoBooking => "no_booking",
            Self::BookingNotFound => "booking_not_found",
            Self::NoFlat => "no_flat",
            Self::NoActivePlan => "no_active_plan",
            Self::NoOutstandingSchedule => "no_outstanding_schedule",
            Self::AlreadyProcessed => "already_processed",
        }
    }
}

impl fmt::Display for CascadeSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the payment did to its schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleApplication {
    /// The entry paid.
    pub schedule_id: ScheduleId,
    /// Amount applied (at most the entry's balance).
    pub applied: Decimal,
    /// Entry status afterwards.
    pub status: ScheduleStatus,
}

/// What the mirror did to the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneApplication {
    /// The plan.
    pub plan_id: PaymentPlanId,
    /// The milestone updated.
    pub milestone_id: MilestoneId,
    /// Milestone status afterwards.
    pub status: MilestoneStatus,
    /// Plan status afterwards.
    pub plan_status: PlanStatus,
}

/// Result of running the cascade for one payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeOutcome {
    /// The payment.
    pub payment_id: PaymentId,
    /// Schedule step, if it ran.
    pub schedule: Option<ScheduleApplication>,
    /// Plan step, if it ran.
    pub milestone: Option<MilestoneApplication>,
    /// Booking status afterwards, if the booking was updated.
    pub booking_status: Option<BookingStatus>,
    /// Balancing journal entry, if one was posted.
    pub journal_entry_id: Option<JournalEntryId>,
    /// Steps that were intentionally skipped.
    pub skipped: Vec<CascadeSkip>,
}

impl CascadeOutcome {
    /// An outcome where nothing has happened yet.
    #[must_use]
    pub const fn new(payment_id: PaymentId) -> Self {
        Self {
            payment_id,
            schedule: None,
            milestone: None,
            booking_status: None,
            journal_entry_id: None,
            skipped: Vec::new(),
        }
    }

    /// An outcome consisting of a single skip.
    #[must_use]
    pub fn skipped(payment_id: PaymentId, reason: CascadeSkip) -> Self {
        let mut outcome = Self::new(payment_id);
        outcome.skipped.push(reason);
        outcome
    }

    /// Returns true if the given step was skipped.
    #[must_use]
    pub fn was_skipped(&self, reason: CascadeSkip) -> bool {
        self.skipped.contains(&reason)
    }
}
