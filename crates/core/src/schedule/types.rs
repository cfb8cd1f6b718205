//! Payment schedule domain types.

use chrono::NaiveDate;
use estate_shared::config::ScheduleRounding;
use estate_shared::types::{BookingId, PaymentId, ScheduleId};
use estate_shared::types::money::outstanding;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a sale is paid off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    /// Seven milestones gated by construction progress.
    ConstructionLinked,
    /// Twelve equal monthly installments.
    TimeLinked,
    /// 20% down, 80% on completion.
    DownPayment,
}

impl PlanType {
    /// Returns the string representation of the plan type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConstructionLinked => "construction_linked",
            Self::TimeLinked => "time_linked",
            Self::DownPayment => "down_payment",
        }
    }

    /// Returns true if milestones wait for an external trigger.
    #[must_use]
    pub const fn is_trigger_gated(self) -> bool {
        matches!(self, Self::ConstructionLinked)
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of one schedule obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    /// Nothing paid yet.
    Pending,
    /// Partly paid.
    Partial,
    /// Fully paid.
    Paid,
    /// Past due and not fully paid.
    Overdue,
    /// Forgiven.
    Waived,
}

impl ScheduleStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Waived => "waived",
        }
    }

    /// Returns true while money is still owed.
    #[must_use]
    pub const fn is_outstanding(self) -> bool {
        matches!(self, Self::Pending | Self::Partial | Self::Overdue)
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One obligation of a booking's payment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Unique identifier.
    pub id: ScheduleId,
    /// Owning booking.
    pub booking_id: BookingId,
    /// 1-based position.
    pub sequence: u32,
    /// Human-readable code, `{bookingNumber}-{seq:03}`.
    pub code: String,
    /// Milestone label or "Installment n".
    pub label: String,
    /// Due date.
    pub due_date: NaiveDate,
    /// Share of the remaining amount, when defined by percentage.
    pub percentage: Option<Decimal>,
    /// Amount owed.
    pub amount: Decimal,
    /// Amount paid so far.
    pub paid_amount: Decimal,
    /// Status.
    pub status: ScheduleStatus,
    /// Payment that settled the obligation.
    pub payment_id: Option<PaymentId>,
    /// Date the obligation was settled.
    pub paid_date: Option<NaiveDate>,
}

impl ScheduleEntry {
    /// Amount still owed, floored at zero.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        outstanding(self.amount, self.paid_amount)
    }
}

/// Input for generating a booking's schedule.
#[derive(Debug, Clone)]
pub struct GenerateScheduleRequest {
    /// The booking.
    pub booking_id: BookingId,
    /// Booking number used in obligation codes.
    pub booking_number: String,
    /// Sale price.
    pub total_amount: Decimal,
    /// Token already received at booking.
    pub token_amount: Decimal,
    /// Plan type.
    pub plan_type: PlanType,
    /// Anchor date for due dates.
    pub start_date: NaiveDate,
}

impl GenerateScheduleRequest {
    /// Amount left to schedule after the token.
    #[must_use]
    pub fn remaining_amount(&self) -> Decimal {
        self.total_amount - self.token_amount
    }
}

/// Residual-cent handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Each obligation is rounded on its own; the sum may drift by a few cents.
    #[default]
    None,
    /// The final obligation absorbs the residual so the sum is exact.
    ReconcileFinal,
}

impl From<ScheduleRounding> for RoundingPolicy {
    fn from(value: ScheduleRounding) -> Self {
        match value {
            ScheduleRounding::None => Self::None,
            ScheduleRounding::ReconcileFinal => Self::ReconcileFinal,
        }
    }
}
