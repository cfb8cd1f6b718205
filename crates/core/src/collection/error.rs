//! Collection (payment cascade) error types.

use estate_shared::types::{BookingId, MilestoneId, PaymentId, PaymentPlanId};
use estate_shared::{AppError, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{MilestoneStatus, PaymentStatus};
use crate::ledger::LedgerError;

/// Errors that can occur while recording or confirming payments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// Amount must be positive.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// Booking data is invalid.
    #[error("Invalid booking: {0}")]
    InvalidBooking(String),

    /// Payment cannot move to the requested status.
    #[error("Invalid payment status transition from {from} to {to}")]
    InvalidPaymentTransition {
        /// Current status.
        from: PaymentStatus,
        /// Requested status.
        to: PaymentStatus,
    },

    /// Milestone cannot move to the requested status.
    #[error("Invalid milestone status transition from {from} to {to}")]
    InvalidMilestoneTransition {
        /// Current status.
        from: MilestoneStatus,
        /// Requested status.
        to: MilestoneStatus,
    },

    /// Booking has no flat assigned, so no plan can be created.
    #[error("Booking {0} has no flat assigned")]
    BookingHasNoFlat(BookingId),

    /// Booking has no schedule to build a plan from.
    #[error("Booking {0} has no payment schedule")]
    NoSchedule(BookingId),

    /// An active plan already exists for the flat and booking.
    #[error("An active payment plan already exists for booking {0}")]
    PlanAlreadyExists(BookingId),

    /// Booking not found.
    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// Plan not found.
    #[error("Payment plan not found: {0}")]
    PlanNotFound(PaymentPlanId),

    /// Milestone not found.
    #[error("Milestone not found: {0}")]
    MilestoneNotFound(MilestoneId),

    /// A running total of the booking or its plan is not representable.
    #[error("Amount overflow while applying payment to booking {0}")]
    AmountOverflow(BookingId),

    /// The balancing journal entry failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Backing store error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CollectionError {
    /// Returns the error code for callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidBooking(_) => "INVALID_BOOKING",
            Self::InvalidPaymentTransition { .. } => "INVALID_PAYMENT_TRANSITION",
            Self::InvalidMilestoneTransition { .. } => "INVALID_MILESTONE_TRANSITION",
            Self::BookingHasNoFlat(_) => "BOOKING_HAS_NO_FLAT",
            Self::NoSchedule(_) => "NO_SCHEDULE",
            Self::PlanAlreadyExists(_) => "PLAN_ALREADY_EXISTS",
            Self::BookingNotFound(_) => "BOOKING_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::PlanNotFound(_) => "PLAN_NOT_FOUND",
            Self::MilestoneNotFound(_) => "MILESTONE_NOT_FOUND",
            Self::AmountOverflow(_) => "AMOUNT_OVERFLOW",
            Self::Ledger(err) => err.error_code(),
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount(_)
            | Self::InvalidBooking(_)
            | Self::InvalidPaymentTransition { .. }
            | Self::InvalidMilestoneTransition { .. }
            | Self::BookingHasNoFlat(_)
            | Self::NoSchedule(_)
            | Self::AmountOverflow(_) => ErrorKind::Validation,
            Self::PlanAlreadyExists(_) => ErrorKind::Conflict,
            Self::BookingNotFound(_)
            | Self::PaymentNotFound(_)
            | Self::PlanNotFound(_)
            | Self::MilestoneNotFound(_) => ErrorKind::NotFound,
            Self::Ledger(err) => err.kind(),
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<CollectionError> for AppError {
    fn from(err: CollectionError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
