//! Schedule error types.

use chrono::NaiveDate;
use estate_shared::types::{BookingId, ScheduleId};
use estate_shared::{AppError, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while generating or maintaining schedules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Total amount must be positive.
    #[error("Total amount must be positive, got {0}")]
    InvalidTotal(Decimal),

    /// Token must be between zero and the total.
    #[error("Token amount {token} must be between 0 and the total {total}")]
    InvalidToken {
        /// Token amount.
        token: Decimal,
        /// Total amount.
        total: Decimal,
    },

    /// Booking number is blank.
    #[error("Booking number is required")]
    MissingBookingNumber,

    /// A due date falls outside the calendar.
    #[error("Due date out of range from start date {0}")]
    DateOutOfRange(NaiveDate),

    /// The booking already has a schedule.
    #[error("Schedule already generated for booking {0}")]
    AlreadyGenerated(BookingId),

    /// A paid obligation cannot be waived.
    #[error("Schedule entry {0} is already paid")]
    CannotWaivePaid(ScheduleId),

    /// Booking not found.
    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    /// Schedule entry not found.
    #[error("Schedule entry not found: {0}")]
    ScheduleNotFound(ScheduleId),

    /// The booking's plan totals could not be recomputed.
    #[error("Amount overflow while updating the plan of booking {0}")]
    AmountOverflow(BookingId),

    /// Backing store error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ScheduleError {
    /// Returns the error code for callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTotal(_) => "INVALID_TOTAL",
            Self::InvalidToken { .. } => "INVALID_TOKEN",
            Self::MissingBookingNumber => "MISSING_BOOKING_NUMBER",
            Self::DateOutOfRange(_) => "DATE_OUT_OF_RANGE",
            Self::AlreadyGenerated(_) => "SCHEDULE_ALREADY_GENERATED",
            Self::CannotWaivePaid(_) => "CANNOT_WAIVE_PAID",
            Self::BookingNotFound(_) => "BOOKING_NOT_FOUND",
            Self::ScheduleNotFound(_) => "SCHEDULE_NOT_FOUND",
            Self::AmountOverflow(_) => "AMOUNT_OVERFLOW",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTotal(_)
            | Self::InvalidToken { .. }
            | Self::MissingBookingNumber
            | Self::DateOutOfRange(_)
            | Self::AlreadyGenerated(_)
            | Self::CannotWaivePaid(_)
            | Self::AmountOverflow(_) => ErrorKind::Validation,
            Self::BookingNotFound(_) | Self::ScheduleNotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
