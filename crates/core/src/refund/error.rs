//! Refund error types.

use estate_shared::types::{PaymentId, RefundId};
use estate_shared::{AppError, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::RefundStatus;
use crate::collection::PaymentStatus;
use crate::ledger::LedgerError;

/// Errors that can occur in the refund workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefundError {
    /// Only completed payments can be refunded.
    #[error("Payment {payment_id} is {status}, only completed payments can be refunded")]
    PaymentNotCompleted {
        /// The payment.
        payment_id: PaymentId,
        /// Its current status.
        status: PaymentStatus,
    },

    /// Amount must be positive.
    #[error("Refund amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// Requested amount would exceed the payment.
    #[error("Refund of {requested} exceeds refundable amount {available}")]
    ExceedsPayment {
        /// Amount requested.
        requested: Decimal,
        /// Payment amount minus existing non-rejected refunds.
        available: Decimal,
    },

    /// Reason must not be blank.
    #[error("Refund reason is required")]
    ReasonRequired,

    /// Rejection needs a reason.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// Refund cannot move to the requested status.
    #[error("Invalid refund status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: RefundStatus,
        /// Requested status.
        to: RefundStatus,
    },

    /// Refund not found.
    #[error("Refund not found: {0}")]
    RefundNotFound(RefundId),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// The reversing journal entry failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Backing store error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RefundError {
    /// Returns the error code for callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::PaymentNotCompleted { .. } => "PAYMENT_NOT_COMPLETED",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::ExceedsPayment { .. } => "REFUND_EXCEEDS_PAYMENT",
            Self::ReasonRequired => "REFUND_REASON_REQUIRED",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::InvalidTransition { .. } => "INVALID_REFUND_TRANSITION",
            Self::RefundNotFound(_) => "REFUND_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::Ledger(err) => err.error_code(),
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PaymentNotCompleted { .. }
            | Self::InvalidAmount(_)
            | Self::ExceedsPayment { .. }
            | Self::ReasonRequired
            | Self::RejectionReasonRequired
            | Self::InvalidTransition { .. } => ErrorKind::Validation,
            Self::RefundNotFound(_) | Self::PaymentNotFound(_) => ErrorKind::NotFound,
            Self::Ledger(err) => err.kind(),
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<RefundError> for AppError {
    fn from(err: RefundError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
