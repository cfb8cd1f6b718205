//! Refund records.

use chrono::{DateTime, Utc};
use estate_shared::types::{Actor, PaymentId, RefundId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Refund status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefundStatus {
    /// Requested.
    Pending,
    /// Approved, awaiting payout.
    Approved,
    /// Paid out.
    Processed,
    /// Rejected. Does not count toward the cap.
    Rejected,
}

impl RefundStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Processed => "processed",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true if the refund counts toward the payment's refund cap.
    #[must_use]
    pub const fn counts_toward_cap(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

impl fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A refund against a completed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRefund {
    /// Unique identifier.
    pub id: RefundId,
    /// The refunded payment.
    pub payment_id: PaymentId,
    /// Amount to refund.
    pub amount: Decimal,
    /// Why the customer is refunded.
    pub reason: String,
    /// Status.
    pub status: RefundStatus,
    /// Who requested it.
    pub requested_by: Actor,
    /// Who approved it.
    pub approved_by: Option<Actor>,
    /// Who paid it out.
    pub processed_by: Option<Actor>,
    /// Who rejected it.
    pub rejected_by: Option<Actor>,
    /// Why it was rejected.
    pub rejection_reason: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

/// Input for requesting a refund.
#[derive(Debug, Clone)]
pub struct CreateRefundRequest {
    /// The payment to refund.
    pub payment_id: PaymentId,
    /// Amount.
    pub amount: Decimal,
    /// Reason.
    pub reason: String,
    /// Requester.
    pub requested_by: Actor,
}
