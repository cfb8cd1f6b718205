//! Refund state machine.
//!
//! Pending → Approved → Processed, or Pending → Rejected. The total of all
//! non-rejected refunds for a payment never exceeds the payment amount.

use chrono::{DateTime, Utc};
use estate_shared::types::{Actor, RefundId};
use rust_decimal::Decimal;

use super::error::RefundError;
use super::types::{CreateRefundRequest, PaymentRefund, RefundStatus};
use crate::collection::{Payment, PaymentStatus};

/// Stateless validator for refunds.
pub struct RefundRules;

impl RefundRules {
    /// Amount still refundable: payment amount minus every non-rejected refund.
    #[must_use]
    pub fn refundable(payment: &Payment, existing: &[PaymentRefund]) -> Decimal {
        let committed: Decimal = existing
            .iter()
            .filter(|r| r.payment_id == payment.id && r.status.counts_toward_cap())
            .map(|r| r.amount)
            .sum();
        payment.amount - committed
    }

    /// Validates a new refund request.
    ///
    /// # Errors
    ///
    /// Fails unless the payment is Completed, the amount is positive and
    /// fits under [`Self::refundable`].
    pub fn validate_request(
        payment: &Payment,
        existing: &[PaymentRefund],
        amount: Decimal,
    ) -> Result<(), RefundError> {
        if payment.status != PaymentStatus::Completed {
            return Err(RefundError::PaymentNotCompleted {
                payment_id: payment.id,
                status: payment.status,
            });
        }
        if amount <= Decimal::ZERO {
            return Err(RefundError::InvalidAmount(amount));
        }

        let available = Self::refundable(payment, existing);
        if amount > available {
            return Err(RefundError::ExceedsPayment {
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Builds a Pending refund after validating it.
    ///
    /// # Errors
    ///
    /// See [`Self::validate_request`]; also rejects a blank reason.
    pub fn create(
        payment: &Payment,
        existing: &[PaymentRefund],
        request: CreateRefundRequest,
        now: DateTime<Utc>,
    ) -> Result<PaymentRefund, RefundError> {
        let reason = request.reason.trim();
        if reason.is_empty() {
            return Err(RefundError::ReasonRequired);
        }
        Self::validate_request(payment, existing, request.amount)?;

        Ok(PaymentRefund {
            id: RefundId::new(),
            payment_id: payment.id,
            amount: request.amount,
            reason: reason.to_string(),
            status: RefundStatus::Pending,
            requested_by: request.requested_by,
            approved_by: None,
            processed_by: None,
            rejected_by: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Pending → Approved.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the refund is Pending.
    pub fn approve(refund: &mut PaymentRefund, actor: Actor, now: DateTime<Utc>) -> Result<(), RefundError> {
        Self::transition(refund, RefundStatus::Pending, RefundStatus::Approved)?;
        refund.approved_by = Some(actor);
        refund.updated_at = now;
        Ok(())
    }

    /// Pending → Rejected.
    ///
    /// # Errors
    ///
    /// Returns `RejectionReasonRequired` for a blank reason and
    /// `InvalidTransition` unless the refund is Pending.
    pub fn reject(
        refund: &mut PaymentRefund,
        reason: &str,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> Result<(), RefundError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(RefundError::RejectionReasonRequired);
        }
        Self::transition(refund, RefundStatus::Pending, RefundStatus::Rejected)?;
        refund.rejected_by = Some(actor);
        refund.rejection_reason = Some(reason.to_string());
        refund.updated_at = now;
        Ok(())
    }

    /// Approved → Processed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the refund is Approved.
    pub fn process(refund: &mut PaymentRefund, actor: Actor, now: DateTime<Utc>) -> Result<(), RefundError> {
        Self::transition(refund, RefundStatus::Approved, RefundStatus::Processed)?;
        refund.processed_by = Some(actor);
        refund.updated_at = now;
        Ok(())
    }

    /// Returns true once processed refunds cover the whole payment.
    #[must_use]
    pub fn fully_refunded(payment: &Payment, refunds: &[PaymentRefund]) -> bool {
        let processed: Decimal = refunds
            .iter()
            .filter(|r| r.payment_id == payment.id && r.status == RefundStatus::Processed)
            .map(|r| r.amount)
            .sum();
        processed >= payment.amount
    }

    fn transition(refund: &mut PaymentRefund, from: RefundStatus, to: RefundStatus) -> Result<(), RefundError> {
        if refund.status != from {
            return Err(RefundError::InvalidTransition {
                from: refund.status,
                to,
            });
        }
        refund.status = to;
        Ok(())
    }
}
