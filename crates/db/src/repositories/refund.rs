//! Refund repository.

use chrono::{NaiveDate, Utc};
use estate_core::collection::PaymentStatus;
use estate_core::ledger::{CreateEntryRequest, EntryReference, JournalLineInput, LedgerError, ReferenceKind};
use estate_core::refund::{CreateRefundRequest, PaymentRefund, RefundError, RefundRules};
use estate_shared::config::{CollectionConfig, LedgerConfig};
use estate_shared::types::{Actor, JournalEntryId, PaymentId, RefundId};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::collection::account_id_for;
use super::journal::{insert_draft, post_entry};
use crate::store::{LedgerState, Store};

/// Result of processing a refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedRefund {
    /// The refund after processing.
    pub refund: PaymentRefund,
    /// Whether processed refunds now cover the whole payment.
    pub payment_refunded: bool,
    /// Reversing journal entry, if one was posted.
    pub journal_entry_id: Option<JournalEntryId>,
}

/// Refund repository.
#[derive(Debug, Clone)]
pub struct RefundRepository {
    store: Store,
    ledger: LedgerConfig,
    config: CollectionConfig,
}

impl RefundRepository {
    /// Creates a new refund repository.
    #[must_use]
    pub const fn new(store: Store, ledger: LedgerConfig, config: CollectionConfig) -> Self {
        Self { store, ledger, config }
    }

    /// Requests a refund.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound`, `PaymentNotCompleted`, `InvalidAmount`,
    /// `ReasonRequired` or `ExceedsPayment`.
    pub fn create(&self, request: CreateRefundRequest) -> Result<PaymentRefund, RefundError> {
        self.store
            .transaction(|state| {
                let payment = state
                    .payments
                    .get(&request.payment_id)
                    .ok_or(RefundError::PaymentNotFound(request.payment_id))?;
                let existing = refunds_for(state, payment.id);
                let refund = RefundRules::create(payment, &existing, request, Utc::now())?;

                state.refunds.insert(refund.id, refund.clone());
                info!(
                    refund_id = %refund.id,
                    payment_id = %refund.payment_id,
                    amount = %refund.amount,
                    requested_by = %refund.requested_by,
                    "Refund requested"
                );
                Ok(refund)
            })
            .inspect_err(|err| warn!(error = %err, "Refund request rejected"))
    }

    /// Approves a pending refund.
    ///
    /// # Errors
    ///
    /// Returns `RefundNotFound` or `InvalidTransition`.
    pub fn approve(&self, refund_id: RefundId, actor: Actor) -> Result<PaymentRefund, RefundError> {
        self.store.transaction(|state| {
            let refund = refund_mut(state, refund_id)?;
            RefundRules::approve(refund, actor, Utc::now())?;
            info!(refund_id = %refund_id, approved_by = %actor, "Refund approved");
            Ok(refund.clone())
        })
    }

    /// Rejects a pending refund, freeing its amount under the cap.
    ///
    /// # Errors
    ///
    /// Returns `RefundNotFound`, `RejectionReasonRequired` or
    /// `InvalidTransition`.
    pub fn reject(&self, refund_id: RefundId, reason: &str, actor: Actor) -> Result<PaymentRefund, RefundError> {
        self.store.transaction(|state| {
            let refund = refund_mut(state, refund_id)?;
            RefundRules::reject(refund, reason, actor, Utc::now())?;
            info!(refund_id = %refund_id, rejected_by = %actor, "Refund rejected");
            Ok(refund.clone())
        })
    }

    /// Pays out an approved refund.
    ///
    /// Once processed refunds cover the payment, the payment becomes
    /// Refunded. With journal posting on, a reversing entry (Dr customer
    /// advances / Cr cash) is posted in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RefundNotFound`, `InvalidTransition`, or a ledger error from
    /// the reversing entry. Nothing is changed on error.
    pub fn process(&self, refund_id: RefundId, actor: Actor) -> Result<ProcessedRefund, RefundError> {
        self.store.transaction(|state| {
            let now = Utc::now();
            let refund = refund_mut(state, refund_id)?;
            RefundRules::process(refund, actor, now)?;
            let refund = refund.clone();

            let payment = state
                .payments
                .get(&refund.payment_id)
                .ok_or(RefundError::PaymentNotFound(refund.payment_id))?;
            let payment_refunded = RefundRules::fully_refunded(payment, &refunds_for(state, payment.id));
            if payment_refunded {
                if let Some(payment) = state.payments.get_mut(&refund.payment_id) {
                    payment.status = PaymentStatus::Refunded;
                }
                info!(payment_id = %refund.payment_id, "Payment fully refunded");
            }

            let journal_entry_id = if self.config.post_journal {
                Some(self.post_reversal(state, &refund, now.date_naive(), actor)?)
            } else {
                None
            };

            info!(
                refund_id = %refund_id,
                payment_id = %refund.payment_id,
                processed_by = %actor,
                "Refund processed"
            );
            Ok(ProcessedRefund {
                refund,
                payment_refunded,
                journal_entry_id,
            })
        })
    }

    fn post_reversal(
        &self,
        state: &mut LedgerState,
        refund: &PaymentRefund,
        entry_date: NaiveDate,
        actor: Actor,
    ) -> Result<JournalEntryId, LedgerError> {
        let cash = account_id_for(state, &self.config.cash_account_code)?;
        let advances = account_id_for(state, &self.config.receivable_account_code)?;

        let now = Utc::now();
        let entry = insert_draft(
            state,
            &self.ledger,
            CreateEntryRequest {
                entry_date,
                description: format!("Refund: {}", refund.reason),
                reference: Some(EntryReference::new(ReferenceKind::Refund, refund.id.into_inner())),
                lines: vec![
                    JournalLineInput::debit(advances, refund.amount),
                    JournalLineInput::credit(cash, refund.amount),
                ],
                created_by: actor,
            },
            now,
        )?;
        post_entry(state, entry.id, actor, now)?;
        Ok(entry.id)
    }

    /// Lists the refunds of a payment, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn list_for_payment(&self, payment_id: PaymentId) -> Result<Vec<PaymentRefund>, RefundError> {
        self.store.read(|state| {
            let refunds = refunds_for(state, payment_id);
            debug!(payment_id = %payment_id, count = refunds.len(), "Listed refunds");
            Ok(refunds)
        })
    }
}

fn refunds_for(state: &LedgerState, payment_id: PaymentId) -> Vec<PaymentRefund> {
    let mut refunds: Vec<PaymentRefund> = state
        .refunds
        .values()
        .filter(|r| r.payment_id == payment_id)
        .cloned()
        .collect();
    refunds.sort_by_key(|r| (r.created_at, r.id));
    refunds
}

fn refund_mut(state: &mut LedgerState, refund_id: RefundId) -> Result<&mut PaymentRefund, RefundError> {
    state
        .refunds
        .get_mut(&refund_id)
        .ok_or(RefundError::RefundNotFound(refund_id))
}
