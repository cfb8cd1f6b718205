//! Collection repository: bookings, payments, plans and the completion cascade.
//!
//! Confirming a payment runs the whole cascade in one store transaction:
//! payment status, schedule entry, plan milestone, plan totals, booking and
//! (optionally) a balancing journal entry either all change or none do.

use chrono::Utc;
use estate_core::collection::{
    BankAccount, Booking, CascadeOutcome, CascadeSkip, CollectionError, FlatPaymentPlan, Payment, PaymentStatus,
    PlanStatus, RecordPaymentRequest, allocate, complete, trigger_milestone, validate_amount,
};
use estate_core::ledger::{CreateEntryRequest, EntryReference, JournalLineInput, LedgerError};
use estate_shared::config::{CollectionConfig, LedgerConfig};
use estate_shared::types::{
    AccountId, Actor, BankAccountId, BookingId, FlatId, JournalEntryId, MilestoneId, PaymentId, PaymentPlanId,
};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::journal::{insert_draft, post_entry};
use crate::store::{LedgerState, Store};

/// Collection repository.
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    store: Store,
    ledger: LedgerConfig,
    config: CollectionConfig,
}

impl CollectionRepository {
    /// Creates a new collection repository.
    #[must_use]
    pub const fn new(store: Store, ledger: LedgerConfig, config: CollectionConfig) -> Self {
        Self { store, ledger, config }
    }

    /// Inserts or replaces a booking mirrored from the sales system.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBooking` for a blank number, a non-positive total or
    /// a token outside `0..=total`.
    pub fn upsert_booking(&self, booking: Booking) -> Result<Booking, CollectionError> {
        if booking.booking_number.trim().is_empty() {
            return Err(CollectionError::InvalidBooking("booking number is required".into()));
        }
        if booking.total_amount <= Decimal::ZERO {
            return Err(CollectionError::InvalidBooking("total amount must be positive".into()));
        }
        if booking.token_amount < Decimal::ZERO || booking.token_amount > booking.total_amount {
            return Err(CollectionError::InvalidBooking(
                "token amount must be between zero and the total".into(),
            ));
        }

        self.store.transaction(|state| {
            state.bookings.insert(booking.id, booking.clone());
            info!(booking_id = %booking.id, booking_number = %booking.booking_number, "Booking stored");
            Ok(booking)
        })
    }

    /// Records a Pending payment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a zero or negative amount.
    pub fn record_payment(&self, request: RecordPaymentRequest) -> Result<Payment, CollectionError> {
        validate_amount(request.amount)?;

        self.store.transaction(|state| {
            let payment = Payment {
                id: PaymentId::new(),
                booking_id: request.booking_id,
                amount: request.amount,
                payment_date: request.payment_date,
                method: request.method,
                status: PaymentStatus::Pending,
                reference: request.reference,
            };
            state.payments.insert(payment.id, payment.clone());
            info!(
                payment_id = %payment.id,
                booking_id = ?payment.booking_id.map(|id| id.to_string()),
                amount = %payment.amount,
                "Payment recorded"
            );
            Ok(payment)
        })
    }

    /// Registers a company bank account.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn register_bank_account(
        &self,
        name: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Result<BankAccount, CollectionError> {
        let bank = BankAccount {
            id: BankAccountId::new(),
            name: name.into().trim().to_string(),
            account_number: account_number.into(),
        };
        self.store.transaction(|state| {
            state.bank_accounts.insert(bank.id, bank.clone());
            info!(bank_account_id = %bank.id, name = %bank.name, "Bank account registered");
            Ok(bank)
        })
    }

    /// Creates an active plan whose milestones mirror the booking's schedule.
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound`, `BookingHasNoFlat`, `NoSchedule` or
    /// `PlanAlreadyExists`.
    pub fn create_plan(&self, booking_id: BookingId) -> Result<FlatPaymentPlan, CollectionError> {
        self.store.transaction(|state| {
            let booking = state
                .bookings
                .get(&booking_id)
                .ok_or(CollectionError::BookingNotFound(booking_id))?;
            let flat_id = booking.flat_id.ok_or(CollectionError::BookingHasNoFlat(booking_id))?;
            let schedule = state
                .schedules
                .get(&booking_id)
                .filter(|s| !s.is_empty())
                .ok_or(CollectionError::NoSchedule(booking_id))?;
            if active_plan(state, flat_id, booking_id).is_some() {
                warn!(booking_id = %booking_id, "Rejected duplicate payment plan");
                return Err(CollectionError::PlanAlreadyExists(booking_id));
            }

            let plan_type = state
                .plan_types
                .get(&booking_id)
                .copied()
                .ok_or(CollectionError::NoSchedule(booking_id))?;
            let plan = FlatPaymentPlan::from_schedule(flat_id, booking_id, plan_type, schedule)?;
            state.plans.insert(plan.id, plan.clone());
            info!(
                plan_id = %plan.id,
                booking_id = %booking_id,
                flat_id = %flat_id,
                milestones = plan.milestones.len(),
                "Payment plan created"
            );
            Ok(plan)
        })
    }

    /// Marks a milestone as due after its construction event.
    ///
    /// # Errors
    ///
    /// Returns `PlanNotFound`, `MilestoneNotFound` or
    /// `InvalidMilestoneTransition`.
    pub fn trigger_milestone(
        &self,
        plan_id: PaymentPlanId,
        milestone_id: MilestoneId,
    ) -> Result<FlatPaymentPlan, CollectionError> {
        self.store.transaction(|state| {
            let plan = state
                .plans
                .get_mut(&plan_id)
                .ok_or(CollectionError::PlanNotFound(plan_id))?;
            let milestone = plan
                .milestones
                .iter_mut()
                .find(|m| m.id == milestone_id)
                .ok_or(CollectionError::MilestoneNotFound(milestone_id))?;
            trigger_milestone(milestone, Utc::now())?;
            info!(plan_id = %plan_id, milestone_id = %milestone_id, "Milestone triggered");
            Ok(plan.clone())
        })
    }

    /// Confirms a payment and runs the completion cascade.
    ///
    /// Re-invoking for a processed payment is a no-op reported as
    /// `AlreadyProcessed`. Missing booking, flat, plan or outstanding
    /// obligation skip the affected steps; they are not errors.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound`, `InvalidPaymentTransition`, or a ledger
    /// error from the balancing entry. Nothing is changed on error.
    pub fn complete_payment(&self, payment_id: PaymentId, actor: Actor) -> Result<CascadeOutcome, CollectionError> {
        let outcome = self
            .store
            .transaction(|state| self.run_cascade(state, payment_id, actor))
            .inspect_err(|err| warn!(payment_id = %payment_id, error = %err, "Payment completion rejected"))?;

        for reason in &outcome.skipped {
            info!(payment_id = %payment_id, reason = reason.as_str(), "Cascade step skipped");
        }
        info!(
            payment_id = %payment_id,
            schedule_id = ?outcome.schedule.map(|s| s.schedule_id.to_string()),
            milestone_id = ?outcome.milestone.map(|m| m.milestone_id.to_string()),
            booking_status = ?outcome.booking_status,
            journal_entry_id = ?outcome.journal_entry_id.map(|id| id.to_string()),
            "Payment completion cascade finished"
        );
        Ok(outcome)
    }

    fn run_cascade(
        &self,
        state: &mut LedgerState,
        payment_id: PaymentId,
        actor: Actor,
    ) -> Result<CascadeOutcome, CollectionError> {
        if state.processed_payments.contains(&payment_id) {
            return Ok(CascadeOutcome::skipped(payment_id, CascadeSkip::AlreadyProcessed));
        }
        let mut payment = state
            .payments
            .get(&payment_id)
            .cloned()
            .ok_or(CollectionError::PaymentNotFound(payment_id))?;
        complete(&mut payment)?;
        state.payments.insert(payment_id, payment.clone());
        debug!(payment_id = %payment_id, confirmed_by = %actor, "Payment marked completed");

        let mut outcome = match payment.booking_id {
            None => CascadeOutcome::skipped(payment_id, CascadeSkip::NoBooking),
            Some(booking_id) => match state.bookings.get_mut(&booking_id) {
                None => CascadeOutcome::skipped(payment_id, CascadeSkip::BookingNotFound),
                Some(booking) => {
                    let plan = match booking.flat_id {
                        None => Err(CascadeSkip::NoFlat),
                        Some(flat_id) => state
                            .plans
                            .values_mut()
                            .find(|p| {
                                p.flat_id == flat_id && p.booking_id == booking_id && p.status == PlanStatus::Active
                            })
                            .ok_or(CascadeSkip::NoActivePlan),
                    };
                    let mut no_schedule = Vec::new();
                    let schedules = match state.schedules.get_mut(&booking_id) {
                        Some(schedules) => schedules,
                        None => &mut no_schedule,
                    };
                    allocate(&payment, booking, schedules, plan)?
                }
            },
        };

        if self.config.post_journal {
            let entry_id = self.post_receipt(state, &payment)?;
            outcome.journal_entry_id = Some(entry_id);
        }

        state.processed_payments.insert(payment_id);
        Ok(outcome)
    }

    /// Dr cash / Cr customer advances for a received payment.
    fn post_receipt(&self, state: &mut LedgerState, payment: &Payment) -> Result<JournalEntryId, LedgerError> {
        let cash = account_id_for(state, &self.config.cash_account_code)?;
        let advances = account_id_for(state, &self.config.receivable_account_code)?;
        let description = match &payment.reference {
            Some(reference) => format!("Payment received ({reference})"),
            None => "Payment received".to_string(),
        };

        let now = Utc::now();
        let entry = insert_draft(
            state,
            &self.ledger,
            CreateEntryRequest {
                entry_date: payment.payment_date,
                description,
                reference: Some(EntryReference::payment(payment.id)),
                lines: vec![
                    JournalLineInput::debit(cash, payment.amount),
                    JournalLineInput::credit(advances, payment.amount),
                ],
                created_by: Actor::System,
            },
            now,
        )?;
        post_entry(state, entry.id, Actor::System, now)?;
        Ok(entry.id)
    }

    /// Gets a plan by id.
    ///
    /// # Errors
    ///
    /// Returns `PlanNotFound` for an unknown id.
    pub fn get_plan(&self, plan_id: PaymentPlanId) -> Result<FlatPaymentPlan, CollectionError> {
        self.store.read(|state| {
            state
                .plans
                .get(&plan_id)
                .cloned()
                .ok_or(CollectionError::PlanNotFound(plan_id))
        })
    }

    /// Gets the plan of a booking, if one exists and is not cancelled.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn plan_for_booking(&self, booking_id: BookingId) -> Result<Option<FlatPaymentPlan>, CollectionError> {
        self.store.read(|state| {
            Ok(state
                .plans
                .values()
                .find(|p| p.booking_id == booking_id && p.status != PlanStatus::Cancelled)
                .cloned())
        })
    }

    /// Gets a booking by id.
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound` for an unknown id.
    pub fn get_booking(&self, booking_id: BookingId) -> Result<Booking, CollectionError> {
        self.store.read(|state| {
            state
                .bookings
                .get(&booking_id)
                .cloned()
                .ok_or(CollectionError::BookingNotFound(booking_id))
        })
    }

    /// Gets a payment by id.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` for an unknown id.
    pub fn get_payment(&self, payment_id: PaymentId) -> Result<Payment, CollectionError> {
        self.store.read(|state| {
            state
                .payments
                .get(&payment_id)
                .cloned()
                .ok_or(CollectionError::PaymentNotFound(payment_id))
        })
    }
}

fn active_plan(
    state: &LedgerState,
    flat_id: FlatId,
    booking_id: BookingId,
) -> Option<&FlatPaymentPlan> {
    state
        .plans
        .values()
        .find(|p| p.flat_id == flat_id && p.booking_id == booking_id && p.status == PlanStatus::Active)
}

pub(crate) fn account_id_for(state: &LedgerState, code: &str) -> Result<AccountId, LedgerError> {
    state
        .account_by_code(code)
        .map(|a| a.id)
        .ok_or_else(|| LedgerError::AccountCodeNotFound(code.to_string()))
}
