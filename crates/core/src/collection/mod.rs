//! Payment collection.
//!
//! When a payment is confirmed its effect cascades through four layers:
//! the booking's schedule entry, the flat plan milestone, the plan totals,
//! and the booking itself. The functions here are the pure steps; the
//! store runs them inside one transaction and posts the balancing journal
//! entry.

pub mod allocation;
pub mod error;
pub mod types;

#[cfg(test)]
mod allocation_props;

pub use allocation::{
    allocate, apply_payment, apply_to_booking, complete, mirror_to_plan, select_target, trigger_milestone,
    validate_amount,
};
pub use error::CollectionError;
pub use types::{
    BankAccount, Booking, BookingStatus, CascadeOutcome, CascadeSkip, FlatPaymentPlan, Milestone,
    MilestoneApplication, MilestoneStatus, Payment, PaymentMethod, PaymentStatus, PlanStatus,
    RecordPaymentRequest, ScheduleApplication,
};
