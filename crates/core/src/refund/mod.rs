//! Refund workflow.
//!
//! Refunds are requested against completed payments and bounded by the
//! payment amount across all non-rejected refunds.

pub mod error;
pub mod rules;
pub mod types;

#[cfg(test)]
mod rules_props;

pub use error::RefundError;
pub use rules::RefundRules;
pub use types::{CreateRefundRequest, PaymentRefund, RefundStatus};
