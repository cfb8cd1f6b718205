//! Property-based tests for the refund cap.

use chrono::{NaiveDate, Utc};
use estate_shared::types::{Actor, PaymentId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::rules::RefundRules;
use super::types::{CreateRefundRequest, PaymentRefund, RefundStatus};
use crate::collection::{Payment, PaymentMethod, PaymentStatus};

#[derive(Debug, Clone)]
enum Op {
    Create(i64),
    Approve(usize),
    Reject(usize),
    Process(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..60_000).prop_map(Op::Create),
        (0usize..8).prop_map(Op::Approve),
        (0usize..8).prop_map(Op::Reject),
        (0usize..8).prop_map(Op::Process),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Approved plus processed refunds never exceed the payment, for any
    /// sequence of create/approve/reject/process calls.
    #[test]
    fn prop_refund_cap_holds(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let payment = Payment {
            id: PaymentId::new(),
            booking_id: None,
            amount: Decimal::new(50_000, 2),
            payment_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            method: PaymentMethod::Cash,
            status: PaymentStatus::Completed,
            reference: None,
        };
        let mut refunds: Vec<PaymentRefund> = Vec::new();

        for op in ops {
            let now = Utc::now();
            match op {
                Op::Create(cents) => {
                    let request = CreateRefundRequest {
                        payment_id: payment.id,
                        amount: Decimal::new(cents, 2),
                        reason: "customer request".to_string(),
                        requested_by: Actor::System,
                    };
                    if let Ok(refund) = RefundRules::create(&payment, &refunds, request, now) {
                        refunds.push(refund);
                    }
                }
                Op::Approve(i) => {
                    if let Some(r) = refunds.get_mut(i) {
                        let _ = RefundRules::approve(r, Actor::System, now);
                    }
                }
                Op::Reject(i) => {
                    if let Some(r) = refunds.get_mut(i) {
                        let _ = RefundRules::reject(r, "no", Actor::System, now);
                    }
                }
                Op::Process(i) => {
                    if let Some(r) = refunds.get_mut(i) {
                        let _ = RefundRules::process(r, Actor::System, now);
                    }
                }
            }

            let committed: Decimal = refunds
                .iter()
                .filter(|r| matches!(r.status, RefundStatus::Approved | RefundStatus::Processed))
                .map(|r| r.amount)
                .sum();
            prop_assert!(committed <= payment.amount);
            prop_assert!(RefundRules::refundable(&payment, &refunds) >= Decimal::ZERO);
        }
    }
}
