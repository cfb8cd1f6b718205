//! Property-based tests for the payment cascade.

use chrono::NaiveDate;
use estate_shared::types::{BookingId, FlatId, PaymentId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::allocation::allocate;
use super::types::{Booking, BookingStatus, FlatPaymentPlan, Payment, PaymentMethod, PaymentStatus};
use crate::schedule::{GenerateScheduleRequest, PlanType, RoundingPolicy, ScheduleGenerator};

fn cents(range: std::ops::Range<i64>) -> impl Strategy<Value = Decimal> {
    range.prop_map(|c| Decimal::new(c, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Whatever the payment sequence, schedule entries never exceed their
    /// amount, the booking receives every payment in full, and plan paid
    /// totals equal the sum of Paid milestones.
    #[test]
    fn prop_cascade_conserves_amounts(
        total in cents(100_000..100_000_000),
        payments in prop::collection::vec(cents(1..5_000_000), 1..20),
    ) {
        let mut booking = Booking {
            id: BookingId::new(),
            booking_number: "BK-P".to_string(),
            flat_id: Some(FlatId::new()),
            total_amount: total,
            token_amount: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            status: BookingStatus::Confirmed,
        };
        let request = GenerateScheduleRequest {
            booking_id: booking.id,
            booking_number: booking.booking_number.clone(),
            total_amount: total,
            token_amount: Decimal::ZERO,
            plan_type: PlanType::TimeLinked,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        };
        let mut schedules = ScheduleGenerator::generate(&request, RoundingPolicy::ReconcileFinal).unwrap();
        let mut plan = FlatPaymentPlan::from_schedule(FlatId::new(), booking.id, PlanType::TimeLinked, &schedules).unwrap();

        let mut received = Decimal::ZERO;
        for amount in payments {
            let payment = Payment {
                id: PaymentId::new(),
                booking_id: Some(booking.id),
                amount,
                payment_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                method: PaymentMethod::Cash,
                status: PaymentStatus::Completed,
                reference: None,
            };
            let outcome = allocate(&payment, &mut booking, &mut schedules, Ok(&mut plan)).unwrap();
            received += amount;

            if let Some(applied) = outcome.schedule {
                prop_assert!(applied.applied <= amount);
                prop_assert!(applied.applied > Decimal::ZERO);
            }
        }

        prop_assert_eq!(booking.paid_amount, received);
        for entry in &schedules {
            prop_assert!(entry.paid_amount <= entry.amount);
        }
        prop_assert_eq!(plan.paid_amount + plan.balance_amount, plan.total_amount);
    }
}
