//! Property-based tests for schedule generation.

use chrono::NaiveDate;
use estate_shared::types::BookingId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::generator::ScheduleGenerator;
use super::types::{GenerateScheduleRequest, PlanType, RoundingPolicy};

fn plan_type_strategy() -> impl Strategy<Value = PlanType> {
    prop_oneof![
        Just(PlanType::ConstructionLinked),
        Just(PlanType::TimeLinked),
        Just(PlanType::DownPayment),
    ]
}

/// (total, token) with 0 <= token <= total, in cents.
fn amounts_strategy() -> impl Strategy<Value = (Decimal, Decimal)> {
    (1i64..10_000_000_000i64)
        .prop_flat_map(|total| (Just(total), 0..=total))
        .prop_map(|(total, token)| (Decimal::new(total, 2), Decimal::new(token, 2)))
}

fn request(plan_type: PlanType, total: Decimal, token: Decimal) -> GenerateScheduleRequest {
    GenerateScheduleRequest {
        booking_id: BookingId::new(),
        booking_number: "BK-P".to_string(),
        total_amount: total,
        token_amount: token,
        plan_type,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Reconciled schedules sum exactly to the remaining amount.
    #[test]
    fn prop_reconciled_sum_is_exact(plan_type in plan_type_strategy(), (total, token) in amounts_strategy()) {
        let req = request(plan_type, total, token);
        let schedule = ScheduleGenerator::generate(&req, RoundingPolicy::ReconcileFinal).unwrap();

        let sum: Decimal = schedule.iter().map(|s| s.amount).sum();
        prop_assert_eq!(sum, total - token);
    }

    /// Unreconciled drift is bounded by half a cent per obligation.
    #[test]
    fn prop_drift_is_bounded(plan_type in plan_type_strategy(), (total, token) in amounts_strategy()) {
        let req = request(plan_type, total, token);
        let schedule = ScheduleGenerator::generate(&req, RoundingPolicy::None).unwrap();

        let sum: Decimal = schedule.iter().map(|s| s.amount).sum();
        let bound = Decimal::new(5, 3) * Decimal::from(schedule.len());
        prop_assert!((sum - (total - token)).abs() <= bound);
    }

    /// Sequences are 1..=n, due dates never decrease, and amounts have two decimals.
    #[test]
    fn prop_ordering_and_scale(plan_type in plan_type_strategy(), (total, token) in amounts_strategy()) {
        let req = request(plan_type, total, token);
        let schedule = ScheduleGenerator::generate(&req, RoundingPolicy::None).unwrap();

        let expected_len = match plan_type {
            PlanType::ConstructionLinked => 7,
            PlanType::TimeLinked => 12,
            PlanType::DownPayment => 2,
        };
        prop_assert_eq!(schedule.len(), expected_len);

        for (index, entry) in schedule.iter().enumerate() {
            prop_assert_eq!(entry.sequence as usize, index + 1);
            prop_assert!(entry.amount.scale() <= 2);
            prop_assert!(entry.amount >= Decimal::ZERO);
        }
        for pair in schedule.windows(2) {
            prop_assert!(pair[0].due_date <= pair[1].due_date);
        }
    }
}
