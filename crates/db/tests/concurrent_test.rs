//! Concurrent access tests for the shared store.
//!
//! Writers racing on the same account or the same schedule entry must
//! serialize: the final balances equal the sum of every committed change.

mod common;

use std::collections::HashSet;
use std::thread;

use common::{balance, booking, date, entry, payment_request, repos, seed_chart, user};
use estate_core::collection::MilestoneStatus;
use estate_core::ledger::PostRequest;
use estate_core::schedule::{GenerateScheduleRequest, PlanType, ScheduleStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const THREADS: usize = 8;
const POSTS_PER_THREAD: usize = 25;

#[test]
fn test_concurrent_postings_to_one_account_lose_no_updates() {
    let repos = repos();
    let chart = seed_chart(&repos);

    let numbers: Vec<String> = thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                let repos = &repos;
                let (cash, income) = (chart.cash.id, chart.income.id);
                scope.spawn(move || {
                    let mut numbers = Vec::with_capacity(POSTS_PER_THREAD);
                    for _ in 0..POSTS_PER_THREAD {
                        let draft = repos.journal.create_entry(entry(cash, income, dec!(10))).unwrap();
                        let posted = repos
                            .journal
                            .post(PostRequest {
                                entry_id: draft.id,
                                actor: user(),
                            })
                            .unwrap();
                        numbers.push(posted.entry_number);
                    }
                    numbers
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|worker| worker.join().unwrap())
            .collect()
    });

    let expected = Decimal::from(THREADS * POSTS_PER_THREAD) * dec!(10);
    assert_eq!(balance(&repos, chart.cash.id), expected);
    assert_eq!(balance(&repos, chart.income.id), expected);

    let unique: HashSet<&String> = numbers.iter().collect();
    assert_eq!(unique.len(), THREADS * POSTS_PER_THREAD);

    let trial = repos.reports.trial_balance().unwrap();
    assert!(trial.is_balanced);
}

#[test]
fn test_concurrent_payments_on_one_schedule_entry() {
    let repos = repos();
    let chart = seed_chart(&repos);
    let booking = booking(&repos, "BK-2026-020", dec!(120000));
    repos
        .schedules
        .generate(&GenerateScheduleRequest {
            booking_id: booking.id,
            booking_number: booking.booking_number.clone(),
            total_amount: booking.total_amount,
            token_amount: Decimal::ZERO,
            plan_type: PlanType::TimeLinked,
            start_date: date(2026, 1, 15),
        })
        .unwrap();
    repos.collection.create_plan(booking.id).unwrap();

    let payments: Vec<_> = [dec!(4000), dec!(3500)]
        .into_iter()
        .map(|amount| {
            repos
                .collection
                .record_payment(payment_request(Some(booking.id), amount))
                .unwrap()
        })
        .collect();

    thread::scope(|scope| {
        for payment in &payments {
            let repos = &repos;
            scope.spawn(move || repos.collection.complete_payment(payment.id, user()).unwrap());
        }
    });

    let schedule = repos.schedules.list_for_booking(booking.id).unwrap();
    assert_eq!(schedule[0].paid_amount, dec!(7500));
    assert_eq!(schedule[0].status, ScheduleStatus::Partial);
    assert!(schedule[1..].iter().all(|s| s.paid_amount.is_zero()));

    let plan = repos.collection.plan_for_booking(booking.id).unwrap().unwrap();
    assert_eq!(plan.milestones[0].paid_amount, dec!(7500));
    assert_eq!(plan.milestones[0].status, MilestoneStatus::Partial);

    assert_eq!(repos.collection.get_booking(booking.id).unwrap().paid_amount, dec!(7500));
    assert_eq!(balance(&repos, chart.cash.id), dec!(7500));
    assert_eq!(balance(&repos, chart.advances.id), dec!(7500));
}
