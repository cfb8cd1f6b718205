//! Demo data seeder for Estate Ledger development and testing.
//!
//! Builds a chart of accounts, one construction-linked booking with its
//! plan, a few confirmed payments, a processed refund and a budget, then
//! prints the resulting reports as JSON.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use estate_core::budget::CreateBudgetRequest;
use estate_core::collection::{Booking, BookingStatus, PaymentMethod, RecordPaymentRequest};
use estate_core::ledger::{AccountType, CreateAccountRequest};
use estate_core::refund::CreateRefundRequest;
use estate_core::schedule::{GenerateScheduleRequest, PlanType};
use estate_db::Repositories;
use estate_shared::AppConfig;
use estate_shared::telemetry::init_tracing;
use estate_shared::types::{Actor, BookingId, FlatId, UserId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

/// Demo chart: (code, name, type, parent code).
const CHART: [(&str, &str, AccountType, Option<&str>); 10] = [
    ("1000", "Current Assets", AccountType::Asset, None),
    ("1001", "Cash in Hand", AccountType::Asset, Some("1000")),
    ("1002", "City Bank", AccountType::Asset, Some("1000")),
    ("1200", "Customer Advances", AccountType::Liability, None),
    ("2000", "Contractor Payables", AccountType::Liability, None),
    ("3000", "Owner Capital", AccountType::Equity, None),
    ("4000", "Flat Sales", AccountType::Income, None),
    ("5000", "Construction Costs", AccountType::Expense, None),
    ("5100", "Site Salaries", AccountType::Expense, Some("5000")),
    ("5200", "Marketing", AccountType::Expense, None),
];

const BOOKING_TOTAL: Decimal = dec!(2500000);

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.telemetry)?;

    let repos = Repositories::in_memory(&config);
    let clerk = Actor::User(UserId::new());

    println!("Seeding chart of accounts...");
    seed_chart(&repos)?;

    println!("Seeding booking, schedule and plan...");
    let booking_id = seed_booking(&repos)?;

    println!("Seeding payments...");
    seed_payments(&repos, booking_id, clerk)?;

    println!("Seeding refund...");
    seed_refund(&repos, booking_id, clerk)?;

    println!("Seeding budgets...");
    seed_budgets(&repos)?;

    let today = Utc::now().date_naive();
    let summary = serde_json::json!({
        "trial_balance": repos.reports.trial_balance()?,
        "balance_sheet": repos.reports.balance_sheet(today)?,
        "cash_book": repos.reports.cash_book(None, None)?,
        "payment_plan": repos.collection.plan_for_booking(booking_id)?,
        "schedule": repos.schedules.list_for_booking(booking_id)?,
        "budget_variance": repos.budgets.variance_report(2026)?,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    println!("Seeding complete!");
    Ok(())
}

fn seed_chart(repos: &Repositories) -> anyhow::Result<()> {
    for (code, name, account_type, parent) in CHART {
        let mut request = CreateAccountRequest::new(code, name, account_type);
        if let Some(parent) = parent {
            request = request.with_parent(repos.accounts.find_by_code(parent)?.id);
        }
        let account = repos.accounts.create(request)?;
        println!("  Created account {} {}", account.code, account.name);
    }
    Ok(())
}

fn seed_booking(repos: &Repositories) -> anyhow::Result<BookingId> {
    let booking = repos.collection.upsert_booking(Booking {
        id: BookingId::new(),
        booking_number: "BK-2026-001".to_string(),
        flat_id: Some(FlatId::new()),
        total_amount: BOOKING_TOTAL,
        token_amount: dec!(100000),
        paid_amount: dec!(100000),
        status: BookingStatus::Confirmed,
    })?;

    let schedule = repos.schedules.generate(&GenerateScheduleRequest {
        booking_id: booking.id,
        booking_number: booking.booking_number.clone(),
        total_amount: booking.total_amount,
        token_amount: booking.token_amount,
        plan_type: PlanType::ConstructionLinked,
        start_date: date(2026, 1, 15)?,
    })?;
    println!("  Generated {} obligations for {}", schedule.len(), booking.booking_number);

    let plan = repos.collection.create_plan(booking.id)?;
    if let Some(first) = plan.milestones.first() {
        repos.collection.trigger_milestone(plan.id, first.id)?;
        println!("  Triggered milestone {}", first.name);
    }
    Ok(booking.id)
}

fn seed_payments(repos: &Repositories, booking_id: BookingId, clerk: Actor) -> anyhow::Result<()> {
    let payments = [
        (dec!(150000), date(2026, 1, 20)?, PaymentMethod::BankTransfer),
        (dec!(90000), date(2026, 2, 2)?, PaymentMethod::Cheque),
        (dec!(360000), date(2026, 4, 18)?, PaymentMethod::BankTransfer),
    ];

    for (amount, payment_date, method) in payments {
        let payment = repos.collection.record_payment(RecordPaymentRequest {
            booking_id: Some(booking_id),
            amount,
            payment_date,
            method,
            reference: None,
        })?;
        let outcome = repos.collection.complete_payment(payment.id, clerk)?;
        info!(
            payment_id = %payment.id,
            amount = %amount,
            skipped = outcome.skipped.len(),
            "Seeded payment"
        );
    }
    Ok(())
}

fn seed_refund(repos: &Repositories, booking_id: BookingId, clerk: Actor) -> anyhow::Result<()> {
    let payment = repos.collection.record_payment(RecordPaymentRequest {
        booking_id: Some(booking_id),
        amount: dec!(25000),
        payment_date: date(2026, 3, 5)?,
        method: PaymentMethod::Upi,
        reference: Some("UPI-88310".to_string()),
    })?;
    repos.collection.complete_payment(payment.id, clerk)?;

    let refund = repos.refunds.create(CreateRefundRequest {
        payment_id: payment.id,
        amount: dec!(25000),
        reason: "Duplicate transfer".to_string(),
        requested_by: clerk,
    })?;
    repos.refunds.approve(refund.id, clerk)?;
    let processed = repos.refunds.process(refund.id, clerk)?;
    println!(
        "  Refunded {} (payment fully refunded: {})",
        processed.refund.amount, processed.payment_refunded
    );
    Ok(())
}

fn seed_budgets(repos: &Repositories) -> anyhow::Result<()> {
    let budgets = [
        ("5000", dec!(1800000), dec!(420000)),
        ("5100", dec!(240000), dec!(65000)),
        ("5200", dec!(60000), dec!(71000)),
    ];

    for (code, budgeted, actual) in budgets {
        let account = repos.accounts.find_by_code(code)?;
        let budget = repos.budgets.create(CreateBudgetRequest {
            fiscal_year: 2026,
            account_id: account.id,
            department: None,
            budgeted_amount: budgeted,
        })?;
        repos.budgets.update_actual(budget.id, actual)?;
    }
    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).with_context(|| format!("invalid date {year}-{month}-{day}"))
}
