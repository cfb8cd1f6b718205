//! Shared fixtures for store-backed integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use estate_core::collection::{Booking, BookingStatus, PaymentMethod, RecordPaymentRequest};
use estate_core::ledger::{Account, AccountType, CreateAccountRequest, CreateEntryRequest, JournalLineInput};
use estate_db::Repositories;
use estate_shared::AppConfig;
use estate_shared::types::{AccountId, Actor, BookingId, FlatId, UserId};
use rust_decimal::Decimal;

/// Repositories over a fresh store with default configuration.
pub fn repos() -> Repositories {
    Repositories::in_memory(&AppConfig::default())
}

/// Repositories with the given configuration tweak applied.
pub fn repos_with(configure: impl FnOnce(&mut AppConfig)) -> Repositories {
    let mut config = AppConfig::default();
    configure(&mut config);
    Repositories::in_memory(&config)
}

/// The accounts every test chart carries.
pub struct Chart {
    pub cash: Account,
    pub bank: Account,
    pub advances: Account,
    pub income: Account,
    pub expense: Account,
}

/// Seeds a small chart including the default cash and advances codes.
pub fn seed_chart(repos: &Repositories) -> Chart {
    let create = |code: &str, name: &str, account_type| {
        repos
            .accounts
            .create(CreateAccountRequest::new(code, name, account_type))
            .unwrap()
    };
    Chart {
        cash: create("1001", "Cash in Hand", AccountType::Asset),
        bank: create("1002", "City Bank", AccountType::Asset),
        advances: create("1200", "Customer Advances", AccountType::Liability),
        income: create("4000", "Sales Income", AccountType::Income),
        expense: create("5000", "Site Expenses", AccountType::Expense),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn user() -> Actor {
    Actor::User(UserId::new())
}

pub fn entry(debit: AccountId, credit: AccountId, amount: Decimal) -> CreateEntryRequest {
    CreateEntryRequest {
        entry_date: date(2026, 3, 1),
        description: "Test entry".to_string(),
        reference: None,
        lines: vec![
            JournalLineInput::debit(debit, amount),
            JournalLineInput::credit(credit, amount),
        ],
        created_by: user(),
    }
}

pub fn balance(repos: &Repositories, id: AccountId) -> Decimal {
    repos.accounts.get(id).unwrap().current_balance
}

/// Stores a confirmed booking with a flat.
pub fn booking(repos: &Repositories, number: &str, total: Decimal) -> Booking {
    repos
        .collection
        .upsert_booking(Booking {
            id: BookingId::new(),
            booking_number: number.to_string(),
            flat_id: Some(FlatId::new()),
            total_amount: total,
            token_amount: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            status: BookingStatus::Confirmed,
        })
        .unwrap()
}

pub fn payment_request(booking_id: Option<BookingId>, amount: Decimal) -> RecordPaymentRequest {
    RecordPaymentRequest {
        booking_id,
        amount,
        payment_date: date(2026, 4, 10),
        method: PaymentMethod::BankTransfer,
        reference: Some("UTR-0042".to_string()),
    }
}
