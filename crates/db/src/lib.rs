//! Storage layer for Estate Ledger.
//!
//! This crate provides:
//! - An in-process transactional store holding every ledger record
//! - Repositories that run core rules against that store

pub mod repositories;
pub mod store;

pub use repositories::{
    AccountFilter, AccountRepository, BudgetRepository, CollectionRepository, EntryFilter, JournalRepository,
    ProcessedRefund, RefundRepository, ReportRepository, ScheduleRepository,
};
pub use store::{LedgerState, Store, StoreError, Table};

use estate_core::schedule::RoundingPolicy;
use estate_shared::AppConfig;

/// Every repository, sharing one store.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Chart of accounts.
    pub accounts: AccountRepository,
    /// Journal entries.
    pub journal: JournalRepository,
    /// Reports.
    pub reports: ReportRepository,
    /// Payment schedules.
    pub schedules: ScheduleRepository,
    /// Bookings, payments and payment plans.
    pub collection: CollectionRepository,
    /// Refunds.
    pub refunds: RefundRepository,
    /// Budgets.
    pub budgets: BudgetRepository,
}

impl Repositories {
    /// Builds every repository over `store`.
    #[must_use]
    pub fn new(store: &Store, config: &AppConfig) -> Self {
        Self {
            accounts: AccountRepository::new(store.clone()),
            journal: JournalRepository::new(store.clone(), config.ledger.clone()),
            reports: ReportRepository::new(store.clone(), config.ledger.cash_account_code.clone()),
            schedules: ScheduleRepository::new(store.clone(), RoundingPolicy::from(config.schedule.rounding)),
            collection: CollectionRepository::new(store.clone(), config.ledger.clone(), config.collection.clone()),
            refunds: RefundRepository::new(store.clone(), config.ledger.clone(), config.collection.clone()),
            budgets: BudgetRepository::new(store.clone()),
        }
    }

    /// Builds every repository over a fresh, empty store.
    #[must_use]
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::new(&Store::new(), config)
    }
}
