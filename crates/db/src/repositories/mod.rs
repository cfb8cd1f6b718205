//! Repositories over the in-process store.
//!
//! Each repository owns a cloned [`Store`](crate::store::Store) handle and
//! runs every multi-record operation inside one store transaction.

pub mod account;
pub mod budget;
pub mod collection;
pub mod journal;
pub mod refund;
pub mod report;
pub mod schedule;

pub use account::{AccountFilter, AccountRepository};
pub use budget::BudgetRepository;
pub use collection::CollectionRepository;
pub use journal::{EntryFilter, JournalRepository};
pub use refund::{ProcessedRefund, RefundRepository};
pub use report::ReportRepository;
pub use schedule::ScheduleRepository;
