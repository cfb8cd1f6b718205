//! Core business logic for Estate Ledger.
//!
//! This crate contains pure business logic with ZERO storage dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry bookkeeping logic
//! - `reports` - Ledger, trial balance, P&L and balance sheet projections
//! - `schedule` - Payment schedule generation
//! - `collection` - Payment completion cascade
//! - `refund` - Refund workflow
//! - `budget` - Budget tracking and variance analysis

pub mod budget;
pub mod collection;
pub mod ledger;
pub mod refund;
pub mod reports;
pub mod schedule;
