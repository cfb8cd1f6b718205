//! Financial report generation.
//!
//! This module provides pure projections over posted journal lines:
//! - Account ledger (and the cash / bank book built on it)
//! - Weekly ledger with per-day totals
//! - Trial balance
//! - Profit and loss
//! - Balance sheet

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
