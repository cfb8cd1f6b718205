//! Budget tracking and variance analysis.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod variance_props;

pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{
    Budget, BudgetVarianceLine, BudgetVarianceReport, CreateBudgetRequest, VarianceResult, VarianceStatus,
};
