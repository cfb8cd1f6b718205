//! Budget data types.

use estate_shared::types::{AccountId, BudgetId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::AccountType;

/// A fiscal-year budget for one account, optionally per department.
///
/// Actuals are entered by the caller; they are not derived from postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Fiscal year, e.g. 2026.
    pub fiscal_year: i32,
    /// Account the budget applies to.
    pub account_id: AccountId,
    /// Optional department.
    pub department: Option<String>,
    /// Budgeted amount.
    pub budgeted_amount: Decimal,
    /// Actual amount.
    pub actual_amount: Decimal,
}

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetRequest {
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Account ID.
    pub account_id: AccountId,
    /// Optional department.
    pub department: Option<String>,
    /// Budgeted amount.
    pub budgeted_amount: Decimal,
}

/// Variance calculation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceResult {
    /// Budgeted amount.
    pub budgeted: Decimal,
    /// Actual amount.
    pub actual: Decimal,
    /// Variance amount.
    pub variance: Decimal,
    /// Variance percentage.
    pub variance_percent: Decimal,
    /// Utilization percentage.
    pub utilization_percent: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

/// Variance status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Favorable variance (under budget for expenses, over target for income).
    Favorable,
    /// Unfavorable variance (over budget for expenses, under target for income).
    Unfavorable,
    /// On budget (no variance).
    OnBudget,
}

/// One budget with its account and variance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetVarianceLine {
    /// Budget ID.
    pub budget_id: BudgetId,
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Account type, which decides the variance sign.
    pub account_type: AccountType,
    /// Department.
    pub department: Option<String>,
    /// Variance figures.
    pub variance: VarianceResult,
}

/// Budget vs actual report for a fiscal year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetVarianceReport {
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Lines ordered by account code then department.
    pub lines: Vec<BudgetVarianceLine>,
    /// Total budgeted amount.
    pub total_budgeted: Decimal,
    /// Total actual amount.
    pub total_actual: Decimal,
    /// Sum of line variances.
    pub total_variance: Decimal,
    /// Overall utilization percentage.
    pub overall_utilization: Decimal,
}
