//! Budget service for variance calculation and validation.

use estate_shared::types::AccountId;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::error::BudgetError;
use super::types::{Budget, BudgetVarianceLine, BudgetVarianceReport, VarianceResult, VarianceStatus};
use crate::ledger::{Account, AccountType};

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Calculate variance between budgeted and actual amounts.
    ///
    /// For income accounts: variance = actual - budgeted
    ///   - Positive variance (over target) is favorable
    ///   - Negative variance (under target) is unfavorable
    ///
    /// Every other account type: variance = budgeted - actual
    ///   - Positive variance (under budget) is favorable
    ///   - Negative variance (over budget) is unfavorable
    #[must_use]
    pub fn calculate_variance(budgeted: Decimal, actual: Decimal, account_type: AccountType) -> VarianceResult {
        let variance = match account_type {
            AccountType::Income => actual - budgeted,
            AccountType::Expense | AccountType::Asset | AccountType::Liability | AccountType::Equity => {
                budgeted - actual
            }
        };

        let status = match variance.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => VarianceStatus::Favorable,
            std::cmp::Ordering::Less => VarianceStatus::Unfavorable,
            std::cmp::Ordering::Equal => VarianceStatus::OnBudget,
        };

        VarianceResult {
            budgeted,
            actual,
            variance,
            variance_percent: percent(variance, budgeted),
            utilization_percent: percent(actual, budgeted),
            status,
        }
    }

    /// Validate a budgeted or actual amount.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NegativeAmount` if the amount is negative.
    pub fn validate_budget(amount: Decimal) -> Result<(), BudgetError> {
        if amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount(amount));
        }
        Ok(())
    }

    /// Validate a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidFiscalYear` outside 1900..=9999.
    pub fn validate_fiscal_year(fiscal_year: i32) -> Result<(), BudgetError> {
        if !(1900..=9999).contains(&fiscal_year) {
            return Err(BudgetError::InvalidFiscalYear(fiscal_year));
        }
        Ok(())
    }

    /// Builds the budget vs actual report for one fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::AccountNotFound` if a budget references an
    /// unknown account.
    pub fn variance_report(
        fiscal_year: i32,
        budgets: &[Budget],
        accounts: &[Account],
    ) -> Result<BudgetVarianceReport, BudgetError> {
        let by_id: HashMap<AccountId, &Account> = accounts.iter().map(|a| (a.id, a)).collect();

        let mut lines = budgets
            .iter()
            .filter(|b| b.fiscal_year == fiscal_year)
            .map(|budget| {
                let account = by_id
                    .get(&budget.account_id)
                    .ok_or(BudgetError::AccountNotFound(budget.account_id))?;
                Ok(BudgetVarianceLine {
                    budget_id: budget.id,
                    account_id: account.id,
                    account_code: account.code.clone(),
                    account_name: account.name.clone(),
                    account_type: account.account_type,
                    department: budget.department.clone(),
                    variance: Self::calculate_variance(
                        budget.budgeted_amount,
                        budget.actual_amount,
                        account.account_type,
                    ),
                })
            })
            .collect::<Result<Vec<_>, BudgetError>>()?;
        lines.sort_by(|a, b| {
            a.account_code
                .cmp(&b.account_code)
                .then_with(|| a.department.cmp(&b.department))
        });

        let total_budgeted: Decimal = lines.iter().map(|l| l.variance.budgeted).sum();
        let total_actual: Decimal = lines.iter().map(|l| l.variance.actual).sum();
        let total_variance: Decimal = lines.iter().map(|l| l.variance.variance).sum();

        Ok(BudgetVarianceReport {
            fiscal_year,
            lines,
            total_budgeted,
            total_actual,
            total_variance,
            overall_utilization: percent(total_actual, total_budgeted),
        })
    }
}

fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        (part / whole * Decimal::ONE_HUNDRED).round_dp(2)
    }
}
