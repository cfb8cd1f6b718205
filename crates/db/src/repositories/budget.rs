//! Budget repository.
//!
//! Budgets are read-only relative to the ledger: actual amounts are entered
//! by the caller, never derived from postings.

use estate_core::budget::{Budget, BudgetError, BudgetService, BudgetVarianceReport, CreateBudgetRequest};
use estate_shared::types::BudgetId;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::store::Store;

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    store: Store,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Creates a budget for an account, fiscal year and optional department.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount`, `InvalidFiscalYear`, `AccountNotFound` or
    /// `Duplicate`.
    pub fn create(&self, request: CreateBudgetRequest) -> Result<Budget, BudgetError> {
        BudgetService::validate_budget(request.budgeted_amount)?;
        BudgetService::validate_fiscal_year(request.fiscal_year)?;
        let department = request
            .department
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        self.store.transaction(|state| {
            if !state.accounts.contains_key(&request.account_id) {
                return Err(BudgetError::AccountNotFound(request.account_id));
            }
            let duplicate = state.budgets.values().any(|b| {
                b.account_id == request.account_id
                    && b.fiscal_year == request.fiscal_year
                    && b.department == department
            });
            if duplicate {
                return Err(BudgetError::Duplicate {
                    account_id: request.account_id,
                    fiscal_year: request.fiscal_year,
                });
            }

            let budget = Budget {
                id: BudgetId::new(),
                fiscal_year: request.fiscal_year,
                account_id: request.account_id,
                department,
                budgeted_amount: request.budgeted_amount,
                actual_amount: Decimal::ZERO,
            };
            state.budgets.insert(budget.id, budget.clone());
            info!(
                budget_id = %budget.id,
                account_id = %budget.account_id,
                fiscal_year = budget.fiscal_year,
                amount = %budget.budgeted_amount,
                "Budget created"
            );
            Ok(budget)
        })
    }

    /// Sets the actual amount of a budget.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `NegativeAmount`.
    pub fn update_actual(&self, id: BudgetId, actual_amount: Decimal) -> Result<Budget, BudgetError> {
        BudgetService::validate_budget(actual_amount)?;

        self.store.transaction(|state| {
            let budget = state.budgets.get_mut(&id).ok_or(BudgetError::NotFound(id))?;
            budget.actual_amount = actual_amount;
            info!(budget_id = %id, actual = %actual_amount, "Budget actual updated");
            Ok(budget.clone())
        })
    }

    /// Lists the budgets of a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn list(&self, fiscal_year: i32) -> Result<Vec<Budget>, BudgetError> {
        self.store.read(|state| {
            let mut budgets: Vec<Budget> = state
                .budgets
                .values()
                .filter(|b| b.fiscal_year == fiscal_year)
                .cloned()
                .collect();
            budgets.sort_by_key(|b| b.id);
            debug!(fiscal_year, count = budgets.len(), "Listed budgets");
            Ok(budgets)
        })
    }

    /// Budget vs actual report for a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if a budget references a deleted account.
    pub fn variance_report(&self, fiscal_year: i32) -> Result<BudgetVarianceReport, BudgetError> {
        self.store.read(|state| {
            let budgets: Vec<Budget> = state.budgets.values().cloned().collect();
            BudgetService::variance_report(fiscal_year, &budgets, &state.accounts_by_code())
        })
    }
}
