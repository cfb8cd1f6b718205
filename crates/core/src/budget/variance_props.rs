//! Property-based tests for budget variance.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::BudgetService;
use super::types::VarianceStatus;
use crate::ledger::AccountType;

fn account_type_strategy() -> impl Strategy<Value = AccountType> {
    proptest::sample::select(AccountType::ALL.to_vec())
}

proptest! {
    /// Income variance is actual - budgeted, every other type budgeted - actual,
    /// and the status follows the sign.
    #[test]
    fn prop_variance_sign_by_account_type(
        budgeted in 0i64..1_000_000_000,
        actual in 0i64..1_000_000_000,
        account_type in account_type_strategy(),
    ) {
        let budgeted = Decimal::from(budgeted);
        let actual = Decimal::from(actual);

        let result = BudgetService::calculate_variance(budgeted, actual, account_type);

        let expected = if account_type == AccountType::Income {
            actual - budgeted
        } else {
            budgeted - actual
        };
        prop_assert_eq!(result.variance, expected);

        let status = if expected > Decimal::ZERO {
            VarianceStatus::Favorable
        } else if expected < Decimal::ZERO {
            VarianceStatus::Unfavorable
        } else {
            VarianceStatus::OnBudget
        };
        prop_assert_eq!(result.status, status);
    }

    /// If B > 0: utilization_percent = (A / B) * 100, two decimals.
    #[test]
    fn prop_utilization_percent_nonzero_budget(
        budgeted in 1i64..1_000_000_000,
        actual in 0i64..1_000_000_000,
    ) {
        let budgeted = Decimal::from(budgeted);
        let actual = Decimal::from(actual);

        let result = BudgetService::calculate_variance(budgeted, actual, AccountType::Expense);

        let expected = (actual / budgeted * dec!(100)).round_dp(2);
        prop_assert_eq!(result.utilization_percent, expected);
    }

    /// A zero budget yields zero percentages.
    #[test]
    fn prop_zero_budget_percentages(actual in 0i64..1_000_000_000) {
        let result = BudgetService::calculate_variance(Decimal::ZERO, Decimal::from(actual), AccountType::Expense);

        prop_assert_eq!(result.utilization_percent, Decimal::ZERO);
        prop_assert_eq!(result.variance_percent, Decimal::ZERO);
    }
}
