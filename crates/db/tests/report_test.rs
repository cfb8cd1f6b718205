//! Integration tests for ledger reports and budgets.

mod common;

use chrono::NaiveDate;
use common::{Chart, date, repos, seed_chart, user};
use estate_core::budget::{BudgetError, CreateBudgetRequest};
use estate_core::ledger::{CreateEntryRequest, JournalLineInput, PostRequest};
use estate_core::reports::ReportError;
use estate_db::Repositories;
use estate_shared::types::AccountId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn post(repos: &Repositories, on: NaiveDate, debit: AccountId, credit: AccountId, amount: Decimal) {
    let draft = repos
        .journal
        .create_entry(CreateEntryRequest {
            entry_date: on,
            description: format!("Entry on {on}"),
            reference: None,
            lines: vec![
                JournalLineInput::debit(debit, amount),
                JournalLineInput::credit(credit, amount),
            ],
            created_by: user(),
        })
        .unwrap();
    repos
        .journal
        .post(PostRequest {
            entry_id: draft.id,
            actor: user(),
        })
        .unwrap();
}

/// Three months of activity: sales into cash and bank, one site expense.
fn seeded() -> (Repositories, Chart) {
    let repos = repos();
    let chart = seed_chart(&repos);
    post(&repos, date(2026, 1, 10), chart.cash.id, chart.income.id, dec!(1000));
    post(&repos, date(2026, 2, 3), chart.bank.id, chart.income.id, dec!(4000));
    post(&repos, date(2026, 2, 4), chart.expense.id, chart.cash.id, dec!(300));
    post(&repos, date(2026, 2, 6), chart.cash.id, chart.income.id, dec!(50));
    (repos, chart)
}

#[test]
fn test_cash_book_carries_opening_balance_into_range() {
    let (repos, _) = seeded();

    let book = repos
        .reports
        .cash_book(Some(date(2026, 2, 1)), Some(date(2026, 2, 28)))
        .unwrap();
    assert_eq!(book.code, "1001");
    assert_eq!(book.opening_balance, dec!(1000));
    assert_eq!(book.rows.len(), 2);
    assert_eq!(book.rows[0].credit, dec!(300));
    assert_eq!(book.rows[0].balance, dec!(700));
    assert_eq!(book.closing_balance, dec!(750));
}

#[test]
fn test_bank_book_resolves_ledger_by_name() {
    let (repos, chart) = seeded();
    let bank = repos.collection.register_bank_account("City Bank", "0012-4477").unwrap();

    let book = repos.reports.bank_book(bank.id, None, None).unwrap();
    assert_eq!(book.account_id, chart.bank.id);
    assert_eq!(book.total_debit, dec!(4000));
    assert_eq!(book.closing_balance, dec!(4000));
}

#[test]
fn test_bank_book_without_matching_ledger() {
    let (repos, _) = seeded();
    let bank = repos
        .collection
        .register_bank_account("Harbour Savings", "9911")
        .unwrap();

    let err = repos.reports.bank_book(bank.id, None, None).unwrap_err();
    assert!(matches!(err, ReportError::BankLedgerNotResolved(_)));
}

#[test]
fn test_weekly_ledger_has_seven_days() {
    let (repos, chart) = seeded();

    let week = repos.reports.weekly_ledger(chart.cash.id, date(2026, 2, 2)).unwrap();
    assert_eq!(week.days.len(), 7);
    assert_eq!(week.week_end, date(2026, 2, 8));
    assert_eq!(week.days[0].closing_balance, dec!(1000));
    assert_eq!(week.days[2].credit, dec!(300));
    assert_eq!(week.days[6].closing_balance, dec!(750));
}

#[test]
fn test_profit_and_loss_for_period() {
    let (repos, _) = seeded();

    let report = repos
        .reports
        .profit_and_loss(date(2026, 2, 1), date(2026, 2, 28))
        .unwrap();
    assert_eq!(report.income.total, dec!(4050));
    assert_eq!(report.expenses.total, dec!(300));
    assert_eq!(report.net_profit, dec!(3750));

    let err = repos
        .reports
        .profit_and_loss(date(2026, 3, 1), date(2026, 2, 1))
        .unwrap_err();
    assert!(matches!(err, ReportError::InvalidDateRange { .. }));
}

#[test]
fn test_balance_sheet_balances() {
    let (repos, _) = seeded();

    let sheet = repos.reports.balance_sheet(date(2026, 2, 28)).unwrap();
    assert_eq!(sheet.assets.total, dec!(4750));
    assert_eq!(sheet.current_earnings, dec!(4750));
    assert!(sheet.is_balanced);
}

#[test]
fn test_budget_variance_report() {
    let (repos, chart) = seeded();

    let budget = repos
        .budgets
        .create(CreateBudgetRequest {
            fiscal_year: 2026,
            account_id: chart.expense.id,
            department: Some("Site".to_string()),
            budgeted_amount: dec!(1000),
        })
        .unwrap();
    repos.budgets.update_actual(budget.id, dec!(300)).unwrap();
    repos
        .budgets
        .create(CreateBudgetRequest {
            fiscal_year: 2025,
            account_id: chart.expense.id,
            department: None,
            budgeted_amount: dec!(800),
        })
        .unwrap();

    assert_eq!(repos.budgets.list(2026).unwrap().len(), 1);

    let report = repos.budgets.variance_report(2026).unwrap();
    assert_eq!(report.lines.len(), 1);
    assert_eq!(report.lines[0].account_code, "5000");
    assert_eq!(report.total_budgeted, dec!(1000));
    assert_eq!(report.total_actual, dec!(300));
}

#[test]
fn test_duplicate_budget_is_rejected() {
    let (repos, chart) = seeded();
    let request = || CreateBudgetRequest {
        fiscal_year: 2026,
        account_id: chart.income.id,
        department: None,
        budgeted_amount: dec!(10000),
    };

    repos.budgets.create(request()).unwrap();
    let err = repos.budgets.create(request()).unwrap_err();
    assert_eq!(
        err,
        BudgetError::Duplicate {
            account_id: chart.income.id,
            fiscal_year: 2026,
        }
    );
}

#[test]
fn test_budget_for_unknown_account() {
    let (repos, _) = seeded();

    let err = repos
        .budgets
        .create(CreateBudgetRequest {
            fiscal_year: 2026,
            account_id: AccountId::new(),
            department: None,
            budgeted_amount: dec!(1),
        })
        .unwrap_err();
    assert!(matches!(err, BudgetError::AccountNotFound(_)));
}
