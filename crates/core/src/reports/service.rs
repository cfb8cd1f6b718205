//! Report generation service.
//!
//! Every report is a pure projection over accounts and [`PostedLine`]s.
//! Balances are replayed with the same sign rule the journal engine applies
//! when posting, so a full replay reproduces `current_balance`.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use estate_shared::types::AccountId;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AccountAmount, AccountLedgerReport, BalanceSheetReport, DailyTotal, LedgerRow, PostedLine,
    ProfitAndLossReport, ReportSection, TrialBalanceReport, TrialBalanceRow, WeeklyLedgerReport,
};
use crate::ledger::{Account, AccountType, NormalBalance, RunningBalance};

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Builds the ledger of one account for an optional date range.
    ///
    /// The opening balance of the range is the account's opening balance plus
    /// every line dated before `from`. Rows are ordered by entry date and then
    /// insertion sequence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `from` is after `to`.
    pub fn account_ledger(
        account: &Account,
        lines: &[PostedLine],
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<AccountLedgerReport, ReportError> {
        if let (Some(start), Some(end)) = (from, to) {
            if start > end {
                return Err(ReportError::InvalidDateRange { start, end });
            }
        }

        let side = account.normal_balance();
        let mut own: Vec<&PostedLine> = lines.iter().filter(|l| l.account_id == account.id).collect();
        own.sort_by_key(|l| (l.entry_date, l.sequence));

        let mut running = RunningBalance::opening(account.opening_balance);
        let mut rows = Vec::new();
        let mut opening_balance = account.opening_balance;
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;

        for line in own {
            if to.is_some_and(|end| line.entry_date > end) {
                break;
            }
            running = running.next(side, line.debit, line.credit);
            if from.is_some_and(|start| line.entry_date < start) {
                opening_balance = running.current_balance;
                continue;
            }
            total_debit += line.debit;
            total_credit += line.credit;
            rows.push(LedgerRow {
                entry_id: line.entry_id,
                entry_number: line.entry_number.clone(),
                entry_date: line.entry_date,
                description: line.description.clone(),
                debit: line.debit,
                credit: line.credit,
                balance: running.current_balance,
            });
        }

        Ok(AccountLedgerReport {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            from,
            to,
            opening_balance,
            rows,
            total_debit,
            total_credit,
            closing_balance: running.current_balance,
        })
    }

    /// Builds the ledger for the seven days starting at `week_start`, with a
    /// total for every day.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if the week runs past the calendar.
    pub fn weekly_ledger(
        account: &Account,
        lines: &[PostedLine],
        week_start: NaiveDate,
    ) -> Result<WeeklyLedgerReport, ReportError> {
        let week_end = week_start
            .checked_add_days(Days::new(6))
            .ok_or(ReportError::InvalidDateRange {
                start: week_start,
                end: week_start,
            })?;
        let ledger = Self::account_ledger(account, lines, Some(week_start), Some(week_end))?;

        let mut days = Vec::with_capacity(7);
        let mut closing_balance = ledger.opening_balance;
        for date in week_start.iter_days().take(7) {
            let mut debit = Decimal::ZERO;
            let mut credit = Decimal::ZERO;
            for row in ledger.rows.iter().filter(|r| r.entry_date == date) {
                debit += row.debit;
                credit += row.credit;
                closing_balance = row.balance;
            }
            days.push(DailyTotal {
                date,
                debit,
                credit,
                closing_balance,
            });
        }

        Ok(WeeklyLedgerReport {
            week_start,
            week_end,
            ledger,
            days,
        })
    }

    /// Generates a trial balance from current balances of active accounts.
    ///
    /// A debit-normal account with a positive balance lands in the debit
    /// column; a negative balance flips it to the credit column, and the
    /// reverse for credit-normal accounts.
    #[must_use]
    pub fn trial_balance<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> TrialBalanceReport {
        let mut active: Vec<&Account> = accounts.into_iter().filter(|a| a.is_active).collect();
        active.sort_by(|a, b| a.code.cmp(&b.code));

        let rows: Vec<TrialBalanceRow> = active
            .into_iter()
            .map(|account| {
                let (debit, credit) = split_columns(account.normal_balance(), account.current_balance);
                TrialBalanceRow {
                    account_id: account.id,
                    code: account.code.clone(),
                    name: account.name.clone(),
                    account_type: account.account_type,
                    debit,
                    credit,
                }
            })
            .collect();

        let total_debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.credit).sum();

        TrialBalanceReport {
            rows,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Generates profit and loss from period activity of income and expense
    /// accounts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `from` is after `to`.
    pub fn profit_and_loss(
        accounts: &[Account],
        lines: &[PostedLine],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<ProfitAndLossReport, ReportError> {
        if from > to {
            return Err(ReportError::InvalidDateRange { start: from, end: to });
        }

        let activity = period_activity(accounts, lines, |date| date >= from && date <= to);
        let mut income = ReportSection::default();
        let mut expenses = ReportSection::default();

        for account in sorted_by_code(accounts) {
            let amount = activity.get(&account.id).copied().unwrap_or_default();
            if !account.is_active && amount.is_zero() {
                continue;
            }
            match account.account_type {
                AccountType::Income => income.push(amount_row(account, amount)),
                AccountType::Expense => expenses.push(amount_row(account, amount)),
                AccountType::Asset | AccountType::Liability | AccountType::Equity => {}
            }
        }

        let net_profit = income.total - expenses.total;
        Ok(ProfitAndLossReport {
            period_start: from,
            period_end: to,
            income,
            expenses,
            net_profit,
        })
    }

    /// Generates a balance sheet as of a date by replaying posted lines.
    ///
    /// Income and expense balances up to `as_of` are shown as current
    /// earnings on the equity side.
    #[must_use]
    pub fn balance_sheet(accounts: &[Account], lines: &[PostedLine], as_of: NaiveDate) -> BalanceSheetReport {
        let activity = period_activity(accounts, lines, |date| date <= as_of);
        let balance_of = |account: &Account| {
            account.opening_balance + activity.get(&account.id).copied().unwrap_or_default()
        };

        let mut assets = ReportSection::default();
        let mut liabilities = ReportSection::default();
        let mut equity = ReportSection::default();
        let mut income = Decimal::ZERO;
        let mut expenses = Decimal::ZERO;

        for account in sorted_by_code(accounts) {
            let balance = balance_of(account);
            if !account.is_active && balance.is_zero() {
                continue;
            }
            match account.account_type {
                AccountType::Asset => assets.push(amount_row(account, balance)),
                AccountType::Liability => liabilities.push(amount_row(account, balance)),
                AccountType::Equity => equity.push(amount_row(account, balance)),
                AccountType::Income => income += balance,
                AccountType::Expense => expenses += balance,
            }
        }

        let current_earnings = income - expenses;
        let liabilities_and_equity = liabilities.total + equity.total + current_earnings;
        let is_balanced = assets.total == liabilities_and_equity;

        BalanceSheetReport {
            as_of,
            assets,
            liabilities,
            equity,
            current_earnings,
            liabilities_and_equity,
            is_balanced,
        }
    }

    /// Finds the ledger account backing a bank account record.
    ///
    /// Asset accounts are matched on name, exact (case-insensitive) first,
    /// then by containment.
    ///
    /// # Errors
    ///
    /// Returns `BankLedgerNotResolved` if no asset account matches.
    pub fn resolve_bank_ledger<'a>(accounts: &'a [Account], bank_name: &str) -> Result<&'a Account, ReportError> {
        let needle = bank_name.trim().to_lowercase();
        let assets = || {
            sorted_by_code(accounts)
                .into_iter()
                .filter(|a| a.account_type == AccountType::Asset)
        };

        assets()
            .find(|a| a.name.to_lowercase() == needle)
            .or_else(|| {
                assets().find(|a| {
                    let name = a.name.to_lowercase();
                    !needle.is_empty() && (name.contains(&needle) || needle.contains(&name))
                })
            })
            .ok_or_else(|| ReportError::BankLedgerNotResolved(bank_name.to_string()))
    }
}

/// Splits a signed balance into (debit, credit) columns.
fn split_columns(side: NormalBalance, balance: Decimal) -> (Decimal, Decimal) {
    let positive = balance >= Decimal::ZERO;
    match (side, positive) {
        (NormalBalance::Debit, true) | (NormalBalance::Credit, false) => (balance.abs(), Decimal::ZERO),
        (NormalBalance::Debit, false) | (NormalBalance::Credit, true) => (Decimal::ZERO, balance.abs()),
    }
}

/// Signed activity per account for lines whose date passes `in_range`.
fn period_activity<F>(accounts: &[Account], lines: &[PostedLine], in_range: F) -> HashMap<AccountId, Decimal>
where
    F: Fn(NaiveDate) -> bool,
{
    let sides: HashMap<AccountId, NormalBalance> =
        accounts.iter().map(|a| (a.id, a.normal_balance())).collect();

    let mut activity = HashMap::new();
    for line in lines.iter().filter(|l| in_range(l.entry_date)) {
        let Some(side) = sides.get(&line.account_id) else {
            continue;
        };
        *activity.entry(line.account_id).or_insert(Decimal::ZERO) += side.balance_change(line.debit, line.credit);
    }
    activity
}

fn sorted_by_code(accounts: &[Account]) -> Vec<&Account> {
    let mut sorted: Vec<&Account> = accounts.iter().collect();
    sorted.sort_by(|a, b| a.code.cmp(&b.code));
    sorted
}

fn amount_row(account: &Account, amount: Decimal) -> AccountAmount {
    AccountAmount {
        account_id: account.id,
        code: account.code.clone(),
        name: account.name.clone(),
        amount,
    }
}
