//! Report repository.
//!
//! Reports are read-only projections over posted journal lines, taken under
//! the store's shared lock so each one sees a consistent snapshot.

use chrono::NaiveDate;
use estate_core::reports::{
    AccountLedgerReport, BalanceSheetReport, ProfitAndLossReport, ReportError, ReportService, TrialBalanceReport,
    WeeklyLedgerReport,
};
use estate_shared::types::{AccountId, BankAccountId};
use tracing::debug;

use crate::store::Store;

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    store: Store,
    cash_account_code: String,
}

impl ReportRepository {
    /// Creates a new report repository. The cash book reads the account
    /// with `cash_account_code`.
    #[must_use]
    pub fn new(store: Store, cash_account_code: impl Into<String>) -> Self {
        Self {
            store,
            cash_account_code: cash_account_code.into(),
        }
    }

    /// Ledger of one account with running balances.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `InvalidDateRange`.
    pub fn account_ledger(
        &self,
        account_id: AccountId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<AccountLedgerReport, ReportError> {
        self.store.read(|state| {
            let account = state
                .accounts
                .get(&account_id)
                .ok_or(ReportError::AccountNotFound(account_id))?;
            let report = ReportService::account_ledger(account, &state.posted_lines(), from, to)?;
            debug!(account_id = %account_id, rows = report.rows.len(), "Built account ledger");
            Ok(report)
        })
    }

    /// Ledger of the configured cash account.
    ///
    /// # Errors
    ///
    /// Returns `AccountCodeNotFound` if no account carries the cash code.
    pub fn cash_book(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<AccountLedgerReport, ReportError> {
        self.store.read(|state| {
            let account = state
                .account_by_code(&self.cash_account_code)
                .ok_or_else(|| ReportError::AccountCodeNotFound(self.cash_account_code.clone()))?;
            let report = ReportService::account_ledger(account, &state.posted_lines(), from, to)?;
            debug!(account_id = %account.id, rows = report.rows.len(), "Built cash book");
            Ok(report)
        })
    }

    /// Ledger of the asset account backing a bank account record.
    ///
    /// # Errors
    ///
    /// Returns `BankAccountNotFound`, `BankLedgerNotResolved` or
    /// `InvalidDateRange`.
    pub fn bank_book(
        &self,
        bank_account_id: BankAccountId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<AccountLedgerReport, ReportError> {
        self.store.read(|state| {
            let bank = state
                .bank_accounts
                .get(&bank_account_id)
                .ok_or(ReportError::BankAccountNotFound(bank_account_id))?;
            let accounts = state.accounts_by_code();
            let account = ReportService::resolve_bank_ledger(&accounts, &bank.name)?;
            let report = ReportService::account_ledger(account, &state.posted_lines(), from, to)?;
            debug!(
                bank_account_id = %bank_account_id,
                account_id = %account.id,
                rows = report.rows.len(),
                "Built bank book"
            );
            Ok(report)
        })
    }

    /// Seven-day ledger with daily totals.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `InvalidDateRange`.
    pub fn weekly_ledger(&self, account_id: AccountId, week_start: NaiveDate) -> Result<WeeklyLedgerReport, ReportError> {
        self.store.read(|state| {
            let account = state
                .accounts
                .get(&account_id)
                .ok_or(ReportError::AccountNotFound(account_id))?;
            ReportService::weekly_ledger(account, &state.posted_lines(), week_start)
        })
    }

    /// Trial balance from current balances.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn trial_balance(&self) -> Result<TrialBalanceReport, ReportError> {
        self.store.read(|state| {
            let report = ReportService::trial_balance(state.accounts.values());
            debug!(
                total_debit = %report.total_debit,
                total_credit = %report.total_credit,
                is_balanced = report.is_balanced,
                "Built trial balance"
            );
            Ok(report)
        })
    }

    /// Profit and loss for a period.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `from` is after `to`.
    pub fn profit_and_loss(&self, from: NaiveDate, to: NaiveDate) -> Result<ProfitAndLossReport, ReportError> {
        self.store
            .read(|state| ReportService::profit_and_loss(&state.accounts_by_code(), &state.posted_lines(), from, to))
    }

    /// Balance sheet as of a date.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn balance_sheet(&self, as_of: NaiveDate) -> Result<BalanceSheetReport, ReportError> {
        self.store.read(|state| {
            Ok(ReportService::balance_sheet(
                &state.accounts_by_code(),
                &state.posted_lines(),
                as_of,
            ))
        })
    }
}
