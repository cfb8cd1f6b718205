//! Account repository for chart of accounts operations.

use chrono::Utc;
use estate_core::ledger::account::{validate_code, validate_name};
use estate_core::ledger::{
    Account, AccountNode, AccountType, ChartOfAccounts, CreateAccountRequest, LedgerError, TypeSummary,
    UpdateAccountRequest, summarize_by_type,
};
use estate_shared::types::AccountId;
use tracing::{debug, info, warn};

use crate::store::{LedgerState, Store};

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
    /// Filter by parent (`Some(None)` lists roots).
    pub parent_id: Option<Option<AccountId>>,
    /// Case-insensitive match on code or name.
    pub search: Option<String>,
}

impl AccountFilter {
    fn matches(&self, account: &Account) -> bool {
        if self.account_type.is_some_and(|t| t != account.account_type) {
            return false;
        }
        if self.is_active.is_some_and(|active| active != account.is_active) {
            return false;
        }
        if self.parent_id.is_some_and(|parent| parent != account.parent_id) {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            return account.code.to_lowercase().contains(&needle) || account.name.to_lowercase().contains(&needle);
        }
        true
    }
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    store: Store,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken, the parent does not exist, or
    /// the code or name is invalid.
    pub fn create(&self, request: CreateAccountRequest) -> Result<Account, LedgerError> {
        self.store.transaction(|state| {
            let account = Account::from_request(request, Utc::now())?;
            ensure_code_free(state, &account.code, None)?;
            if let Some(parent_id) = account.parent_id {
                if !state.accounts.contains_key(&parent_id) {
                    return Err(LedgerError::ParentNotFound(parent_id));
                }
            }

            state.accounts.insert(account.id, account.clone());
            info!(
                account_id = %account.id,
                code = %account.code,
                account_type = %account.account_type,
                "Account created"
            );
            Ok(account)
        })
    }

    /// Updates code, name, description or parent.
    ///
    /// # Errors
    ///
    /// Returns an error if the account or new parent does not exist, the new
    /// code is taken, or the new parent is the account itself or one of its
    /// descendants.
    pub fn update(&self, id: AccountId, request: UpdateAccountRequest) -> Result<Account, LedgerError> {
        self.store.transaction(|state| {
            let mut account = state
                .accounts
                .get(&id)
                .cloned()
                .ok_or(LedgerError::AccountNotFound(id))?;

            if let Some(code) = request.code {
                let code = validate_code(&code)?;
                ensure_code_free(state, &code, Some(id))?;
                account.code = code;
            }
            if let Some(name) = request.name {
                account.name = validate_name(&name)?;
            }
            if let Some(description) = request.description {
                account.description = description;
            }
            if let Some(parent_id) = request.parent_id {
                if let Some(parent) = parent_id {
                    if !state.accounts.contains_key(&parent) {
                        return Err(LedgerError::ParentNotFound(parent));
                    }
                    let chart = ChartOfAccounts::new(state.accounts.values());
                    if chart.would_create_cycle(id, parent) {
                        warn!(account_id = %id, parent_id = %parent, "Rejected reparent: cycle");
                        return Err(LedgerError::ParentCycle { account: id, parent });
                    }
                }
                account.parent_id = parent_id;
            }

            account.updated_at = Utc::now();
            state.accounts.insert(id, account.clone());
            info!(account_id = %id, "Account updated");
            Ok(account)
        })
    }

    /// Deactivates an account. Inactive accounts reject new lines.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown id.
    pub fn deactivate(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.set_active(id, false)
    }

    /// Reactivates an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown id.
    pub fn activate(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.set_active(id, true)
    }

    fn set_active(&self, id: AccountId, is_active: bool) -> Result<Account, LedgerError> {
        self.store.transaction(|state| {
            let account = state
                .accounts
                .get_mut(&id)
                .ok_or(LedgerError::AccountNotFound(id))?;
            account.is_active = is_active;
            account.updated_at = Utc::now();
            info!(account_id = %id, is_active, "Account activation changed");
            Ok(account.clone())
        })
    }

    /// Deletes an account with no children and no journal lines.
    ///
    /// # Errors
    ///
    /// Returns `AccountHasChildren` or `AccountHasLines`; such accounts can
    /// only be deactivated.
    pub fn delete(&self, id: AccountId) -> Result<(), LedgerError> {
        self.store.transaction(|state| {
            if !state.accounts.contains_key(&id) {
                return Err(LedgerError::AccountNotFound(id));
            }
            if state.accounts.values().any(|a| a.parent_id == Some(id)) {
                warn!(account_id = %id, "Rejected delete: account has children");
                return Err(LedgerError::AccountHasChildren(id));
            }
            if state.account_has_lines(id) {
                warn!(account_id = %id, "Rejected delete: account has journal lines");
                return Err(LedgerError::AccountHasLines(id));
            }
            state.accounts.remove(&id);
            info!(account_id = %id, "Account deleted");
            Ok(())
        })
    }

    /// Gets an account by id.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown id.
    pub fn get(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.store.read(|state| {
            state
                .accounts
                .get(&id)
                .cloned()
                .ok_or(LedgerError::AccountNotFound(id))
        })
    }

    /// Gets an account by code.
    ///
    /// # Errors
    ///
    /// Returns `AccountCodeNotFound` for an unknown code.
    pub fn find_by_code(&self, code: &str) -> Result<Account, LedgerError> {
        self.store.read(|state| {
            state
                .account_by_code(code)
                .cloned()
                .ok_or_else(|| LedgerError::AccountCodeNotFound(code.to_string()))
        })
    }

    /// Lists accounts matching `filter`, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn list(&self, filter: &AccountFilter) -> Result<Vec<Account>, LedgerError> {
        self.store.read(|state| {
            let accounts: Vec<Account> = state
                .accounts_by_code()
                .into_iter()
                .filter(|a| filter.matches(a))
                .collect();
            debug!(count = accounts.len(), "Listed accounts");
            Ok(accounts)
        })
    }

    /// Direct children of an account, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown id.
    pub fn children(&self, id: AccountId) -> Result<Vec<Account>, LedgerError> {
        self.store.read(|state| {
            if !state.accounts.contains_key(&id) {
                return Err(LedgerError::AccountNotFound(id));
            }
            let chart = ChartOfAccounts::new(state.accounts.values());
            Ok(chart.children(id).iter().map(|a| (*a).clone()).collect())
        })
    }

    /// The whole chart as a tree with rolled-up balances.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn tree(&self) -> Result<Vec<AccountNode>, LedgerError> {
        self.store
            .read(|state| Ok(ChartOfAccounts::new(state.accounts.values()).tree()))
    }

    /// Balance totals per account type.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn type_summary(&self, active_only: bool) -> Result<TypeSummary, LedgerError> {
        self.store
            .read(|state| Ok(summarize_by_type(state.accounts.values(), active_only)))
    }
}

fn ensure_code_free(state: &LedgerState, code: &str, except: Option<AccountId>) -> Result<(), LedgerError> {
    let taken = state
        .accounts
        .values()
        .any(|a| a.code == code && Some(a.id) != except);
    if taken {
        warn!(code, "Rejected duplicate account code");
        return Err(LedgerError::DuplicateAccountCode(code.to_string()));
    }
    Ok(())
}
