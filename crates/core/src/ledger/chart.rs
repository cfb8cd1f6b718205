//! Chart of accounts hierarchy.
//!
//! Accounts form a forest through `parent_id`. [`ChartOfAccounts`] indexes a
//! slice of accounts by id and by parent so traversals never walk the slice
//! repeatedly. Cycles are prevented at write time with
//! [`ChartOfAccounts::would_create_cycle`].

use std::collections::{BTreeMap, HashMap, HashSet};

use estate_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::types::AccountType;

/// Read-only arena view over a set of accounts.
#[derive(Debug)]
pub struct ChartOfAccounts<'a> {
    by_id: HashMap<AccountId, &'a Account>,
    children: HashMap<AccountId, Vec<&'a Account>>,
    roots: Vec<&'a Account>,
}

/// One node of the nested account tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountNode {
    /// The account.
    pub account: Account,
    /// Current balance of the account plus every descendant.
    pub rollup_balance: Decimal,
    /// Child nodes ordered by code.
    pub children: Vec<AccountNode>,
}

impl<'a> ChartOfAccounts<'a> {
    /// Indexes `accounts`. Children and roots are ordered by code.
    ///
    /// An account whose parent is not in the set is treated as a root.
    #[must_use]
    pub fn new(accounts: impl IntoIterator<Item = &'a Account>) -> Self {
        let by_id: HashMap<AccountId, &'a Account> = accounts.into_iter().map(|a| (a.id, a)).collect();

        let mut children: HashMap<AccountId, Vec<&'a Account>> = HashMap::new();
        let mut roots = Vec::new();
        for account in by_id.values() {
            match account.parent_id.filter(|p| by_id.contains_key(p)) {
                Some(parent) => children.entry(parent).or_default().push(*account),
                None => roots.push(*account),
            }
        }
        for list in children.values_mut() {
            list.sort_by(|a, b| a.code.cmp(&b.code));
        }
        roots.sort_by(|a, b| a.code.cmp(&b.code));

        Self { by_id, children, roots }
    }

    /// Looks up an account.
    #[must_use]
    pub fn get(&self, id: AccountId) -> Option<&'a Account> {
        self.by_id.get(&id).copied()
    }

    /// Number of indexed accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if no account is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Accounts without a parent.
    #[must_use]
    pub fn roots(&self) -> &[&'a Account] {
        &self.roots
    }

    /// Direct children of `id`.
    #[must_use]
    pub fn children(&self, id: AccountId) -> &[&'a Account] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true if `id` has at least one child.
    #[must_use]
    pub fn has_children(&self, id: AccountId) -> bool {
        !self.children(id).is_empty()
    }

    /// Every descendant of `id`, depth first.
    #[must_use]
    pub fn descendants(&self, id: AccountId) -> Vec<&'a Account> {
        let mut out = Vec::new();
        let mut stack: Vec<&'a Account> = self.children(id).iter().rev().copied().collect();
        let mut seen = HashSet::new();
        while let Some(account) = stack.pop() {
            if !seen.insert(account.id) {
                continue;
            }
            out.push(account);
            stack.extend(self.children(account.id).iter().rev().copied());
        }
        out
    }

    /// Parent chain of `id`, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: AccountId) -> Vec<&'a Account> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.get(id).and_then(|a| a.parent_id);
        while let Some(parent_id) = current {
            if !seen.insert(parent_id) {
                break;
            }
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            out.push(parent);
            current = parent.parent_id;
        }
        out
    }

    /// Returns true if placing `node` under `new_parent` would form a cycle,
    /// i.e. the new parent is the node itself or one of its descendants.
    #[must_use]
    pub fn would_create_cycle(&self, node: AccountId, new_parent: AccountId) -> bool {
        node == new_parent || self.ancestors(new_parent).iter().any(|a| a.id == node)
    }

    /// Current balance of `id` plus all of its descendants.
    #[must_use]
    pub fn rollup_balance(&self, id: AccountId) -> Decimal {
        let own = self.get(id).map_or(Decimal::ZERO, |a| a.current_balance);
        own + self
            .descendants(id)
            .iter()
            .map(|a| a.current_balance)
            .sum::<Decimal>()
    }

    /// The whole forest as nested nodes.
    #[must_use]
    pub fn tree(&self) -> Vec<AccountNode> {
        let mut visiting = HashSet::new();
        self.roots
            .iter()
            .map(|root| self.build_node(root, &mut visiting))
            .collect()
    }

    fn build_node(&self, account: &'a Account, visiting: &mut HashSet<AccountId>) -> AccountNode {
        visiting.insert(account.id);
        let mut children = Vec::new();
        for child in self.children(account.id) {
            if !visiting.contains(&child.id) {
                children.push(self.build_node(child, visiting));
            }
        }
        let rollup_balance = account.current_balance
            + children.iter().map(|c: &AccountNode| c.rollup_balance).sum::<Decimal>();

        AccountNode {
            account: account.clone(),
            rollup_balance,
            children,
        }
    }
}

/// Aggregated balances for one account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTotal {
    /// Account type.
    pub account_type: AccountType,
    /// Number of accounts included.
    pub account_count: usize,
    /// Sum of current balances.
    pub total_balance: Decimal,
}

/// Balance-sheet and P&L aggregation of current balances by account type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSummary {
    /// One total per account type, in reporting order.
    pub totals: Vec<TypeTotal>,
    /// Assets.
    pub total_assets: Decimal,
    /// Liabilities.
    pub total_liabilities: Decimal,
    /// Equity.
    pub total_equity: Decimal,
    /// Income.
    pub total_income: Decimal,
    /// Expenses.
    pub total_expenses: Decimal,
    /// Income minus expenses.
    pub net_income: Decimal,
}

/// Sums `current_balance` grouped by account type.
#[must_use]
pub fn summarize_by_type<'a>(accounts: impl IntoIterator<Item = &'a Account>, active_only: bool) -> TypeSummary {
    let mut grouped: BTreeMap<AccountType, (usize, Decimal)> =
        AccountType::ALL.iter().map(|t| (*t, (0, Decimal::ZERO))).collect();

    for account in accounts {
        if active_only && !account.is_active {
            continue;
        }
        let slot = grouped.entry(account.account_type).or_insert((0, Decimal::ZERO));
        slot.0 += 1;
        slot.1 += account.current_balance;
    }

    let total_of = |t: AccountType| grouped.get(&t).map_or(Decimal::ZERO, |(_, total)| *total);
    let total_income = total_of(AccountType::Income);
    let total_expenses = total_of(AccountType::Expense);

    TypeSummary {
        totals: AccountType::ALL
            .iter()
            .map(|t| {
                let (account_count, total_balance) = grouped.get(t).copied().unwrap_or((0, Decimal::ZERO));
                TypeTotal {
                    account_type: *t,
                    account_count,
                    total_balance,
                }
            })
            .collect(),
        total_assets: total_of(AccountType::Asset),
        total_liabilities: total_of(AccountType::Liability),
        total_equity: total_of(AccountType::Equity),
        total_income,
        total_expenses,
        net_income: total_income - total_expenses,
    }
}
