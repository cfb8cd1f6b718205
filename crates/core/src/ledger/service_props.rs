//! Property-based tests for the ledger rules.
//!
//! - Balanced lines always validate and their totals agree
//! - Unbalanced lines never validate
//! - Posting then voiding returns every balance to its starting value

use chrono::Utc;
use estate_shared::types::{AccountId, JournalEntryId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::account::Account;
use super::entry::JournalLine;
use super::error::LedgerError;
use super::posting::{posting_deltas, void_deltas};
use super::service::{AccountInfo, LedgerService};
use super::types::{AccountType, CreateAccountRequest, JournalLineInput};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn account_type_strategy() -> impl Strategy<Value = AccountType> {
    prop_oneof![
        Just(AccountType::Asset),
        Just(AccountType::Liability),
        Just(AccountType::Equity),
        Just(AccountType::Income),
        Just(AccountType::Expense),
    ]
}

fn ok_account(id: AccountId) -> Result<AccountInfo, LedgerError> {
    Ok(AccountInfo {
        id,
        is_active: true,
        account_type: AccountType::Asset,
    })
}

/// Splits each debit across a matching credit line so the entry balances.
fn balanced_lines(amounts: &[Decimal]) -> Vec<JournalLineInput> {
    amounts
        .iter()
        .flat_map(|amount| {
            [
                JournalLineInput::debit(AccountId::new(), *amount),
                JournalLineInput::credit(AccountId::new(), *amount),
            ]
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_balanced_lines_validate(amounts in prop::collection::vec(positive_amount(), 1..10)) {
        let lines = balanced_lines(&amounts);
        let totals = LedgerService::validate_lines(&lines, Decimal::new(1, 2), ok_account).unwrap();

        let expected: Decimal = amounts.iter().copied().sum();
        prop_assert_eq!(totals.total_debit, expected);
        prop_assert_eq!(totals.total_credit, expected);
    }

    #[test]
    fn prop_unbalanced_lines_rejected(
        amounts in prop::collection::vec(positive_amount(), 1..10),
        extra in (2i64..100_000i64).prop_map(|c| Decimal::new(c, 2)),
    ) {
        let mut lines = balanced_lines(&amounts);
        lines.push(JournalLineInput::debit(AccountId::new(), extra));

        let result = LedgerService::validate_lines(&lines, Decimal::new(1, 2), ok_account);
        let is_unbalanced = matches!(result, Err(LedgerError::UnbalancedEntry { .. }));
        prop_assert!(is_unbalanced);
    }

    #[test]
    fn prop_post_then_void_restores_balances(
        setup in prop::collection::vec((account_type_strategy(), positive_amount()), 2..6),
        amounts in prop::collection::vec(positive_amount(), 1..8),
        picks in prop::collection::vec((0usize..6, 0usize..6), 8),
    ) {
        let mut accounts: HashMap<AccountId, Account> = setup
            .iter()
            .enumerate()
            .map(|(i, (account_type, opening))| {
                let request = CreateAccountRequest::new(format!("{i:04}"), "prop", *account_type)
                    .with_opening_balance(*opening);
                let account = Account::from_request(request, Utc::now()).unwrap();
                (account.id, account)
            })
            .collect();
        let ids: Vec<AccountId> = accounts.keys().copied().collect();
        let before: HashMap<AccountId, Decimal> =
            accounts.iter().map(|(id, a)| (*id, a.current_balance)).collect();

        let inputs: Vec<JournalLineInput> = amounts
            .iter()
            .zip(&picks)
            .flat_map(|(amount, (d, c))| {
                [
                    JournalLineInput::debit(ids[d % ids.len()], *amount),
                    JournalLineInput::credit(ids[c % ids.len()], *amount),
                ]
            })
            .collect();
        let lines = JournalLine::from_inputs(JournalEntryId::new(), inputs);

        let types: HashMap<AccountId, AccountType> =
            accounts.iter().map(|(id, a)| (*id, a.account_type)).collect();
        let type_of = |id: AccountId| -> Result<AccountType, LedgerError> {
            types.get(&id).copied().ok_or(LedgerError::AccountNotFound(id))
        };

        for (id, delta) in posting_deltas(&lines, type_of).unwrap() {
            accounts.get_mut(&id).unwrap().apply_delta(delta).unwrap();
        }
        for (id, delta) in void_deltas(&lines, type_of).unwrap() {
            accounts.get_mut(&id).unwrap().apply_delta(delta).unwrap();
        }

        for (id, account) in &accounts {
            prop_assert_eq!(account.current_balance, before[id]);
        }
    }
}
