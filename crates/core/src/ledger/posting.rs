//! Balance propagation for posting and voiding.
//!
//! Posting an entry moves each referenced account by
//! `normal_balance.balance_change(debit, credit)`; voiding applies the exact
//! negation. Deltas are aggregated per account so each balance is touched
//! once per operation.

use std::collections::BTreeMap;

use estate_shared::types::AccountId;
use rust_decimal::Decimal;

use super::entry::JournalLine;
use super::error::LedgerError;
use super::types::AccountType;

/// Signed balance movement per account, ordered by account id.
pub type BalanceDeltas = BTreeMap<AccountId, Decimal>;

/// Computes the balance deltas produced by posting `lines`.
///
/// # Errors
///
/// Propagates lookup failures and returns `BalanceOverflow` if an aggregate
/// is not representable.
pub fn posting_deltas<T>(lines: &[JournalLine], account_type_of: T) -> Result<BalanceDeltas, LedgerError>
where
    T: Fn(AccountId) -> Result<AccountType, LedgerError>,
{
    let mut deltas = BalanceDeltas::new();
    for line in lines {
        let account_type = account_type_of(line.account_id)?;
        let change = account_type
            .normal_balance()
            .balance_change(line.debit, line.credit);
        let slot = deltas.entry(line.account_id).or_insert(Decimal::ZERO);
        *slot = slot
            .checked_add(change)
            .ok_or(LedgerError::BalanceOverflow(line.account_id))?;
    }
    Ok(deltas)
}

/// Computes the deltas that undo a posting of `lines`.
///
/// # Errors
///
/// Same as [`posting_deltas`].
pub fn void_deltas<T>(lines: &[JournalLine], account_type_of: T) -> Result<BalanceDeltas, LedgerError>
where
    T: Fn(AccountId) -> Result<AccountType, LedgerError>,
{
    Ok(posting_deltas(lines, account_type_of)?
        .into_iter()
        .map(|(account_id, delta)| (account_id, -delta))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_shared::types::JournalEntryId;
    use rust_decimal_macros::dec;

    use crate::ledger::types::JournalLineInput;

    fn lines(inputs: Vec<JournalLineInput>) -> Vec<JournalLine> {
        JournalLine::from_inputs(JournalEntryId::new(), inputs)
    }

    #[test]
    fn test_cash_and_income_both_increase() {
        let cash = AccountId::new();
        let income = AccountId::new();
        let lines = lines(vec![
            JournalLineInput::debit(cash, dec!(1000)),
            JournalLineInput::credit(income, dec!(1000)),
        ]);

        let deltas = posting_deltas(&lines, |id| {
            Ok(if id == cash {
                AccountType::Asset
            } else {
                AccountType::Income
            })
        })
        .unwrap();

        assert_eq!(deltas[&cash], dec!(1000));
        assert_eq!(deltas[&income], dec!(1000));
    }

    #[test]
    fn test_same_account_lines_aggregate() {
        let cash = AccountId::new();
        let lines = lines(vec![
            JournalLineInput::debit(cash, dec!(700)),
            JournalLineInput::credit(cash, dec!(200)),
        ]);

        let deltas = posting_deltas(&lines, |_| Ok(AccountType::Asset)).unwrap();
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[&cash], dec!(500));
    }

    #[test]
    fn test_void_is_negation() {
        let advances = AccountId::new();
        let cash = AccountId::new();
        let lines = lines(vec![
            JournalLineInput::debit(advances, dec!(300)),
            JournalLineInput::credit(cash, dec!(300)),
        ]);
        let type_of = |id: AccountId| -> Result<AccountType, LedgerError> {
            Ok(if id == cash {
                AccountType::Asset
            } else {
                AccountType::Liability
            })
        };

        let post = posting_deltas(&lines, type_of).unwrap();
        let void = void_deltas(&lines, type_of).unwrap();
        for (account_id, delta) in &post {
            assert_eq!(void[account_id], -*delta);
        }
    }

    #[test]
    fn test_unknown_account_propagates() {
        let missing = AccountId::new();
        let lines = lines(vec![JournalLineInput::debit(missing, dec!(1))]);

        assert_eq!(
            posting_deltas(&lines, |id| Err(LedgerError::AccountNotFound(id))),
            Err(LedgerError::AccountNotFound(missing))
        );
    }
}
