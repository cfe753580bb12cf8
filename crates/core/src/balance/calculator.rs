//! Derived balances and settlement status.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::NormalBalance;

/// One posted ledger entry as seen by the balance calculator.
#[derive(Debug, Clone, Copy)]
pub struct PostedEntry {
    /// Posting date of the owning journal.
    pub entry_date: NaiveDate,
    /// Debit amount; zero for credit entries.
    pub debit: Decimal,
    /// Credit amount; zero for debit entries.
    pub credit: Decimal,
}

/// Raw debit/credit totals for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Sum of all debit amounts in scope.
    pub debit_total: Decimal,
    /// Sum of all credit amounts in scope.
    pub credit_total: Decimal,
}

impl AccountBalance {
    /// The balance expressed in the account's natural direction.
    #[must_use]
    pub fn natural(&self, normal_balance: NormalBalance) -> Decimal {
        normal_balance.natural_balance(self.debit_total, self.credit_total)
    }
}

/// How far a transaction's allocations cover its total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    /// No allocations at all.
    Unpaid,
    /// Some allocations, short of the total.
    PartiallyPaid,
    /// Allocations match the total exactly.
    Paid,
    /// Allocations exceed the total. Cannot arise through the validated
    /// write path; reported rather than hidden if legacy data holds it.
    Overpaid,
}

/// Stateless balance calculator. Every value is recomputed from entries
/// and allocations at read time; nothing here is stored.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Sums debits and credits over entries on or before `as_of`
    /// (unbounded when `None`).
    #[must_use]
    pub fn account_balance(entries: &[PostedEntry], as_of: Option<NaiveDate>) -> AccountBalance {
        let in_scope = entries
            .iter()
            .filter(|e| as_of.is_none_or(|cutoff| e.entry_date <= cutoff));

        let mut debit_total = Decimal::ZERO;
        let mut credit_total = Decimal::ZERO;
        for entry in in_scope {
            debit_total += entry.debit;
            credit_total += entry.credit;
        }
        AccountBalance {
            debit_total,
            credit_total,
        }
    }

    /// Classifies a transaction's settlement from its derived total and
    /// allocated sum.
    #[must_use]
    pub fn settlement_status(total: Decimal, allocated: Decimal) -> SettlementStatus {
        if allocated.is_zero() {
            SettlementStatus::Unpaid
        } else if allocated < total {
            SettlementStatus::PartiallyPaid
        } else if allocated == total {
            SettlementStatus::Paid
        } else {
            SettlementStatus::Overpaid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn entry(date: NaiveDate, debit: Decimal, credit: Decimal) -> PostedEntry {
        PostedEntry {
            entry_date: date,
            debit,
            credit,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn test_account_balance_sums_both_sides() {
        let entries = vec![
            entry(day(1), dec!(300), dec!(0)),
            entry(day(2), dec!(0), dec!(120)),
            entry(day(3), dec!(50), dec!(0)),
        ];

        let balance = BalanceCalculator::account_balance(&entries, None);
        assert_eq!(balance.debit_total, dec!(350));
        assert_eq!(balance.credit_total, dec!(120));
        assert_eq!(balance.natural(NormalBalance::DebitIncreasing), dec!(230));
        assert_eq!(balance.natural(NormalBalance::CreditIncreasing), dec!(-230));
    }

    #[test]
    fn test_as_of_cuts_later_entries() {
        let entries = vec![
            entry(day(1), dec!(100), dec!(0)),
            entry(day(10), dec!(100), dec!(0)),
        ];

        let balance = BalanceCalculator::account_balance(&entries, Some(day(5)));
        assert_eq!(balance.debit_total, dec!(100));

        // The cutoff is inclusive.
        let balance = BalanceCalculator::account_balance(&entries, Some(day(10)));
        assert_eq!(balance.debit_total, dec!(200));
    }

    #[rstest]
    #[case(dec!(300), dec!(0), SettlementStatus::Unpaid)]
    #[case(dec!(300), dec!(120), SettlementStatus::PartiallyPaid)]
    #[case(dec!(300), dec!(300), SettlementStatus::Paid)]
    #[case(dec!(300), dec!(310), SettlementStatus::Overpaid)]
    fn test_settlement_status(
        #[case] total: Decimal,
        #[case] allocated: Decimal,
        #[case] expected: SettlementStatus,
    ) {
        assert_eq!(BalanceCalculator::settlement_status(total, allocated), expected);
    }
}
