//! Property-based tests for the journal poster.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use kasira_shared::types::{AccountId, JournalId};

use crate::accounts::{AccountRef, NormalBalance};

use super::error::LedgerError;
use super::poster::{LedgerPoster, SaleAccounts};
use super::types::{EntryDirection, JournalEntryInput};

/// Strategy for positive amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn always_active(id: AccountId) -> Option<AccountRef> {
    Some(AccountRef {
        id,
        code: "0000".to_string(),
        name: "Any".to_string(),
        is_active: true,
        normal_balance: NormalBalance::DebitIncreasing,
    })
}

fn entry(amount: Decimal, direction: EntryDirection) -> JournalEntryInput {
    JournalEntryInput {
        account_id: AccountId::new(),
        amount,
        direction,
        memo: None,
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any accepted journal has exactly matching debit and credit sums and
    /// every entry is single-sided.
    #[test]
    fn prop_accepted_journals_balance(amounts in prop::collection::vec(positive_amount(), 1..6)) {
        let total: Decimal = amounts.iter().copied().sum();
        let mut inputs: Vec<JournalEntryInput> = amounts
            .iter()
            .map(|&a| entry(a, EntryDirection::Debit))
            .collect();
        inputs.push(entry(total, EntryDirection::Credit));

        let draft =
            LedgerPoster::prepare_journal(date(), "Props", &inputs, always_active).unwrap();
        prop_assert!(draft.totals.is_balanced);
        prop_assert_eq!(draft.totals.debit, draft.totals.credit);
        for resolved in &draft.entries {
            prop_assert!(resolved.is_single_sided());
        }
    }

    /// Any mismatched sums are rejected, reporting both sides exactly.
    #[test]
    fn prop_unbalanced_rejected(debit in positive_amount(), credit in positive_amount()) {
        prop_assume!(debit != credit);

        let inputs = vec![
            entry(debit, EntryDirection::Debit),
            entry(credit, EntryDirection::Credit),
        ];

        let result = LedgerPoster::prepare_journal(date(), "Props", &inputs, always_active);
        let matched = matches!(
            result,
            Err(LedgerError::UnbalancedJournal { debit: d, credit: c })
                if d == debit && c == credit
        );
        prop_assert!(matched);
    }

    /// Sale derivation always balances for any sale total and cost total.
    #[test]
    fn prop_sale_entries_balance(sale_total in positive_amount(), cost_total in positive_amount()) {
        let inputs = LedgerPoster::sale_entries(
            SaleAccounts {
                receivable: AccountId::new(),
                revenue: AccountId::new(),
                cogs: AccountId::new(),
                inventory: AccountId::new(),
            },
            sale_total,
            cost_total,
        );

        let draft =
            LedgerPoster::prepare_journal(date(), "Sale", &inputs, always_active).unwrap();
        prop_assert!(draft.totals.is_balanced);
        prop_assert_eq!(draft.totals.debit, sale_total + cost_total);
    }

    /// Reversing a draft yields a balanced draft with sides swapped and the
    /// same per-account amounts.
    #[test]
    fn prop_reversal_mirrors_original(amounts in prop::collection::vec(positive_amount(), 1..6)) {
        let total: Decimal = amounts.iter().copied().sum();
        let mut inputs: Vec<JournalEntryInput> = amounts
            .iter()
            .map(|&a| entry(a, EntryDirection::Debit))
            .collect();
        inputs.push(entry(total, EntryDirection::Credit));

        let original =
            LedgerPoster::prepare_journal(date(), "Props", &inputs, always_active).unwrap();
        let reversal = LedgerPoster::prepare_reversal(
            date(),
            "Reversal",
            JournalId::new(),
            &original.entries,
            always_active,
        )
        .unwrap();

        prop_assert!(reversal.totals.is_balanced);
        prop_assert_eq!(reversal.entries.len(), original.entries.len());
        for (orig, rev) in original.entries.iter().zip(&reversal.entries) {
            prop_assert_eq!(orig.account_id, rev.account_id);
            prop_assert_eq!(orig.debit, rev.credit);
            prop_assert_eq!(orig.credit, rev.debit);
        }
    }
}
