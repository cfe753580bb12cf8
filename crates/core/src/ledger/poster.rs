//! Journal preparation and entry derivation.
//!
//! The poster validates requested entries against the chart of accounts and
//! produces a balanced [`JournalDraft`]; the db layer appends the draft in
//! the same database transaction as the inventory effects it describes.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use kasira_shared::types::{AccountId, JournalId};

use crate::accounts::AccountRef;

use super::error::LedgerError;
use super::types::{
    EntryDirection, JournalDraft, JournalEntryInput, JournalTotals, ResolvedJournalEntry,
};

/// Accounts a purchase posting touches.
#[derive(Debug, Clone, Copy)]
pub struct PurchaseAccounts {
    /// Inventory asset account, debited for the goods received.
    pub inventory: AccountId,
    /// Payable (or cash) account, credited for the amount owed.
    pub payable: AccountId,
}

/// Accounts a sale posting touches.
#[derive(Debug, Clone, Copy)]
pub struct SaleAccounts {
    /// Receivable (or cash) account, debited for the sale total.
    pub receivable: AccountId,
    /// Revenue account, credited for the sale total.
    pub revenue: AccountId,
    /// Cost-of-goods-sold expense account, debited for the consumed cost.
    pub cogs: AccountId,
    /// Inventory asset account, credited for the consumed cost.
    pub inventory: AccountId,
}

/// Stateless journal poster.
pub struct LedgerPoster;

impl LedgerPoster {
    /// Validates entry inputs and produces a balanced journal draft.
    ///
    /// `account_lookup` resolves an account ID to its current state, or
    /// `None` for unknown accounts.
    ///
    /// # Errors
    ///
    /// - `InsufficientEntries` for fewer than two entries.
    /// - `NonPositiveAmount` for a zero or negative amount.
    /// - `AccountNotFound` / `InactiveAccount` from the lookup.
    /// - `UnbalancedJournal` with both sums unless `Σ debit == Σ credit`
    ///   exactly.
    pub fn prepare_journal<F>(
        entry_date: NaiveDate,
        description: impl Into<String>,
        inputs: &[JournalEntryInput],
        account_lookup: F,
    ) -> Result<JournalDraft, LedgerError>
    where
        F: Fn(AccountId) -> Option<AccountRef>,
    {
        Self::prepare(entry_date, description, inputs, None, account_lookup)
    }

    /// Builds the draft that reverses a posted journal: every entry's
    /// debit and credit swapped, linked back to the original. The original
    /// journal is never mutated.
    ///
    /// # Errors
    ///
    /// Same as [`Self::prepare_journal`]. Accounts must still exist;
    /// inactive accounts are allowed here so that a posted transaction can
    /// always be cancelled.
    pub fn prepare_reversal<F>(
        entry_date: NaiveDate,
        description: impl Into<String>,
        original: JournalId,
        original_entries: &[ResolvedJournalEntry],
        account_lookup: F,
    ) -> Result<JournalDraft, LedgerError>
    where
        F: Fn(AccountId) -> Option<AccountRef>,
    {
        let inputs = Self::reversing_entries(original_entries);
        Self::prepare(entry_date, description, &inputs, Some(original), |id| {
            account_lookup(id).map(|a| AccountRef {
                is_active: true,
                ..a
            })
        })
    }

    fn prepare<F>(
        entry_date: NaiveDate,
        description: impl Into<String>,
        inputs: &[JournalEntryInput],
        reverses: Option<JournalId>,
        account_lookup: F,
    ) -> Result<JournalDraft, LedgerError>
    where
        F: Fn(AccountId) -> Option<AccountRef>,
    {
        if inputs.len() < 2 {
            return Err(LedgerError::InsufficientEntries(inputs.len()));
        }

        let mut entries = Vec::with_capacity(inputs.len());
        for input in inputs {
            if input.amount <= Decimal::ZERO {
                return Err(LedgerError::NonPositiveAmount {
                    account_id: input.account_id,
                    amount: input.amount,
                });
            }

            let account = account_lookup(input.account_id)
                .ok_or(LedgerError::AccountNotFound(input.account_id))?;
            if !account.is_active {
                return Err(LedgerError::InactiveAccount {
                    id: account.id,
                    code: account.code,
                });
            }

            let (debit, credit) = match input.direction {
                EntryDirection::Debit => (input.amount, Decimal::ZERO),
                EntryDirection::Credit => (Decimal::ZERO, input.amount),
            };
            entries.push(ResolvedJournalEntry {
                account_id: input.account_id,
                debit,
                credit,
                memo: input.memo.clone(),
            });
        }

        let totals = JournalTotals::of(&entries);
        if !totals.is_balanced {
            return Err(LedgerError::UnbalancedJournal {
                debit: totals.debit,
                credit: totals.credit,
            });
        }

        Ok(JournalDraft {
            entry_date,
            description: description.into(),
            entries,
            totals,
            reverses,
        })
    }

    /// Entry inputs for posting a purchase: debit inventory, credit
    /// payable, both for the purchase total.
    #[must_use]
    pub fn purchase_entries(accounts: PurchaseAccounts, total: Decimal) -> Vec<JournalEntryInput> {
        vec![
            JournalEntryInput {
                account_id: accounts.inventory,
                amount: total,
                direction: EntryDirection::Debit,
                memo: None,
            },
            JournalEntryInput {
                account_id: accounts.payable,
                amount: total,
                direction: EntryDirection::Credit,
                memo: None,
            },
        ]
    }

    /// Entry inputs for posting a sale: debit receivable / credit revenue
    /// for the sale total, debit cost-of-goods-sold / credit inventory for
    /// the consumed batch cost. The cost pair is omitted when the consumed
    /// cost is zero (zero-cost stock).
    #[must_use]
    pub fn sale_entries(
        accounts: SaleAccounts,
        sale_total: Decimal,
        cost_total: Decimal,
    ) -> Vec<JournalEntryInput> {
        let mut entries = vec![
            JournalEntryInput {
                account_id: accounts.receivable,
                amount: sale_total,
                direction: EntryDirection::Debit,
                memo: None,
            },
            JournalEntryInput {
                account_id: accounts.revenue,
                amount: sale_total,
                direction: EntryDirection::Credit,
                memo: None,
            },
        ];
        if cost_total > Decimal::ZERO {
            entries.push(JournalEntryInput {
                account_id: accounts.cogs,
                amount: cost_total,
                direction: EntryDirection::Debit,
                memo: None,
            });
            entries.push(JournalEntryInput {
                account_id: accounts.inventory,
                amount: cost_total,
                direction: EntryDirection::Credit,
                memo: None,
            });
        }
        entries
    }

    /// Swaps every entry's side, preserving amounts and memos.
    #[must_use]
    pub fn reversing_entries(entries: &[ResolvedJournalEntry]) -> Vec<JournalEntryInput> {
        entries
            .iter()
            .map(|e| {
                let (amount, side) = if e.debit > Decimal::ZERO {
                    (e.debit, EntryDirection::Debit)
                } else {
                    (e.credit, EntryDirection::Credit)
                };
                JournalEntryInput {
                    account_id: e.account_id,
                    amount,
                    direction: side.opposite(),
                    memo: e.memo.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    use crate::accounts::NormalBalance;

    fn account(code: &str, is_active: bool) -> AccountRef {
        AccountRef {
            id: AccountId::new(),
            code: code.to_string(),
            name: code.to_string(),
            is_active,
            normal_balance: NormalBalance::DebitIncreasing,
        }
    }

    fn lookup(accounts: &[AccountRef]) -> impl Fn(AccountId) -> Option<AccountRef> + '_ {
        let by_id: HashMap<AccountId, &AccountRef> =
            accounts.iter().map(|a| (a.id, a)).collect();
        move |id| by_id.get(&id).map(|a| (*a).clone())
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    fn entry(account_id: AccountId, amount: Decimal, direction: EntryDirection) -> JournalEntryInput {
        JournalEntryInput {
            account_id,
            amount,
            direction,
            memo: None,
        }
    }

    #[test]
    fn test_balanced_journal_accepted() {
        let accounts = vec![account("1000", true), account("4000", true)];
        let inputs = vec![
            entry(accounts[0].id, dec!(300), EntryDirection::Debit),
            entry(accounts[1].id, dec!(300), EntryDirection::Credit),
        ];

        let draft =
            LedgerPoster::prepare_journal(date(), "Sale", &inputs, lookup(&accounts)).unwrap();
        assert!(draft.totals.is_balanced);
        assert_eq!(draft.totals.debit, dec!(300));
        assert!(draft.reverses.is_none());
        assert!(draft.entries.iter().all(ResolvedJournalEntry::is_single_sided));
    }

    #[test]
    fn test_unbalanced_journal_reports_both_sums() {
        let accounts = vec![account("1000", true), account("4000", true)];
        let inputs = vec![
            entry(accounts[0].id, dec!(300), EntryDirection::Debit),
            entry(accounts[1].id, dec!(120), EntryDirection::Credit),
        ];

        let err = LedgerPoster::prepare_journal(date(), "Sale", &inputs, lookup(&accounts))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::UnbalancedJournal { debit, credit }
                if debit == dec!(300) && credit == dec!(120)
        ));
    }

    #[test]
    fn test_single_entry_rejected() {
        let accounts = vec![account("1000", true)];
        let inputs = vec![entry(accounts[0].id, dec!(100), EntryDirection::Debit)];

        assert!(matches!(
            LedgerPoster::prepare_journal(date(), "Oops", &inputs, lookup(&accounts)),
            Err(LedgerError::InsufficientEntries(1))
        ));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let accounts = vec![account("1000", true), account("4000", true)];
        let inputs = vec![
            entry(accounts[0].id, dec!(0), EntryDirection::Debit),
            entry(accounts[1].id, dec!(0), EntryDirection::Credit),
        ];

        assert!(matches!(
            LedgerPoster::prepare_journal(date(), "Zero", &inputs, lookup(&accounts)),
            Err(LedgerError::NonPositiveAmount { .. })
        ));
    }

    #[test]
    fn test_inactive_and_unknown_accounts_rejected() {
        let accounts = vec![account("1000", true), account("9999", false)];
        let inputs = vec![
            entry(accounts[0].id, dec!(100), EntryDirection::Debit),
            entry(accounts[1].id, dec!(100), EntryDirection::Credit),
        ];
        assert!(matches!(
            LedgerPoster::prepare_journal(date(), "Inactive", &inputs, lookup(&accounts)),
            Err(LedgerError::InactiveAccount { .. })
        ));

        let unknown = AccountId::new();
        let inputs = vec![
            entry(accounts[0].id, dec!(100), EntryDirection::Debit),
            entry(unknown, dec!(100), EntryDirection::Credit),
        ];
        assert!(matches!(
            LedgerPoster::prepare_journal(date(), "Unknown", &inputs, lookup(&accounts)),
            Err(LedgerError::AccountNotFound(id)) if id == unknown
        ));
    }

    #[test]
    fn test_sale_entries_four_legs() {
        // 60 units at 5.00 sold from a 2.00-cost batch.
        let receivable = account("1100", true);
        let revenue = account("4000", true);
        let cogs = account("5000", true);
        let inventory = account("1200", true);
        let all = vec![
            receivable.clone(),
            revenue.clone(),
            cogs.clone(),
            inventory.clone(),
        ];

        let inputs = LedgerPoster::sale_entries(
            SaleAccounts {
                receivable: receivable.id,
                revenue: revenue.id,
                cogs: cogs.id,
                inventory: inventory.id,
            },
            dec!(300.00),
            dec!(120.00),
        );
        assert_eq!(inputs.len(), 4);

        let draft = LedgerPoster::prepare_journal(date(), "Sale", &inputs, lookup(&all)).unwrap();
        assert_eq!(draft.totals.debit, dec!(420.00));
        assert_eq!(draft.totals.credit, dec!(420.00));

        let by_account = |id: AccountId| draft.entries.iter().find(|e| e.account_id == id).unwrap();
        assert_eq!(by_account(receivable.id).debit, dec!(300.00));
        assert_eq!(by_account(revenue.id).credit, dec!(300.00));
        assert_eq!(by_account(cogs.id).debit, dec!(120.00));
        assert_eq!(by_account(inventory.id).credit, dec!(120.00));
    }

    #[test]
    fn test_sale_entries_omit_cost_pair_for_zero_cost() {
        let inputs = LedgerPoster::sale_entries(
            SaleAccounts {
                receivable: AccountId::new(),
                revenue: AccountId::new(),
                cogs: AccountId::new(),
                inventory: AccountId::new(),
            },
            dec!(50.00),
            dec!(0),
        );
        assert_eq!(inputs.len(), 2);
    }

    #[test]
    fn test_purchase_entries() {
        let inventory = account("1200", true);
        let payable = account("2000", true);
        let all = vec![inventory.clone(), payable.clone()];

        let inputs = LedgerPoster::purchase_entries(
            PurchaseAccounts {
                inventory: inventory.id,
                payable: payable.id,
            },
            dec!(200.00),
        );
        let draft =
            LedgerPoster::prepare_journal(date(), "Purchase", &inputs, lookup(&all)).unwrap();
        assert_eq!(draft.totals.debit, dec!(200.00));
        assert!(draft.totals.is_balanced);
    }

    #[test]
    fn test_reversal_swaps_sides_and_links_original() {
        let accounts = vec![account("1100", true), account("4000", true)];
        let inputs = vec![
            entry(accounts[0].id, dec!(300), EntryDirection::Debit),
            entry(accounts[1].id, dec!(300), EntryDirection::Credit),
        ];
        let original =
            LedgerPoster::prepare_journal(date(), "Sale", &inputs, lookup(&accounts)).unwrap();

        let original_id = JournalId::new();
        let reversal = LedgerPoster::prepare_reversal(
            date(),
            "Cancel sale",
            original_id,
            &original.entries,
            lookup(&accounts),
        )
        .unwrap();

        assert_eq!(reversal.reverses, Some(original_id));
        assert!(reversal.totals.is_balanced);
        assert_eq!(reversal.entries[0].credit, dec!(300));
        assert_eq!(reversal.entries[0].debit, dec!(0));
        assert_eq!(reversal.entries[1].debit, dec!(300));
    }

    #[test]
    fn test_reversal_allows_inactive_accounts() {
        // The revenue account was deactivated after posting; cancellation
        // must still go through.
        let accounts = vec![account("1100", true), account("4000", false)];
        let entries = vec![
            ResolvedJournalEntry {
                account_id: accounts[0].id,
                debit: dec!(300),
                credit: dec!(0),
                memo: None,
            },
            ResolvedJournalEntry {
                account_id: accounts[1].id,
                debit: dec!(0),
                credit: dec!(300),
                memo: None,
            },
        ];

        let reversal = LedgerPoster::prepare_reversal(
            date(),
            "Cancel sale",
            JournalId::new(),
            &entries,
            lookup(&accounts),
        );
        assert!(reversal.is_ok());
    }
}
