//! Ledger domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kasira_shared::types::{AccountId, JournalId};

/// Which side of the ledger an entry posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryDirection {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

impl EntryDirection {
    /// The opposite side; used when deriving reversing entries.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// One requested journal line before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntryInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Amount; must be strictly positive.
    pub amount: Decimal,
    /// Debit or credit.
    pub direction: EntryDirection,
    /// Optional line memo.
    pub memo: Option<String>,
}

/// A validated journal line with exactly one non-zero side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedJournalEntry {
    /// The account posted to.
    pub account_id: AccountId,
    /// Debit amount; zero when the entry is a credit.
    pub debit: Decimal,
    /// Credit amount; zero when the entry is a debit.
    pub credit: Decimal,
    /// Optional line memo.
    pub memo: Option<String>,
}

impl ResolvedJournalEntry {
    /// Returns true if exactly one of debit/credit is non-zero and the
    /// other is zero.
    #[must_use]
    pub fn is_single_sided(&self) -> bool {
        (self.debit > Decimal::ZERO && self.credit.is_zero())
            || (self.credit > Decimal::ZERO && self.debit.is_zero())
    }
}

/// Debit and credit sums for a journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Sum of all debit amounts.
    pub debit: Decimal,
    /// Sum of all credit amounts.
    pub credit: Decimal,
    /// True when the sums match exactly.
    pub is_balanced: bool,
}

impl JournalTotals {
    /// Computes totals over a set of resolved entries.
    #[must_use]
    pub fn of(entries: &[ResolvedJournalEntry]) -> Self {
        let debit: Decimal = entries.iter().map(|e| e.debit).sum();
        let credit: Decimal = entries.iter().map(|e| e.credit).sum();
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }
}

/// A balanced journal ready for the db layer to append atomically.
///
/// Journals are append-only. A reversal is a new draft carrying
/// `reverses` back to the original; the original is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalDraft {
    /// The posting date.
    pub entry_date: NaiveDate,
    /// Header description.
    pub description: String,
    /// Validated entries, each single-sided.
    pub entries: Vec<ResolvedJournalEntry>,
    /// Balanced totals.
    pub totals: JournalTotals,
    /// Set when this draft reverses a previously posted journal.
    pub reverses: Option<JournalId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(EntryDirection::Debit.opposite(), EntryDirection::Credit);
        assert_eq!(EntryDirection::Credit.opposite(), EntryDirection::Debit);
    }

    #[test]
    fn test_single_sided() {
        let debit = ResolvedJournalEntry {
            account_id: AccountId::new(),
            debit: dec!(100),
            credit: dec!(0),
            memo: None,
        };
        assert!(debit.is_single_sided());

        let both = ResolvedJournalEntry {
            debit: dec!(100),
            credit: dec!(100),
            ..debit.clone()
        };
        assert!(!both.is_single_sided());

        let neither = ResolvedJournalEntry {
            debit: dec!(0),
            credit: dec!(0),
            ..debit
        };
        assert!(!neither.is_single_sided());
    }

    #[test]
    fn test_totals() {
        let entries = vec![
            ResolvedJournalEntry {
                account_id: AccountId::new(),
                debit: dec!(300),
                credit: dec!(0),
                memo: None,
            },
            ResolvedJournalEntry {
                account_id: AccountId::new(),
                debit: dec!(0),
                credit: dec!(300),
                memo: None,
            },
        ];
        let totals = JournalTotals::of(&entries);
        assert!(totals.is_balanced);
        assert_eq!(totals.debit, dec!(300));
    }
}
