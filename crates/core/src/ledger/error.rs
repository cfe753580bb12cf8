//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;

use kasira_shared::types::{AccountId, JournalId};

/// Errors that can occur while preparing or reversing journals.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Debits and credits do not sum to the same amount.
    #[error("Journal is unbalanced: debits {debit} != credits {credit}")]
    UnbalancedJournal {
        /// Sum of all debit amounts.
        debit: Decimal,
        /// Sum of all credit amounts.
        credit: Decimal,
    },

    /// The referenced account does not accept postings.
    #[error("Account {code} ({id}) is inactive and cannot be posted to")]
    InactiveAccount {
        /// The inactive account's ID.
        id: AccountId,
        /// The inactive account's code.
        code: String,
    },

    /// The referenced account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Every entry amount must be strictly positive.
    #[error("Entry amount for account {account_id} must be positive, got {amount}")]
    NonPositiveAmount {
        /// The account the offending entry targets.
        account_id: AccountId,
        /// The rejected amount.
        amount: Decimal,
    },

    /// A journal needs at least two entries.
    #[error("Journal must have at least 2 entries, got {0}")]
    InsufficientEntries(usize),

    /// The journal to reverse does not exist.
    #[error("Journal not found: {0}")]
    JournalNotFound(JournalId),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnbalancedJournal { .. } => "UNBALANCED_JOURNAL",
            Self::InactiveAccount { .. } => "INACTIVE_ACCOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::NonPositiveAmount { .. } => "NON_POSITIVE_AMOUNT",
            Self::InsufficientEntries(_) => "INSUFFICIENT_ENTRIES",
            Self::JournalNotFound(_) => "JOURNAL_NOT_FOUND",
        }
    }
}
