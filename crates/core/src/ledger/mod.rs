//! Double-entry journal preparation.
//!
//! Journals are prepared here as pure, fully validated drafts and appended
//! by the db layer inside the same database transaction as their inventory
//! effects. A journal is never mutated after posting; corrections go
//! through linked reversing journals.

pub mod error;
pub mod poster;
pub mod types;

#[cfg(test)]
mod poster_props;

pub use error::LedgerError;
pub use poster::{LedgerPoster, PurchaseAccounts, SaleAccounts};
pub use types::{
    EntryDirection, JournalDraft, JournalEntryInput, JournalTotals, ResolvedJournalEntry,
};
