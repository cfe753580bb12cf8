//! Lifecycle error types.

use rust_decimal::Decimal;
use thiserror::Error;

use kasira_shared::types::BatchId;

use crate::inventory::InventoryError;
use crate::ledger::LedgerError;

use super::types::TransactionStatus;

/// Errors that can occur while moving a transaction through its lifecycle.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The requested status change is not in the state machine.
    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidStateTransition {
        /// Status the transaction is in.
        from: TransactionStatus,
        /// Status the caller asked for.
        to: TransactionStatus,
    },

    /// Purchases and sales need at least one line to post.
    #[error("Transaction has no lines to post")]
    EmptyTransaction,

    /// Sale prices must be positive.
    #[error("Sale unit price must be positive, got {0}")]
    InvalidUnitPrice(Decimal),

    /// A purchase cannot be cancelled once its stock has been sold.
    #[error("Batch {batch_id} has been partially consumed ({consumed} sold); cancel the consuming sales first")]
    BatchAlreadyConsumed {
        /// The batch created by the purchase being cancelled.
        batch_id: BatchId,
        /// Quantity already drawn from it.
        consumed: Decimal,
    },

    /// Inventory planning or reversal failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Journal preparation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl LifecycleError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::EmptyTransaction => "EMPTY_TRANSACTION",
            Self::InvalidUnitPrice(_) => "INVALID_UNIT_PRICE",
            Self::BatchAlreadyConsumed { .. } => "BATCH_ALREADY_CONSUMED",
            Self::Inventory(err) => err.error_code(),
            Self::Ledger(err) => err.error_code(),
        }
    }
}
