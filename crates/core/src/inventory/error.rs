//! Inventory error types.

use rust_decimal::Decimal;
use thiserror::Error;

use kasira_shared::types::{BatchId, ProductUnitId};

/// Errors that can occur during batch allocation.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Quantity must be positive.
    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(Decimal),

    /// Unit cost must be non-negative.
    #[error("Unit cost must be non-negative, got {0}")]
    InvalidUnitCost(Decimal),

    /// Not enough stock across all eligible batches.
    #[error(
        "Insufficient stock for product unit {product_unit_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        /// The product unit that ran short.
        product_unit_id: ProductUnitId,
        /// Quantity requested.
        requested: Decimal,
        /// Total remaining quantity across eligible batches.
        available: Decimal,
    },

    /// A draw references a batch that is not present.
    #[error("Batch not found: {0}")]
    BatchNotFound(BatchId),

    /// Reversal would push a batch past its original total quantity.
    #[error(
        "Invalid reversal for batch {batch_id}: restoring {restore} onto {remaining} exceeds total {total}"
    )]
    InvalidReversal {
        /// The batch being restored.
        batch_id: BatchId,
        /// Quantity the reversal tried to restore.
        restore: Decimal,
        /// Remaining quantity before the reversal.
        remaining: Decimal,
        /// The batch's original total quantity.
        total: Decimal,
    },

    /// A draw would take more than the batch has remaining.
    #[error("Batch {batch_id} has {remaining} remaining, cannot draw {requested}")]
    DrawExceedsRemaining {
        /// The over-drawn batch.
        batch_id: BatchId,
        /// Remaining quantity on the batch.
        remaining: Decimal,
        /// Quantity the draw asked for.
        requested: Decimal,
    },
}

impl InventoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidUnitCost(_) => "INVALID_UNIT_COST",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::BatchNotFound(_) => "BATCH_NOT_FOUND",
            Self::InvalidReversal { .. } => "INVALID_REVERSAL",
            Self::DrawExceedsRemaining { .. } => "DRAW_EXCEEDS_REMAINING",
        }
    }
}
