//! Payment error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while allocating payments.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Allocation amounts must be positive.
    #[error("Allocation amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// Allocating would push the payment past its own amount.
    #[error(
        "Allocation of {requested} exceeds the payment's unallocated amount {available}"
    )]
    PaymentOverAllocation {
        /// Unallocated headroom on the payment.
        available: Decimal,
        /// Amount the allocation asked for.
        requested: Decimal,
    },

    /// Allocating would push the transaction past its total.
    #[error(
        "Allocation of {requested} exceeds the transaction's unsettled amount {available}"
    )]
    TransactionOverAllocation {
        /// Unsettled headroom on the transaction.
        available: Decimal,
        /// Amount the allocation asked for.
        requested: Decimal,
    },
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_ALLOCATION_AMOUNT",
            Self::PaymentOverAllocation { .. } => "PAYMENT_OVER_ALLOCATION",
            Self::TransactionOverAllocation { .. } => "TRANSACTION_OVER_ALLOCATION",
        }
    }
}
