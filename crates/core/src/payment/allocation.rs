//! Allocation validation.
//!
//! Allocations are many-to-many: one payment can settle several
//! transactions (split payment) and one transaction can be settled by
//! several payments (installments). Validation is pure over the cap
//! snapshot; the db layer recomputes the caps under row locks and inserts
//! the allocation in the same transaction.

use rust_decimal::Decimal;

use super::error::PaymentError;
use super::types::AllocationCaps;

/// Stateless allocation validator.
pub struct AllocationEngine;

impl AllocationEngine {
    /// Validates allocating `amount` of a payment against a transaction.
    ///
    /// Allocation never changes the transaction's status; settlement is a
    /// derived view.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` for a zero or negative amount.
    /// - `PaymentOverAllocation` when the payment's allocations would
    ///   exceed its amount.
    /// - `TransactionOverAllocation` when the transaction's allocations
    ///   would exceed its total.
    pub fn validate(caps: &AllocationCaps, amount: Decimal) -> Result<(), PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount(amount));
        }

        let payment_headroom = caps.payment_headroom();
        if amount > payment_headroom {
            return Err(PaymentError::PaymentOverAllocation {
                available: payment_headroom,
                requested: amount,
            });
        }

        let transaction_headroom = caps.transaction_headroom();
        if amount > transaction_headroom {
            return Err(PaymentError::TransactionOverAllocation {
                available: transaction_headroom,
                requested: amount,
            });
        }

        Ok(())
    }
}
