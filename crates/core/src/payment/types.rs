//! Payment domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Money received, typically settling sales.
    Receipt,
    /// Money paid out, typically settling purchases.
    Disbursement,
}

/// How the payment moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Card payment.
    Card,
    /// Cheque.
    Cheque,
}

/// The two running sums an allocation is validated against.
///
/// Both are recomputed from stored allocations at validation time, inside
/// the same database transaction that inserts the new allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationCaps {
    /// The payment's full amount.
    pub payment_amount: Decimal,
    /// Sum of the payment's existing allocations.
    pub payment_allocated: Decimal,
    /// The target transaction's derived total.
    pub transaction_total: Decimal,
    /// Sum of the transaction's existing allocations, across all payments.
    pub transaction_allocated: Decimal,
}

impl AllocationCaps {
    /// Amount of the payment not yet allocated.
    #[must_use]
    pub fn payment_headroom(&self) -> Decimal {
        self.payment_amount - self.payment_allocated
    }

    /// Amount of the transaction not yet covered by allocations.
    #[must_use]
    pub fn transaction_headroom(&self) -> Decimal {
        self.transaction_total - self.transaction_allocated
    }
}
