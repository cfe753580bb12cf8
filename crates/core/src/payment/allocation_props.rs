//! Property-based tests for allocation validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::allocation::AllocationEngine;
use super::error::PaymentError;
use super::types::AllocationCaps;

/// Strategy for positive amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for non-negative amounts (0.00 to 10,000.00).
fn non_negative_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A valid allocation never pushes either running sum past its cap.
    #[test]
    fn prop_caps_never_exceeded(
        payment_amount in positive_amount(),
        payment_allocated in non_negative_amount(),
        transaction_total in positive_amount(),
        transaction_allocated in non_negative_amount(),
        amount in positive_amount(),
    ) {
        prop_assume!(payment_allocated <= payment_amount);
        prop_assume!(transaction_allocated <= transaction_total);

        let caps = AllocationCaps {
            payment_amount,
            payment_allocated,
            transaction_total,
            transaction_allocated,
        };

        match AllocationEngine::validate(&caps, amount) {
            Ok(()) => {
                prop_assert!(payment_allocated + amount <= payment_amount);
                prop_assert!(transaction_allocated + amount <= transaction_total);
            }
            Err(PaymentError::PaymentOverAllocation { .. }) => {
                prop_assert!(payment_allocated + amount > payment_amount);
            }
            Err(PaymentError::TransactionOverAllocation { .. }) => {
                prop_assert!(transaction_allocated + amount > transaction_total);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// Filling exactly to either cap is always allowed.
    #[test]
    fn prop_exact_fill_accepted(
        payment_amount in positive_amount(),
        transaction_total in positive_amount(),
    ) {
        let amount = payment_amount.min(transaction_total);
        let caps = AllocationCaps {
            payment_amount,
            payment_allocated: Decimal::ZERO,
            transaction_total,
            transaction_allocated: Decimal::ZERO,
        };

        prop_assert!(AllocationEngine::validate(&caps, amount).is_ok());
    }
}
