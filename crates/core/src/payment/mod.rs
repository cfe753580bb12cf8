//! Payment allocation.
//!
//! Payments and transactions are linked many-to-many through allocations.
//! The engine validates against two caps: a payment's allocations never
//! exceed its amount, and a transaction's allocations never exceed its
//! total. Settlement is derived, never stored.

pub mod allocation;
pub mod error;
pub mod types;

#[cfg(test)]
mod allocation_props;

pub use allocation::AllocationEngine;
pub use error::PaymentError;
pub use types::{AllocationCaps, PaymentKind, PaymentMethod};
