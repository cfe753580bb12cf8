//! Inventory batch (lot) allocation.
//!
//! Batches are created on purchase posting and consumed on sale posting in
//! a deterministic order: earliest expiry first, then first-in-first-out by
//! receipt sequence. Consumption is planned here as a pure calculation and
//! applied by the db layer inside one database transaction.

pub mod allocator;
pub mod error;
pub mod types;

#[cfg(test)]
mod allocator_props;

pub use allocator::BatchAllocator;
pub use error::InventoryError;
pub use types::{Batch, BatchDraw, ConsumptionPlan, ReceiveBatchInput};
