//! Batch allocation: receipt, consumption planning, and reversal.
//!
//! All functions here are pure over batch snapshots. The db layer locks the
//! product unit's batch rows, loads them, runs the planner, and writes the
//! decrements back — all inside one database transaction.

use rust_decimal::Decimal;

use kasira_shared::types::{BatchId, ProductUnitId};

use super::error::InventoryError;
use super::types::{Batch, BatchDraw, ConsumptionPlan, ReceiveBatchInput};

/// Stateless batch allocator.
pub struct BatchAllocator;

impl BatchAllocator {
    /// Validates a receipt and opens a new batch with remaining = total.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` for non-positive quantities and
    /// `InvalidUnitCost` for negative costs.
    pub fn receive(input: &ReceiveBatchInput, sequence: i64) -> Result<Batch, InventoryError> {
        if input.quantity <= Decimal::ZERO {
            return Err(InventoryError::InvalidQuantity(input.quantity));
        }
        if input.unit_cost < Decimal::ZERO {
            return Err(InventoryError::InvalidUnitCost(input.unit_cost));
        }

        Ok(Batch {
            id: BatchId::new(),
            product_unit_id: input.product_unit_id,
            total_quantity: input.quantity,
            remaining_quantity: input.quantity,
            unit_cost: input.unit_cost,
            production_date: input.production_date,
            expiry_date: input.expiry_date,
            sequence,
        })
    }

    /// Plans consumption of `quantity` for one product unit.
    ///
    /// Batches are taken in a deterministic order: earliest expiry date
    /// first (batches without an expiry date last), ties broken by receipt
    /// sequence, then batch id. The plan is all-or-nothing: if the total
    /// remaining quantity is short, nothing is allocated. An empty batch
    /// slice reports zero availability.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` for non-positive requests and
    /// `InsufficientStock` when the eligible batches cannot cover the
    /// request.
    pub fn plan_consumption(
        product_unit_id: ProductUnitId,
        batches: &[Batch],
        quantity: Decimal,
    ) -> Result<ConsumptionPlan, InventoryError> {
        if quantity <= Decimal::ZERO {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        let mut eligible: Vec<&Batch> = batches
            .iter()
            .filter(|b| {
                b.product_unit_id == product_unit_id && b.remaining_quantity > Decimal::ZERO
            })
            .collect();

        // Earliest expiry first, no-expiry batches last, then FIFO.
        eligible.sort_by(|a, b| {
            match (a.expiry_date, b.expiry_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then(a.sequence.cmp(&b.sequence))
            .then(a.id.into_inner().cmp(&b.id.into_inner()))
        });

        let available: Decimal = eligible.iter().map(|b| b.remaining_quantity).sum();
        if available < quantity {
            return Err(InventoryError::InsufficientStock {
                product_unit_id,
                requested: quantity,
                available,
            });
        }

        let mut draws = Vec::new();
        let mut outstanding = quantity;
        for batch in eligible {
            if outstanding.is_zero() {
                break;
            }
            let take = outstanding.min(batch.remaining_quantity);
            draws.push(BatchDraw {
                batch_id: batch.id,
                quantity: take,
                unit_cost: batch.unit_cost,
            });
            outstanding -= take;
        }

        Ok(ConsumptionPlan {
            product_unit_id,
            requested: quantity,
            draws,
        })
    }

    /// Applies draws, decrementing each drawn batch's remaining quantity.
    ///
    /// # Errors
    ///
    /// Returns `BatchNotFound` or `DrawExceedsRemaining` if the batch set
    /// changed since planning; the caller must retry the whole unit in
    /// that case, nothing is partially applied (batches are validated
    /// before any mutation).
    pub fn apply(batches: &mut [Batch], draws: &[BatchDraw]) -> Result<(), InventoryError> {
        // Validate every draw before touching anything.
        for draw in draws {
            let batch = batches
                .iter()
                .find(|b| b.id == draw.batch_id)
                .ok_or(InventoryError::BatchNotFound(draw.batch_id))?;
            if draw.quantity > batch.remaining_quantity {
                return Err(InventoryError::DrawExceedsRemaining {
                    batch_id: batch.id,
                    remaining: batch.remaining_quantity,
                    requested: draw.quantity,
                });
            }
        }

        for draw in draws {
            if let Some(batch) = batches.iter_mut().find(|b| b.id == draw.batch_id) {
                batch.remaining_quantity -= draw.quantity;
            }
        }
        Ok(())
    }

    /// Restores exactly the drawn quantities back to their batches.
    ///
    /// Used on sale cancellation. Fails if a batch no longer exists or the
    /// restoration would exceed the batch's original total; nothing is
    /// restored on failure.
    ///
    /// # Errors
    ///
    /// Returns `BatchNotFound` or `InvalidReversal`.
    pub fn reverse(batches: &mut [Batch], draws: &[BatchDraw]) -> Result<(), InventoryError> {
        for draw in draws {
            let batch = batches
                .iter()
                .find(|b| b.id == draw.batch_id)
                .ok_or(InventoryError::BatchNotFound(draw.batch_id))?;
            if batch.remaining_quantity + draw.quantity > batch.total_quantity {
                return Err(InventoryError::InvalidReversal {
                    batch_id: batch.id,
                    restore: draw.quantity,
                    remaining: batch.remaining_quantity,
                    total: batch.total_quantity,
                });
            }
        }

        for draw in draws {
            if let Some(batch) = batches.iter_mut().find(|b| b.id == draw.batch_id) {
                batch.remaining_quantity += draw.quantity;
            }
        }
        Ok(())
    }
}
