//! Inventory domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kasira_shared::types::{BatchId, ProductUnitId};

/// A discrete receipt of stock with its own cost and remaining quantity.
///
/// Invariant: `0 <= remaining_quantity <= total_quantity` at all times.
/// Remaining only decreases, except for an explicit reversal that restores
/// exactly the consumed quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// The batch ID.
    pub id: BatchId,
    /// The product unit this batch stocks.
    pub product_unit_id: ProductUnitId,
    /// Quantity received; never changes after receipt.
    pub total_quantity: Decimal,
    /// Quantity still available for sale.
    pub remaining_quantity: Decimal,
    /// Cost per unit at receipt.
    pub unit_cost: Decimal,
    /// Optional production date.
    pub production_date: Option<NaiveDate>,
    /// Optional expiry date; drives consumption ordering when present.
    pub expiry_date: Option<NaiveDate>,
    /// Receipt sequence; monotonically assigned, breaks expiry ties (FIFO).
    pub sequence: i64,
}

impl Batch {
    /// Returns true if the quantity invariant holds.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.remaining_quantity >= Decimal::ZERO
            && self.remaining_quantity <= self.total_quantity
    }

    /// Total cost of the quantity originally received.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        self.total_quantity * self.unit_cost
    }
}

/// Input for receiving a new batch from a purchase line.
#[derive(Debug, Clone)]
pub struct ReceiveBatchInput {
    /// The product unit being stocked.
    pub product_unit_id: ProductUnitId,
    /// Quantity received; must be positive.
    pub quantity: Decimal,
    /// Cost per unit; must be non-negative.
    pub unit_cost: Decimal,
    /// Optional production date.
    pub production_date: Option<NaiveDate>,
    /// Optional expiry date.
    pub expiry_date: Option<NaiveDate>,
}

/// One draw from a batch within a consumption plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDraw {
    /// The batch drawn from.
    pub batch_id: BatchId,
    /// Quantity taken from this batch.
    pub quantity: Decimal,
    /// The batch's unit cost, recorded for cost-of-goods calculation.
    pub unit_cost: Decimal,
}

impl BatchDraw {
    /// Cost of this draw: quantity × unit cost.
    #[must_use]
    pub fn cost(&self) -> Decimal {
        self.quantity * self.unit_cost
    }
}

/// The weighted cost breakdown for one consumption request.
///
/// Cost of goods sold for the request is `total_cost()`, the sum of
/// `quantity × unit_cost` over all draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionPlan {
    /// The product unit consumed.
    pub product_unit_id: ProductUnitId,
    /// The quantity originally requested.
    pub requested: Decimal,
    /// Draws in allocation order.
    pub draws: Vec<BatchDraw>,
}

impl ConsumptionPlan {
    /// Total quantity drawn; equals `requested` for a valid plan.
    #[must_use]
    pub fn total_quantity(&self) -> Decimal {
        self.draws.iter().map(|d| d.quantity).sum()
    }

    /// Cost of goods sold: `Σ quantity × unit_cost`.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        self.draws.iter().map(BatchDraw::cost).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn batch(remaining: Decimal, total: Decimal) -> Batch {
        Batch {
            id: BatchId::new(),
            product_unit_id: ProductUnitId::new(),
            total_quantity: total,
            remaining_quantity: remaining,
            unit_cost: dec!(2.00),
            production_date: None,
            expiry_date: None,
            sequence: 1,
        }
    }

    #[test]
    fn test_batch_consistency() {
        assert!(batch(dec!(40), dec!(100)).is_consistent());
        assert!(batch(dec!(0), dec!(100)).is_consistent());
        assert!(batch(dec!(100), dec!(100)).is_consistent());
        assert!(!batch(dec!(-1), dec!(100)).is_consistent());
        assert!(!batch(dec!(101), dec!(100)).is_consistent());
    }

    #[test]
    fn test_plan_totals() {
        let plan = ConsumptionPlan {
            product_unit_id: ProductUnitId::new(),
            requested: dec!(60),
            draws: vec![
                BatchDraw {
                    batch_id: BatchId::new(),
                    quantity: dec!(50),
                    unit_cost: dec!(2.00),
                },
                BatchDraw {
                    batch_id: BatchId::new(),
                    quantity: dec!(10),
                    unit_cost: dec!(2.50),
                },
            ],
        };

        assert_eq!(plan.total_quantity(), dec!(60));
        assert_eq!(plan.total_cost(), dec!(125.00));
    }
}
