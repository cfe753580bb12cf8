//! Transaction lifecycle domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kasira_shared::types::ProductUnitId;

/// What a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Stock received from a supplier.
    Purchase,
    /// Stock sold to a customer.
    Sale,
    /// Caller-supplied balanced journal with no inventory effect.
    Adjustment,
}

/// Lifecycle state of a transaction.
///
/// Allowed transitions: `Draft -> Posted`, `Draft -> Cancelled`,
/// `Posted -> Cancelled`. Everything else is rejected; history is never
/// deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Editable, no ledger or inventory effect yet.
    Draft,
    /// Posted to the ledger; inventory effects applied.
    Posted,
    /// Terminal. A posted transaction keeps its journal plus a linked
    /// reversal; a draft just stops here.
    Cancelled,
}

/// The external party on a purchase or sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Counterparty {
    /// An individual.
    Person(Uuid),
    /// A business.
    Company(Uuid),
}

/// One line of a draft purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLineInput {
    /// The product unit received.
    pub product_unit_id: ProductUnitId,
    /// Quantity received; must be positive.
    pub quantity: Decimal,
    /// Cost per unit; must be non-negative.
    pub unit_cost: Decimal,
    /// Optional production date for the resulting batch.
    pub production_date: Option<NaiveDate>,
    /// Optional expiry date for the resulting batch.
    pub expiry_date: Option<NaiveDate>,
}

impl PurchaseLineInput {
    /// Line total: quantity × unit cost.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.quantity * self.unit_cost
    }
}

/// One line of a draft sale.
///
/// Cost of goods is never stored here; it is derived from consumed
/// batches at posting time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineInput {
    /// The product unit sold.
    pub product_unit_id: ProductUnitId,
    /// Quantity sold; must be positive.
    pub quantity: Decimal,
    /// Sale price per unit; must be positive.
    pub unit_price: Decimal,
}

impl SaleLineInput {
    /// Line total: quantity × unit price.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}
