//! Transaction lifecycle: state machine and posting plans.
//!
//! A transaction moves `Draft -> Posted -> Cancelled` (a draft can also be
//! cancelled directly). Posting composes the batch allocator and journal
//! poster into a single plan; cancellation produces the symmetric reversal.
//! The db layer applies a plan atomically or not at all.

pub mod error;
pub mod posting;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LifecycleError;
pub use posting::{
    PostingPlanner, PurchaseCancellationPlan, PurchasePostingPlan, SaleCancellationPlan,
    SalePostingPlan,
};
pub use service::LifecycleService;
pub use types::{
    Counterparty, PurchaseLineInput, SaleLineInput, TransactionKind, TransactionStatus,
};
