//! `SeaORM` entity definitions.

pub mod account_categories;
pub mod account_subcategories;
pub mod accounts;
pub mod adjustment_lines;
pub mod batch_draws;
pub mod batches;
pub mod journals;
pub mod ledger_entries;
pub mod payment_allocations;
pub mod payments;
pub mod product_units;
pub mod purchase_lines;
pub mod purchases;
pub mod sale_lines;
pub mod sales;
pub mod sea_orm_active_enums;
pub mod transactions;
