//! Core business logic for Kasira.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here; the db crate applies the plans produced here inside one database
//! transaction.
//!
//! # Modules
//!
//! - `accounts` - Chart of accounts directory and normal-balance polarity
//! - `inventory` - Batch (lot) allocation: expiry/FIFO costing
//! - `ledger` - Double-entry journal preparation and reversal
//! - `payment` - Payment allocation caps
//! - `balance` - Derived balances and settlement status
//! - `lifecycle` - Transaction state machine and posting plans

pub mod accounts;
pub mod balance;
pub mod inventory;
pub mod ledger;
pub mod lifecycle;
pub mod payment;
