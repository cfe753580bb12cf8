//! Derived balance reads.

pub mod calculator;

pub use calculator::{AccountBalance, BalanceCalculator, PostedEntry, SettlementStatus};
