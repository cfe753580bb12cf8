//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Every multi-row write runs inside one database
//! transaction; batch, payment, and transaction rows are locked
//! `FOR UPDATE NOWAIT`, and a lock that cannot be acquired surfaces as a
//! retryable contention error.

pub mod account;
pub mod balance;
pub mod inventory;
pub mod journal;
pub mod payment;
pub mod transaction;

pub use account::{AccountRepository, AccountView, ChartError};
pub use balance::{AccountBalanceView, BalanceError, BalanceRepository, SettlementView};
pub use inventory::InventoryRepository;
pub use journal::{JournalRepository, JournalWithEntries};
pub use payment::{
    AllocateInput, CreatePaymentInput, PaymentRepository, PaymentStoreError, PaymentWithAllocations,
};
pub use transaction::{
    CreateAdjustmentInput, CreatePurchaseInput, CreateSaleInput, TransactionFilter,
    TransactionStoreError, TransactionRepository, TransactionView,
};

use sea_orm::{DbErr, RuntimeErr};

/// Postgres `lock_not_available`, raised by `FOR UPDATE NOWAIT`.
const LOCK_NOT_AVAILABLE: &str = "55P03";

/// Returns true if the error means a NOWAIT row lock could not be taken.
pub(crate) fn is_lock_unavailable(err: &DbErr) -> bool {
    match err {
        DbErr::Query(RuntimeErr::SqlxError(sqlx_err)) | DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => {
            let code = sqlx_err
                .as_database_error()
                .and_then(sqlx::error::DatabaseError::code);
            sqlstate_is_lock_unavailable(code.as_deref())
        }
        _ => false,
    }
}

/// The SQLSTATE-level check behind [`is_lock_unavailable`].
fn sqlstate_is_lock_unavailable(code: Option<&str>) -> bool {
    code == Some(LOCK_NOT_AVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_not_available_sqlstate_matches() {
        assert!(sqlstate_is_lock_unavailable(Some("55P03")));
    }

    #[test]
    fn test_other_sqlstates_are_not_contention() {
        // Deadlock and serialization failures keep their own semantics.
        assert!(!sqlstate_is_lock_unavailable(Some("40P01")));
        assert!(!sqlstate_is_lock_unavailable(Some("40001")));
        assert!(!sqlstate_is_lock_unavailable(Some("23505")));
        assert!(!sqlstate_is_lock_unavailable(None));
    }

    #[test]
    fn test_non_driver_errors_are_not_contention() {
        assert!(!is_lock_unavailable(&DbErr::RecordNotFound(
            "transactions".to_string()
        )));
        assert!(!is_lock_unavailable(&DbErr::Custom("boom".to_string())));
    }
}
