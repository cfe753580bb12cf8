//! Balance repository: derived balance and settlement reads.
//!
//! Nothing here writes. Balances are folded from posted ledger entries
//! and settlement from stored allocations, every time they are asked
//! for.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use serde::Serialize;
use uuid::Uuid;

use kasira_core::accounts::NormalBalance;
use kasira_core::balance::{BalanceCalculator, PostedEntry, SettlementStatus};
use kasira_shared::types::{AccountId, Currency, Money};

use crate::entities::{ledger_entries, payment_allocations, transactions};
use crate::repositories::account::{AccountRepository, ChartError};
use crate::repositories::transaction::derive_total;

/// Error types for balance reads.
#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    /// No account row with the given ID.
    #[error("Account {0} not found")]
    AccountNotFound(Uuid),

    /// No transaction row with the given ID.
    #[error("Transaction {0} not found")]
    TransactionNotFound(Uuid),

    /// The stored chart is inconsistent.
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl BalanceError {
    /// Stable machine-readable code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::Chart(_) => "CHART_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// An account's balance as of a date.
#[derive(Debug, Clone, Serialize)]
pub struct AccountBalanceView {
    /// The account.
    pub account_id: Uuid,
    /// Sum of debit amounts in scope.
    pub debit_total: Decimal,
    /// Sum of credit amounts in scope.
    pub credit_total: Decimal,
    /// The balance in the account's natural direction, in the
    /// deployment currency.
    pub balance: Money,
    /// Which direction increases this account.
    pub normal_balance: NormalBalance,
    /// The inclusive cutoff date, when one was given.
    pub as_of: Option<NaiveDate>,
}

/// A transaction's settlement position.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementView {
    /// The transaction.
    pub transaction_id: Uuid,
    /// Derived transaction total.
    pub total: Money,
    /// Sum of allocations against the transaction.
    pub allocated: Money,
    /// Unpaid, partially paid, paid, or overpaid.
    pub status: SettlementStatus,
}

/// Repository for derived balance reads.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: Arc<DatabaseConnection>,
    currency: Currency,
}

impl BalanceRepository {
    /// Creates a new balance repository reporting amounts in the
    /// deployment currency.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, currency: Currency) -> Self {
        Self { db, currency }
    }

    /// Folds an account's posted entries into its balance as of a date
    /// (all entries when `as_of` is `None`; the cutoff is inclusive).
    ///
    /// Reversals are ordinary entries here, so a cancelled transaction
    /// nets to zero without special casing.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` for an unknown account; `Database` on query
    /// failure.
    pub async fn account_balance(
        &self,
        account_id: Uuid,
        as_of: Option<NaiveDate>,
    ) -> Result<AccountBalanceView, BalanceError> {
        let directory = AccountRepository::new(self.db.clone()).load_directory().await?;
        let account = directory
            .resolve(AccountId::from_uuid(account_id))
            .map_err(|_| BalanceError::AccountNotFound(account_id))?
            .clone();

        let rows = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::AccountId.eq(account_id))
            .find_also_related(crate::entities::journals::Entity)
            .all(self.db.as_ref())
            .await?;

        let entries: Vec<PostedEntry> = rows
            .into_iter()
            .filter_map(|(entry, journal)| {
                journal.map(|j| PostedEntry {
                    entry_date: j.entry_date,
                    debit: entry.debit,
                    credit: entry.credit,
                })
            })
            .collect();

        let balance = BalanceCalculator::account_balance(&entries, as_of);
        Ok(AccountBalanceView {
            account_id,
            debit_total: balance.debit_total,
            credit_total: balance.credit_total,
            balance: Money::new(balance.natural(account.normal_balance), self.currency),
            normal_balance: account.normal_balance,
            as_of,
        })
    }

    /// Derives a transaction's settlement position from its total and
    /// its stored allocations.
    ///
    /// # Errors
    ///
    /// `TransactionNotFound` for a missing or soft-deleted row;
    /// `Database` on query failure.
    pub async fn transaction_settlement(
        &self,
        transaction_id: Uuid,
    ) -> Result<SettlementView, BalanceError> {
        let header = transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await?
            .ok_or(BalanceError::TransactionNotFound(transaction_id))?;

        let total = derive_total(self.db.as_ref(), &header).await?;
        let allocated: Decimal = payment_allocations::Entity::find()
            .filter(payment_allocations::Column::TransactionId.eq(transaction_id))
            .all(self.db.as_ref())
            .await?
            .iter()
            .map(|a| a.amount)
            .sum();

        Ok(SettlementView {
            transaction_id,
            total: Money::new(total, self.currency),
            allocated: Money::new(allocated, self.currency),
            status: BalanceCalculator::settlement_status(total, allocated),
        })
    }
}
