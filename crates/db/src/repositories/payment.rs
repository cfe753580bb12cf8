//! Payment repository: payments and their allocations.
//!
//! Allocation caps are recomputed from stored rows under `FOR UPDATE
//! NOWAIT` locks on both the payment and the target transaction, then
//! validated by the pure engine and written in the same database
//! transaction.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{LockBehavior, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kasira_core::lifecycle::TransactionStatus;
use kasira_core::payment::{AllocationCaps, AllocationEngine, PaymentError, PaymentKind, PaymentMethod};
use kasira_shared::types::ActorContext;

use crate::entities::{payment_allocations, payments, transactions};
use crate::repositories::is_lock_unavailable;
use crate::repositories::transaction::derive_total;

/// Error types for payment store operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentStoreError {
    /// No payment row with the given ID.
    #[error("Payment {0} not found")]
    PaymentNotFound(Uuid),

    /// No transaction row with the given ID.
    #[error("Transaction {0} not found")]
    TransactionNotFound(Uuid),

    /// No allocation row with the given ID under this payment.
    #[error("Allocation {0} not found on this payment")]
    AllocationNotFound(Uuid),

    /// A cap or amount rule rejected the allocation.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// The request shape is invalid.
    #[error("{0}")]
    Validation(String),

    /// A `FOR UPDATE NOWAIT` lock could not be taken; retry the request.
    #[error("Another operation holds a lock on the affected rows; retry")]
    Contention,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl PaymentStoreError {
    fn from_lock(err: DbErr) -> Self {
        if is_lock_unavailable(&err) {
            Self::Contention
        } else {
            Self::Database(err)
        }
    }

    /// Stable machine-readable code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::AllocationNotFound(_) => "ALLOCATION_NOT_FOUND",
            Self::Payment(err) => err.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Contention => "CONTENTION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Input for recording a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentInput {
    /// Receipt or disbursement.
    pub kind: PaymentKind,
    /// How the money moved.
    pub method: PaymentMethod,
    /// Full payment amount; must be positive.
    pub amount: Decimal,
    /// When the money moved.
    pub paid_at: NaiveDate,
    /// Optional free-form note.
    pub memo: Option<String>,
}

/// Input for allocating part of a payment to a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateInput {
    /// The transaction being settled.
    pub transaction_id: Uuid,
    /// Amount to allocate; must be positive and within both caps.
    pub amount: Decimal,
}

/// A payment with its allocations and allocated sum.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentWithAllocations {
    /// The stored payment.
    pub payment: payments::Model,
    /// Its allocations, oldest first.
    pub allocations: Vec<payment_allocations::Model>,
    /// Sum of allocation amounts.
    pub allocated: Decimal,
}

/// Repository for payments and allocations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: Arc<DatabaseConnection>,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Records a payment. Allocation happens separately.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for a non-positive amount; `Database` on write
    /// failure.
    pub async fn create(
        &self,
        input: &CreatePaymentInput,
        actor: &ActorContext,
    ) -> Result<payments::Model, PaymentStoreError> {
        if input.amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount(input.amount).into());
        }

        let now = Utc::now();
        let payment = payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            kind: Set(input.kind.into()),
            method: Set(input.method.into()),
            amount: Set(input.amount),
            paid_at: Set(input.paid_at),
            memo: Set(input.memo.clone()),
            created_by: Set(actor.actor_id.into_inner()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(self.db.as_ref())
        .await?;
        Ok(payment)
    }

    /// Loads a payment with its allocations.
    ///
    /// # Errors
    ///
    /// `PaymentNotFound` for a missing row; `Database` on query failure.
    pub async fn get_with_allocations(
        &self,
        id: Uuid,
    ) -> Result<PaymentWithAllocations, PaymentStoreError> {
        let payment = payments::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(PaymentStoreError::PaymentNotFound(id))?;
        let allocations = payment
            .find_related(payment_allocations::Entity)
            .all(self.db.as_ref())
            .await?;
        let allocated = allocations.iter().map(|a| a.amount).sum();
        Ok(PaymentWithAllocations {
            payment,
            allocations,
            allocated,
        })
    }

    /// Allocates part of a payment to a posted transaction.
    ///
    /// Both rows are locked `FOR UPDATE NOWAIT`, the caps recomputed
    /// from stored allocations, and the insert committed atomically, so
    /// concurrent allocations cannot overshoot either cap.
    ///
    /// # Errors
    ///
    /// Cap violations from the engine pass through; `Validation` when
    /// the target transaction is not posted; `Contention` on lock
    /// conflicts.
    pub async fn allocate(
        &self,
        payment_id: Uuid,
        input: &AllocateInput,
        actor: &ActorContext,
    ) -> Result<payment_allocations::Model, PaymentStoreError> {
        let txn = self.db.begin().await?;

        let payment = Self::lock_payment(&txn, payment_id).await?;
        let transaction = transactions::Entity::find_by_id(input.transaction_id)
            .filter(transactions::Column::DeletedAt.is_null())
            .lock_with_behavior(LockType::Update, LockBehavior::Nowait)
            .one(&txn)
            .await
            .map_err(PaymentStoreError::from_lock)?
            .ok_or(PaymentStoreError::TransactionNotFound(input.transaction_id))?;

        let status: TransactionStatus = transaction.status.into();
        if status != TransactionStatus::Posted {
            return Err(PaymentStoreError::Validation(format!(
                "Transaction {} is not posted; only posted transactions can be settled",
                transaction.id
            )));
        }

        let payment_allocated: Decimal = payment_allocations::Entity::find()
            .filter(payment_allocations::Column::PaymentId.eq(payment_id))
            .all(&txn)
            .await?
            .iter()
            .map(|a| a.amount)
            .sum();
        let transaction_allocated: Decimal = payment_allocations::Entity::find()
            .filter(payment_allocations::Column::TransactionId.eq(input.transaction_id))
            .all(&txn)
            .await?
            .iter()
            .map(|a| a.amount)
            .sum();
        let transaction_total = derive_total(&txn, &transaction).await?;

        let caps = AllocationCaps {
            payment_amount: payment.amount,
            payment_allocated,
            transaction_total,
            transaction_allocated,
        };
        AllocationEngine::validate(&caps, input.amount)?;

        let allocation = payment_allocations::ActiveModel {
            id: Set(Uuid::now_v7()),
            payment_id: Set(payment_id),
            transaction_id: Set(input.transaction_id),
            amount: Set(input.amount),
            created_by: Set(actor.actor_id.into_inner()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(allocation)
    }

    /// Removes an allocation, freeing its amount on both sides.
    ///
    /// # Errors
    ///
    /// `AllocationNotFound` when the allocation does not exist or
    /// belongs to a different payment; `Contention` on lock conflicts.
    pub async fn deallocate(
        &self,
        payment_id: Uuid,
        allocation_id: Uuid,
    ) -> Result<(), PaymentStoreError> {
        let txn = self.db.begin().await?;
        Self::lock_payment(&txn, payment_id).await?;

        let allocation = payment_allocations::Entity::find_by_id(allocation_id)
            .filter(payment_allocations::Column::PaymentId.eq(payment_id))
            .one(&txn)
            .await?
            .ok_or(PaymentStoreError::AllocationNotFound(allocation_id))?;

        allocation.delete(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn lock_payment(
        txn: &DatabaseTransaction,
        payment_id: Uuid,
    ) -> Result<payments::Model, PaymentStoreError> {
        payments::Entity::find_by_id(payment_id)
            .lock_with_behavior(LockType::Update, LockBehavior::Nowait)
            .one(txn)
            .await
            .map_err(PaymentStoreError::from_lock)?
            .ok_or(PaymentStoreError::PaymentNotFound(payment_id))
    }
}
