//! Inventory repository: locked batch reads and writes.
//!
//! Every function here takes the caller's open database transaction so
//! batch effects commit or roll back together with the journal and the
//! transaction header.

use chrono::Utc;
use sea_orm::sea_query::{LockBehavior, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use kasira_core::inventory::{Batch, BatchDraw};
use kasira_shared::types::{BatchId, ProductUnitId};

use crate::entities::batches;

/// Stateless batch data access; composes into the caller's transaction.
pub struct InventoryRepository;

impl InventoryRepository {
    /// Locks and loads the open batches of the given product units with
    /// `FOR UPDATE NOWAIT`.
    ///
    /// Unrelated product units are never serialized against each other:
    /// only rows of the requested units are touched.
    ///
    /// # Errors
    ///
    /// Returns the raw `DbErr`; callers map `lock_not_available` to
    /// their contention variant.
    pub async fn lock_open_batches(
        txn: &DatabaseTransaction,
        product_unit_ids: &[Uuid],
    ) -> Result<Vec<Batch>, DbErr> {
        let rows = batches::Entity::find()
            .filter(batches::Column::ProductUnitId.is_in(product_unit_ids.iter().copied()))
            .filter(batches::Column::RemainingQuantity.gt(rust_decimal::Decimal::ZERO))
            .order_by_asc(batches::Column::Sequence)
            .lock_with_behavior(LockType::Update, LockBehavior::Nowait)
            .all(txn)
            .await?;

        Ok(rows.into_iter().map(Self::to_domain).collect())
    }

    /// Locks and loads specific batches by ID, open or drained.
    ///
    /// # Errors
    ///
    /// Returns the raw `DbErr`.
    pub async fn lock_batches_by_id(
        txn: &DatabaseTransaction,
        batch_ids: &[Uuid],
    ) -> Result<Vec<Batch>, DbErr> {
        let rows = batches::Entity::find()
            .filter(batches::Column::Id.is_in(batch_ids.iter().copied()))
            .order_by_asc(batches::Column::Sequence)
            .lock_with_behavior(LockType::Update, LockBehavior::Nowait)
            .all(txn)
            .await?;

        Ok(rows.into_iter().map(Self::to_domain).collect())
    }

    /// Locks and loads the batches created by the given purchase lines.
    ///
    /// # Errors
    ///
    /// Returns the raw `DbErr`.
    pub async fn lock_batches_by_purchase_line(
        txn: &DatabaseTransaction,
        purchase_line_ids: &[Uuid],
    ) -> Result<Vec<Batch>, DbErr> {
        let rows = batches::Entity::find()
            .filter(batches::Column::PurchaseLineId.is_in(purchase_line_ids.iter().copied()))
            .order_by_asc(batches::Column::Sequence)
            .lock_with_behavior(LockType::Update, LockBehavior::Nowait)
            .all(txn)
            .await?;

        Ok(rows.into_iter().map(Self::to_domain).collect())
    }

    /// Next receipt sequence value; max over all batches plus one.
    ///
    /// Takes a transaction-scoped advisory lock first, so two purchases
    /// posting at once cannot read the same max. The lock is released at
    /// commit or rollback; `batches.sequence` is additionally UNIQUE as a
    /// backstop.
    ///
    /// # Errors
    ///
    /// Returns the raw `DbErr`.
    pub async fn next_sequence(txn: &DatabaseTransaction) -> Result<i64, DbErr> {
        txn.execute_unprepared("SELECT pg_advisory_xact_lock(hashtext('batches.sequence'))")
            .await?;
        let max: Option<i64> = batches::Entity::find()
            .select_only()
            .column_as(batches::Column::Sequence.max(), "max_sequence")
            .into_tuple()
            .one(txn)
            .await?
            .flatten();
        Ok(max.unwrap_or(0) + 1)
    }

    /// Inserts new batches, pairing each with the purchase line it came
    /// from.
    ///
    /// # Errors
    ///
    /// Returns the raw `DbErr`.
    pub async fn insert_batches(
        txn: &DatabaseTransaction,
        new_batches: &[Batch],
        purchase_line_ids: &[Uuid],
    ) -> Result<(), DbErr> {
        let now = Utc::now();
        for (batch, line_id) in new_batches.iter().zip(purchase_line_ids) {
            batches::ActiveModel {
                id: Set(batch.id.into_inner()),
                product_unit_id: Set(batch.product_unit_id.into_inner()),
                purchase_line_id: Set(Some(*line_id)),
                total_quantity: Set(batch.total_quantity),
                remaining_quantity: Set(batch.remaining_quantity),
                unit_cost: Set(batch.unit_cost),
                production_date: Set(batch.production_date),
                expiry_date: Set(batch.expiry_date),
                sequence: Set(batch.sequence),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(txn)
            .await?;
        }
        Ok(())
    }

    /// Writes a set of draw decrements back to the locked rows.
    ///
    /// # Errors
    ///
    /// Returns the raw `DbErr`.
    pub async fn apply_draws(
        txn: &DatabaseTransaction,
        locked: &mut Vec<Batch>,
        draws: &[BatchDraw],
    ) -> Result<(), DbErr> {
        kasira_core::inventory::BatchAllocator::apply(locked, draws)
            .map_err(|e| DbErr::Custom(e.to_string()))?;
        for draw in draws {
            Self::write_remaining(txn, draw.batch_id, locked).await?;
        }
        Ok(())
    }

    /// Restores drawn quantities onto the locked rows.
    ///
    /// # Errors
    ///
    /// Returns the raw `DbErr`.
    pub async fn restore_draws(
        txn: &DatabaseTransaction,
        locked: &mut Vec<Batch>,
        draws: &[BatchDraw],
    ) -> Result<(), DbErr> {
        kasira_core::inventory::BatchAllocator::reverse(locked, draws)
            .map_err(|e| DbErr::Custom(e.to_string()))?;
        for draw in draws {
            Self::write_remaining(txn, draw.batch_id, locked).await?;
        }
        Ok(())
    }

    async fn write_remaining(
        txn: &DatabaseTransaction,
        batch_id: BatchId,
        batches_state: &[Batch],
    ) -> Result<(), DbErr> {
        let Some(batch) = batches_state.iter().find(|b| b.id == batch_id) else {
            return Err(DbErr::Custom(format!("batch {batch_id} not in working set")));
        };
        let model = batches::ActiveModel {
            id: Set(batch.id.into_inner()),
            remaining_quantity: Set(batch.remaining_quantity),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        model.update(txn).await?;
        Ok(())
    }

    fn to_domain(row: batches::Model) -> Batch {
        Batch {
            id: BatchId::from_uuid(row.id),
            product_unit_id: ProductUnitId::from_uuid(row.product_unit_id),
            total_quantity: row.total_quantity,
            remaining_quantity: row.remaining_quantity,
            unit_cost: row.unit_cost,
            production_date: row.production_date,
            expiry_date: row.expiry_date,
            sequence: row.sequence,
        }
    }
}
