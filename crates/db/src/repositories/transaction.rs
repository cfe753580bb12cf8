//! Transaction repository: draft creation, posting, and cancellation.
//!
//! Posting and cancellation run the pure planners from the core crate
//! against rows locked `FOR UPDATE NOWAIT`, then apply the resulting
//! plan inside one database transaction. A lock that cannot be taken
//! surfaces as `Contention`, the only retryable error here.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{LockBehavior, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kasira_core::accounts::{AccountDirectory, AccountRef};
use kasira_core::inventory::BatchDraw;
use kasira_core::ledger::{JournalEntryInput, LedgerPoster, ResolvedJournalEntry};
use kasira_core::lifecycle::{
    Counterparty, LifecycleError, LifecycleService, PostingPlanner, PurchaseLineInput,
    SaleLineInput, TransactionKind, TransactionStatus,
};
use kasira_shared::types::{
    AccountId, ActorContext, BatchId, JournalId, PageRequest, PageResponse, ProductUnitId,
};

use crate::entities::sea_orm_active_enums::CounterpartyType;
use crate::entities::{
    adjustment_lines, batch_draws, ledger_entries, purchase_lines, purchases, sale_lines, sales,
    transactions,
};
use crate::repositories::account::{AccountRepository, ChartError};
use crate::repositories::inventory::InventoryRepository;
use crate::repositories::journal::JournalRepository;
use crate::repositories::is_lock_unavailable;

/// Error types for transaction store operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionStoreError {
    /// No transaction row with the given ID.
    #[error("Transaction {0} not found")]
    NotFound(Uuid),

    /// A lifecycle, inventory, or ledger rule rejected the operation.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The chart of accounts could not satisfy the posting.
    #[error(transparent)]
    Chart(#[from] ChartError),

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

impl TransactionStoreError {
    /// Maps a lock-acquisition failure to `Contention`, everything else
    /// to `Database`.
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
            Self::NotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::Lifecycle(err) => err.error_code(),
            Self::Chart(ChartError::MissingPostingAccount(_)) => "MISSING_POSTING_ACCOUNT",
            Self::Chart(_) => "CHART_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Contention => "CONTENTION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Input for creating a draft purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePurchaseInput {
    /// Posting date.
    pub entry_date: NaiveDate,
    /// Header description.
    pub description: String,
    /// The supplier.
    pub counterparty: Counterparty,
    /// At least one line.
    pub lines: Vec<PurchaseLineInput>,
}

/// Input for creating a draft sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSaleInput {
    /// Posting date.
    pub entry_date: NaiveDate,
    /// Header description.
    pub description: String,
    /// The customer.
    pub counterparty: Counterparty,
    /// At least one line.
    pub lines: Vec<SaleLineInput>,
}

/// Input for creating a draft adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdjustmentInput {
    /// Posting date.
    pub entry_date: NaiveDate,
    /// Header description.
    pub description: String,
    /// At least two lines; balance is enforced at posting.
    pub entries: Vec<JournalEntryInput>,
}

/// Filters for transaction listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    /// Only this lifecycle status.
    pub status: Option<TransactionStatus>,
    /// Only this kind.
    pub kind: Option<TransactionKind>,
    /// Inclusive lower bound on entry date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on entry date.
    pub to: Option<NaiveDate>,
}

/// A transaction header with its derived total.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    /// The stored header.
    pub transaction: transactions::Model,
    /// Derived total: `Σ quantity × unit_cost` for purchases,
    /// `Σ quantity × unit_price` for sales, the debit sum for
    /// adjustments.
    pub total: Decimal,
    /// Counterparty, for purchases and sales.
    pub counterparty: Option<Counterparty>,
}

/// Repository for the transaction lifecycle.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: Arc<DatabaseConnection>,
    accounts: AccountRepository,
    posting_codes: kasira_shared::config::PostingAccountCodes,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        posting_codes: kasira_shared::config::PostingAccountCodes,
    ) -> Self {
        let accounts = AccountRepository::new(db.clone());
        Self {
            db,
            accounts,
            posting_codes,
        }
    }

    /// Creates a draft purchase with its header and lines.
    ///
    /// # Errors
    ///
    /// `EmptyTransaction` without lines; line values are validated at
    /// posting time.
    pub async fn create_purchase(
        &self,
        input: &CreatePurchaseInput,
        actor: &ActorContext,
    ) -> Result<transactions::Model, TransactionStoreError> {
        if input.lines.is_empty() {
            return Err(LifecycleError::EmptyTransaction.into());
        }

        let txn = self.db.begin().await?;
        let header = Self::insert_header(
            &txn,
            TransactionKind::Purchase,
            input.entry_date,
            &input.description,
            actor,
        )
        .await?;

        let (counterparty_type, counterparty_id) = counterparty_columns(input.counterparty);
        let now = Utc::now();
        purchases::ActiveModel {
            transaction_id: Set(header.id),
            counterparty_type: Set(counterparty_type),
            counterparty_id: Set(counterparty_id),
            actor_id: Set(actor.actor_id.into_inner()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        for line in &input.lines {
            purchase_lines::ActiveModel {
                id: Set(Uuid::now_v7()),
                transaction_id: Set(header.id),
                product_unit_id: Set(line.product_unit_id.into_inner()),
                quantity: Set(line.quantity),
                unit_cost: Set(line.unit_cost),
                production_date: Set(line.production_date),
                expiry_date: Set(line.expiry_date),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(header)
    }

    /// Creates a draft sale with its header and lines.
    ///
    /// # Errors
    ///
    /// `EmptyTransaction` without lines, `InvalidUnitPrice` for a
    /// non-positive price. Stock is not checked until posting.
    pub async fn create_sale(
        &self,
        input: &CreateSaleInput,
        actor: &ActorContext,
    ) -> Result<transactions::Model, TransactionStoreError> {
        if input.lines.is_empty() {
            return Err(LifecycleError::EmptyTransaction.into());
        }
        for line in &input.lines {
            if line.unit_price <= Decimal::ZERO {
                return Err(LifecycleError::InvalidUnitPrice(line.unit_price).into());
            }
        }

        let txn = self.db.begin().await?;
        let header = Self::insert_header(
            &txn,
            TransactionKind::Sale,
            input.entry_date,
            &input.description,
            actor,
        )
        .await?;

        let (counterparty_type, counterparty_id) = counterparty_columns(input.counterparty);
        let now = Utc::now();
        sales::ActiveModel {
            transaction_id: Set(header.id),
            counterparty_type: Set(counterparty_type),
            counterparty_id: Set(counterparty_id),
            actor_id: Set(actor.actor_id.into_inner()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        for line in &input.lines {
            sale_lines::ActiveModel {
                id: Set(Uuid::now_v7()),
                transaction_id: Set(header.id),
                product_unit_id: Set(line.product_unit_id.into_inner()),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(header)
    }

    /// Creates a draft adjustment holding the caller's journal lines.
    ///
    /// # Errors
    ///
    /// `EmptyTransaction` without entries; balance is enforced at
    /// posting.
    pub async fn create_adjustment(
        &self,
        input: &CreateAdjustmentInput,
        actor: &ActorContext,
    ) -> Result<transactions::Model, TransactionStoreError> {
        if input.entries.is_empty() {
            return Err(LifecycleError::EmptyTransaction.into());
        }

        let txn = self.db.begin().await?;
        let header = Self::insert_header(
            &txn,
            TransactionKind::Adjustment,
            input.entry_date,
            &input.description,
            actor,
        )
        .await?;

        let now = Utc::now();
        for entry in &input.entries {
            adjustment_lines::ActiveModel {
                id: Set(Uuid::now_v7()),
                transaction_id: Set(header.id),
                account_id: Set(entry.account_id.into_inner()),
                amount: Set(entry.amount),
                is_debit: Set(matches!(
                    entry.direction,
                    kasira_core::ledger::EntryDirection::Debit
                )),
                memo: Set(entry.memo.clone()),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(header)
    }

    /// Posts a draft transaction: applies its inventory effects and
    /// appends its journal atomically, then moves it to `Posted`.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing row, `InvalidStateTransition` outside
    /// draft, `Contention` when a required row lock is held elsewhere;
    /// planner errors pass through.
    pub async fn post(
        &self,
        id: Uuid,
        actor: &ActorContext,
    ) -> Result<transactions::Model, TransactionStoreError> {
        let directory = self.accounts.load_directory().await?;
        let (purchase_accounts, sale_accounts) =
            AccountRepository::resolve_posting_accounts_in(&directory, &self.posting_codes)?;
        let lookup = directory_lookup(&directory);

        let txn = self.db.begin().await?;
        let header = Self::lock_header(&txn, id).await?;
        let status: TransactionStatus = header.status.into();
        LifecycleService::validate_transition(status, TransactionStatus::Posted)?;

        let journal_id = match header.kind.into() {
            TransactionKind::Purchase => {
                let lines = Self::load_purchase_lines(&txn, id).await?;
                let line_ids: Vec<Uuid> = lines.iter().map(|l| l.id).collect();
                let inputs: Vec<PurchaseLineInput> =
                    lines.iter().map(purchase_line_input).collect();

                let next_sequence = InventoryRepository::next_sequence(&txn).await?;
                let plan = PostingPlanner::plan_purchase(
                    header.entry_date,
                    &header.description,
                    &inputs,
                    purchase_accounts,
                    next_sequence,
                    &lookup,
                )?;

                InventoryRepository::insert_batches(&txn, &plan.batches, &line_ids).await?;
                match &plan.journal {
                    Some(draft) => Some(
                        JournalRepository::append(&txn, draft, actor.actor_id.into_inner())
                            .await?
                            .id,
                    ),
                    None => None,
                }
            }
            TransactionKind::Sale => {
                let lines = Self::load_sale_lines(&txn, id).await?;
                let inputs: Vec<SaleLineInput> = lines.iter().map(sale_line_input).collect();

                let mut unit_ids: Vec<Uuid> =
                    lines.iter().map(|l| l.product_unit_id).collect();
                unit_ids.sort_unstable();
                unit_ids.dedup();

                let mut locked = InventoryRepository::lock_open_batches(&txn, &unit_ids)
                    .await
                    .map_err(TransactionStoreError::from_lock)?;

                let plan = PostingPlanner::plan_sale(
                    header.entry_date,
                    &header.description,
                    &inputs,
                    &locked,
                    sale_accounts,
                    &lookup,
                )?;

                let now = Utc::now();
                for consumption in &plan.consumptions {
                    InventoryRepository::apply_draws(&txn, &mut locked, &consumption.draws)
                        .await?;
                    for draw in &consumption.draws {
                        batch_draws::ActiveModel {
                            id: Set(Uuid::now_v7()),
                            transaction_id: Set(id),
                            batch_id: Set(draw.batch_id.into_inner()),
                            quantity: Set(draw.quantity),
                            unit_cost: Set(draw.unit_cost),
                            created_at: Set(now.into()),
                        }
                        .insert(&txn)
                        .await?;
                    }
                }

                Some(
                    JournalRepository::append(&txn, &plan.journal, actor.actor_id.into_inner())
                        .await?
                        .id,
                )
            }
            TransactionKind::Adjustment => {
                let entries = Self::load_adjustment_entries(&txn, id).await?;
                let draft = PostingPlanner::plan_adjustment(
                    header.entry_date,
                    &header.description,
                    &entries,
                    &lookup,
                )?;
                Some(
                    JournalRepository::append(&txn, &draft, actor.actor_id.into_inner())
                        .await?
                        .id,
                )
            }
        };

        let updated = Self::finalize_header(
            &txn,
            header,
            TransactionStatus::Posted,
            journal_id,
            actor,
        )
        .await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Cancels a transaction. A draft simply stops; a posted transaction
    /// gets a linked reversing journal and its inventory effects undone.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidStateTransition` from a cancelled state,
    /// `BatchAlreadyConsumed` when cancelling a purchase whose stock has
    /// been sold, `Contention` on lock conflicts.
    pub async fn cancel(
        &self,
        id: Uuid,
        actor: &ActorContext,
    ) -> Result<transactions::Model, TransactionStoreError> {
        let directory = self.accounts.load_directory().await?;
        let lookup = directory_lookup(&directory);

        let txn = self.db.begin().await?;
        let header = Self::lock_header(&txn, id).await?;
        let status: TransactionStatus = header.status.into();
        LifecycleService::validate_transition(status, TransactionStatus::Cancelled)?;

        if status == TransactionStatus::Posted {
            let entry_date = Utc::now().date_naive();
            let description = format!("Reversal of {}", header.description);

            match header.kind.into() {
                TransactionKind::Purchase => {
                    let lines = Self::load_purchase_lines(&txn, id).await?;
                    let line_ids: Vec<Uuid> = lines.iter().map(|l| l.id).collect();
                    let mut locked =
                        InventoryRepository::lock_batches_by_purchase_line(&txn, &line_ids)
                            .await
                            .map_err(TransactionStoreError::from_lock)?;

                    let original = match header.journal_id {
                        Some(journal_id) => {
                            Some((journal_id, Self::load_journal_entries(&txn, journal_id).await?))
                        }
                        None => None,
                    };
                    let plan = PostingPlanner::plan_purchase_cancellation(
                        entry_date,
                        &description,
                        original
                            .as_ref()
                            .map(|(jid, entries)| (JournalId::from_uuid(*jid), entries.as_slice())),
                        &locked,
                        &lookup,
                    )?;

                    InventoryRepository::apply_draws(&txn, &mut locked, &plan.drain).await?;
                    if let Some(draft) = &plan.journal {
                        JournalRepository::append(&txn, draft, actor.actor_id.into_inner())
                            .await?;
                    }
                }
                TransactionKind::Sale => {
                    let draws = Self::load_batch_draws(&txn, id).await?;
                    let batch_ids: Vec<Uuid> =
                        draws.iter().map(|d| d.batch_id.into_inner()).collect();
                    let mut locked = InventoryRepository::lock_batches_by_id(&txn, &batch_ids)
                        .await
                        .map_err(TransactionStoreError::from_lock)?;

                    let journal_id = header.journal_id.ok_or_else(|| {
                        TransactionStoreError::Validation(format!(
                            "Posted sale {id} has no journal"
                        ))
                    })?;
                    let entries = Self::load_journal_entries(&txn, journal_id).await?;
                    let plan = PostingPlanner::plan_sale_cancellation(
                        entry_date,
                        &description,
                        JournalId::from_uuid(journal_id),
                        &entries,
                        &draws,
                        &lookup,
                    )?;

                    InventoryRepository::restore_draws(&txn, &mut locked, &plan.restore).await?;
                    JournalRepository::append(&txn, &plan.journal, actor.actor_id.into_inner())
                        .await?;
                }
                TransactionKind::Adjustment => {
                    let journal_id = header.journal_id.ok_or_else(|| {
                        TransactionStoreError::Validation(format!(
                            "Posted adjustment {id} has no journal"
                        ))
                    })?;
                    let entries = Self::load_journal_entries(&txn, journal_id).await?;
                    let draft = LedgerPoster::prepare_reversal(
                        entry_date,
                        &description,
                        JournalId::from_uuid(journal_id),
                        &entries,
                        &lookup,
                    )
                    .map_err(LifecycleError::from)?;
                    JournalRepository::append(&txn, &draft, actor.actor_id.into_inner()).await?;
                }
            }
        }

        let journal_id = header.journal_id;
        let updated = Self::finalize_header(
            &txn,
            header,
            TransactionStatus::Cancelled,
            journal_id,
            actor,
        )
        .await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Loads one transaction with its derived total.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing or soft-deleted row.
    pub async fn get(&self, id: Uuid) -> Result<TransactionView, TransactionStoreError> {
        let header = transactions::Entity::find_by_id(id)
            .filter(transactions::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await?
            .ok_or(TransactionStoreError::NotFound(id))?;
        self.view(header).await
    }

    /// Lists transactions matching the filter, newest entry date first.
    ///
    /// # Errors
    ///
    /// Returns `Database` on query failure.
    pub async fn list(
        &self,
        filter: &TransactionFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<TransactionView>, TransactionStoreError> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::DeletedAt.is_null())
            .order_by_desc(transactions::Column::EntryDate)
            .order_by_desc(transactions::Column::Id);

        if let Some(status) = filter.status {
            let stored: crate::entities::sea_orm_active_enums::TransactionStatus = status.into();
            query = query.filter(transactions::Column::Status.eq(stored));
        }
        if let Some(kind) = filter.kind {
            let stored: crate::entities::sea_orm_active_enums::TransactionKind = kind.into();
            query = query.filter(transactions::Column::Kind.eq(stored));
        }
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::EntryDate.lte(to));
        }

        let total = query.clone().count(self.db.as_ref()).await?;
        let rows = query
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            views.push(self.view(row).await?);
        }
        Ok(PageResponse::new(views, page.page, page.per_page, total))
    }

    async fn view(
        &self,
        header: transactions::Model,
    ) -> Result<TransactionView, TransactionStoreError> {
        let total = derive_total(self.db.as_ref(), &header).await?;
        let counterparty = match header.kind.into() {
            TransactionKind::Purchase => purchases::Entity::find_by_id(header.id)
                .one(self.db.as_ref())
                .await?
                .map(|p| counterparty_from(p.counterparty_type, p.counterparty_id)),
            TransactionKind::Sale => sales::Entity::find_by_id(header.id)
                .one(self.db.as_ref())
                .await?
                .map(|s| counterparty_from(s.counterparty_type, s.counterparty_id)),
            TransactionKind::Adjustment => None,
        };
        Ok(TransactionView {
            transaction: header,
            total,
            counterparty,
        })
    }

    async fn insert_header(
        txn: &DatabaseTransaction,
        kind: TransactionKind,
        entry_date: NaiveDate,
        description: &str,
        actor: &ActorContext,
    ) -> Result<transactions::Model, DbErr> {
        let now = Utc::now();
        transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            kind: Set(kind.into()),
            status: Set(TransactionStatus::Draft.into()),
            entry_date: Set(entry_date),
            description: Set(description.to_string()),
            journal_id: Set(None),
            payment_id: Set(None),
            created_by: Set(actor.actor_id.into_inner()),
            finalized_by: Set(None),
            deleted_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(txn)
        .await
    }

    async fn lock_header(
        txn: &DatabaseTransaction,
        id: Uuid,
    ) -> Result<transactions::Model, TransactionStoreError> {
        transactions::Entity::find_by_id(id)
            .filter(transactions::Column::DeletedAt.is_null())
            .lock_with_behavior(LockType::Update, LockBehavior::Nowait)
            .one(txn)
            .await
            .map_err(TransactionStoreError::from_lock)?
            .ok_or(TransactionStoreError::NotFound(id))
    }

    async fn finalize_header(
        txn: &DatabaseTransaction,
        header: transactions::Model,
        status: TransactionStatus,
        journal_id: Option<Uuid>,
        actor: &ActorContext,
    ) -> Result<transactions::Model, TransactionStoreError> {
        let mut model: transactions::ActiveModel = header.into();
        model.status = Set(status.into());
        model.journal_id = Set(journal_id);
        model.finalized_by = Set(Some(actor.actor_id.into_inner()));
        model.updated_at = Set(Utc::now().into());
        Ok(model.update(txn).await?)
    }

    async fn load_purchase_lines(
        txn: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> Result<Vec<purchase_lines::Model>, DbErr> {
        purchase_lines::Entity::find()
            .filter(purchase_lines::Column::TransactionId.eq(transaction_id))
            .order_by_asc(purchase_lines::Column::Id)
            .all(txn)
            .await
    }

    async fn load_sale_lines(
        txn: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> Result<Vec<sale_lines::Model>, DbErr> {
        sale_lines::Entity::find()
            .filter(sale_lines::Column::TransactionId.eq(transaction_id))
            .order_by_asc(sale_lines::Column::Id)
            .all(txn)
            .await
    }

    async fn load_adjustment_entries(
        txn: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> Result<Vec<JournalEntryInput>, DbErr> {
        let rows = adjustment_lines::Entity::find()
            .filter(adjustment_lines::Column::TransactionId.eq(transaction_id))
            .order_by_asc(adjustment_lines::Column::Id)
            .all(txn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| JournalEntryInput {
                account_id: AccountId::from_uuid(row.account_id),
                amount: row.amount,
                direction: if row.is_debit {
                    kasira_core::ledger::EntryDirection::Debit
                } else {
                    kasira_core::ledger::EntryDirection::Credit
                },
                memo: row.memo,
            })
            .collect())
    }

    async fn load_batch_draws(
        txn: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> Result<Vec<BatchDraw>, DbErr> {
        let rows = batch_draws::Entity::find()
            .filter(batch_draws::Column::TransactionId.eq(transaction_id))
            .order_by_asc(batch_draws::Column::Id)
            .all(txn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| BatchDraw {
                batch_id: BatchId::from_uuid(row.batch_id),
                quantity: row.quantity,
                unit_cost: row.unit_cost,
            })
            .collect())
    }

    async fn load_journal_entries(
        txn: &DatabaseTransaction,
        journal_id: Uuid,
    ) -> Result<Vec<ResolvedJournalEntry>, DbErr> {
        let rows = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::JournalId.eq(journal_id))
            .order_by_asc(ledger_entries::Column::Id)
            .all(txn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| ResolvedJournalEntry {
                account_id: AccountId::from_uuid(row.account_id),
                debit: row.debit,
                credit: row.credit,
                memo: row.memo,
            })
            .collect())
    }
}

/// Derives a transaction's total from its stored lines.
///
/// Purchases sum `quantity × unit_cost`, sales sum
/// `quantity × unit_price`, adjustments sum their debit lines.
///
/// # Errors
///
/// Returns the raw `DbErr`.
pub(crate) async fn derive_total<C: sea_orm::ConnectionTrait>(
    conn: &C,
    header: &transactions::Model,
) -> Result<Decimal, DbErr> {
    let total = match header.kind.into() {
        TransactionKind::Purchase => purchase_lines::Entity::find()
            .filter(purchase_lines::Column::TransactionId.eq(header.id))
            .all(conn)
            .await?
            .iter()
            .map(|l| l.quantity * l.unit_cost)
            .sum(),
        TransactionKind::Sale => sale_lines::Entity::find()
            .filter(sale_lines::Column::TransactionId.eq(header.id))
            .all(conn)
            .await?
            .iter()
            .map(|l| l.quantity * l.unit_price)
            .sum(),
        TransactionKind::Adjustment => adjustment_lines::Entity::find()
            .filter(adjustment_lines::Column::TransactionId.eq(header.id))
            .all(conn)
            .await?
            .iter()
            .filter(|l| l.is_debit)
            .map(|l| l.amount)
            .sum(),
    };
    Ok(total)
}

fn directory_lookup(directory: &AccountDirectory) -> impl Fn(AccountId) -> Option<AccountRef> + '_ {
    move |id| directory.resolve(id).ok().cloned()
}

const fn counterparty_columns(counterparty: Counterparty) -> (CounterpartyType, Uuid) {
    match counterparty {
        Counterparty::Person(id) => (CounterpartyType::Person, id),
        Counterparty::Company(id) => (CounterpartyType::Company, id),
    }
}

const fn counterparty_from(kind: CounterpartyType, id: Uuid) -> Counterparty {
    match kind {
        CounterpartyType::Person => Counterparty::Person(id),
        CounterpartyType::Company => Counterparty::Company(id),
    }
}

fn purchase_line_input(line: &purchase_lines::Model) -> PurchaseLineInput {
    PurchaseLineInput {
        product_unit_id: ProductUnitId::from_uuid(line.product_unit_id),
        quantity: line.quantity,
        unit_cost: line.unit_cost,
        production_date: line.production_date,
        expiry_date: line.expiry_date,
    }
}

fn sale_line_input(line: &sale_lines::Model) -> SaleLineInput {
    SaleLineInput {
        product_unit_id: ProductUnitId::from_uuid(line.product_unit_id),
        quantity: line.quantity,
        unit_price: line.unit_price,
    }
}
