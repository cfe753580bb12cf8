//! Journal repository: append-only journal writes and reads.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use kasira_core::ledger::JournalDraft;

use crate::entities::{journals, ledger_entries};

/// A journal header with its entries.
#[derive(Debug, Clone)]
pub struct JournalWithEntries {
    /// Journal header.
    pub journal: journals::Model,
    /// Entries in insertion order.
    pub entries: Vec<ledger_entries::Model>,
}

/// Stateless journal data access.
pub struct JournalRepository;

impl JournalRepository {
    /// Appends a prepared draft as a new journal with entries.
    ///
    /// Journals are append-only: there is no update or delete path.
    ///
    /// # Errors
    ///
    /// Returns the raw `DbErr`.
    pub async fn append(
        txn: &DatabaseTransaction,
        draft: &JournalDraft,
        created_by: Uuid,
    ) -> Result<journals::Model, DbErr> {
        let now = Utc::now();
        let journal = journals::ActiveModel {
            id: Set(Uuid::now_v7()),
            entry_date: Set(draft.entry_date),
            description: Set(draft.description.clone()),
            reverses_journal_id: Set(draft.reverses.map(kasira_shared::types::JournalId::into_inner)),
            created_by: Set(created_by),
            created_at: Set(now.into()),
        }
        .insert(txn)
        .await?;

        for entry in &draft.entries {
            ledger_entries::ActiveModel {
                id: Set(Uuid::now_v7()),
                journal_id: Set(journal.id),
                account_id: Set(entry.account_id.into_inner()),
                debit: Set(entry.debit),
                credit: Set(entry.credit),
                memo: Set(entry.memo.clone()),
                created_at: Set(now.into()),
            }
            .insert(txn)
            .await?;
        }

        Ok(journal)
    }

    /// Loads a journal with its entries.
    ///
    /// # Errors
    ///
    /// Returns the raw `DbErr`; `Ok(None)` when the journal is missing.
    pub async fn find_with_entries<C: ConnectionTrait>(
        conn: &C,
        journal_id: Uuid,
    ) -> Result<Option<JournalWithEntries>, DbErr> {
        let Some(journal) = journals::Entity::find_by_id(journal_id).one(conn).await? else {
            return Ok(None);
        };
        let entries = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::JournalId.eq(journal_id))
            .order_by_asc(ledger_entries::Column::Id)
            .all(conn)
            .await?;
        Ok(Some(JournalWithEntries { journal, entries }))
    }
}
