//! `SeaORM` Entity for the transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{TransactionKind, TransactionStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub entry_date: Date,
    pub description: String,
    /// Set once posted; the reversal journal hangs off the journal itself.
    pub journal_id: Option<Uuid>,
    /// Set when a payment triggered this transaction.
    pub payment_id: Option<Uuid>,
    /// Actor who created the transaction.
    pub created_by: Uuid,
    /// Actor who posted or cancelled it, once it left draft.
    pub finalized_by: Option<Uuid>,
    /// Soft delete; rows are never removed.
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journals::Entity",
        from = "Column::JournalId",
        to = "super::journals::Column::Id"
    )]
    Journals,
    #[sea_orm(has_one = "super::purchases::Entity")]
    Purchases,
    #[sea_orm(has_one = "super::sales::Entity")]
    Sales,
    #[sea_orm(has_many = "super::purchase_lines::Entity")]
    PurchaseLines,
    #[sea_orm(has_many = "super::sale_lines::Entity")]
    SaleLines,
    #[sea_orm(has_many = "super::batch_draws::Entity")]
    BatchDraws,
    #[sea_orm(has_many = "super::payment_allocations::Entity")]
    PaymentAllocations,
}

impl Related<super::journals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Journals.def()
    }
}

impl Related<super::purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::purchase_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseLines.def()
    }
}

impl Related<super::sale_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleLines.def()
    }
}

impl Related<super::batch_draws::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BatchDraws.def()
    }
}

impl Related<super::payment_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
