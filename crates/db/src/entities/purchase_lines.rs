//! `SeaORM` Entity for the purchase_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub product_unit_id: Uuid,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub production_date: Option<Date>,
    pub expiry_date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id"
    )]
    Transactions,
    #[sea_orm(
        belongs_to = "super::product_units::Entity",
        from = "Column::ProductUnitId",
        to = "super::product_units::Column::Id"
    )]
    ProductUnits,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::product_units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductUnits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
