//! `SeaORM` Entity for the batches table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "batches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_unit_id: Uuid,
    /// The purchase line this batch was received from.
    pub purchase_line_id: Option<Uuid>,
    pub total_quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub unit_cost: Decimal,
    pub production_date: Option<Date>,
    pub expiry_date: Option<Date>,
    /// Monotonic receipt order; breaks expiry ties first-in-first-out.
    pub sequence: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_units::Entity",
        from = "Column::ProductUnitId",
        to = "super::product_units::Column::Id"
    )]
    ProductUnits,
    #[sea_orm(has_many = "super::batch_draws::Entity")]
    BatchDraws,
}

impl Related<super::product_units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductUnits.def()
    }
}

impl Related<super::batch_draws::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BatchDraws.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
