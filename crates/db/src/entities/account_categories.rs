//! `SeaORM` Entity for the account_categories table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::NormalBalance;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "account_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub normal_balance: NormalBalance,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account_subcategories::Entity")]
    AccountSubcategories,
}

impl Related<super::account_subcategories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountSubcategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
