//! `SeaORM` Entity for storage_tanks table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use subledger_core::reports::TankStock;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "storage_tanks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub current_level: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub unit_price: Decimal,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TankStock {
    fn from(model: Model) -> Self {
        Self {
            tank_id: model.id.into(),
            name: model.name,
            level: model.current_level,
            unit_price: model.unit_price,
        }
    }
}
