//! `SeaORM` Entity for materials table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use subledger_core::reports::InventoryItem;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "materials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub unit: String,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub quantity_on_hand: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub unit_price: Decimal,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for InventoryItem {
    fn from(model: Model) -> Self {
        Self {
            material_id: model.id.into(),
            name: model.name,
            quantity: model.quantity_on_hand,
            unit_price: model.unit_price,
        }
    }
}
