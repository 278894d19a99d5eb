//! `SeaORM` Entity for goods_receipt_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "goods_receipt_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub goods_receipt_id: Uuid,
    pub line_no: i32,
    pub material_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))", nullable)]
    pub quantity: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))", nullable)]
    pub unit_price: Option<Decimal>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::goods_receipts::Entity",
        from = "Column::GoodsReceiptId",
        to = "super::goods_receipts::Column::Id",
        on_delete = "Cascade"
    )]
    Header,
}

impl Related<super::goods_receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Header.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
