//! `SeaORM` Entity for settlements table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use subledger_core::ledger::SettlementRecord;

use super::sea_orm_active_enums::SettlementMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "settlements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub ledger_entry_id: Uuid,
    pub organization_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub amount: Decimal,
    pub settled_at: DateTimeWithTimeZone,
    pub method: Option<SettlementMethod>,
    pub external_reference: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub recorded_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ledger_entries::Entity",
        from = "Column::LedgerEntryId",
        to = "super::ledger_entries::Column::Id",
        on_delete = "Cascade"
    )]
    LedgerEntries,
}

impl Related<super::ledger_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SettlementRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id.into(),
            ledger_entry_id: model.ledger_entry_id.into(),
            amount: model.amount,
            settled_at: model.settled_at.to_utc(),
            method: model.method.map(Into::into),
            external_reference: model.external_reference,
            note: model.note,
            recorded_by: model.recorded_by.into(),
            created_at: model.created_at.to_utc(),
        }
    }
}
