//! `SeaORM` Entity for ledger_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use subledger_core::ledger::LedgerEntry;

use super::sea_orm_active_enums::{LedgerDirection, LedgerSourceType, SettlementStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub seq: i64,
    pub organization_id: Uuid,
    pub direction: LedgerDirection,
    pub source_type: LedgerSourceType,
    pub reference_id: Uuid,
    pub reference_number: String,
    pub transaction_date: Date,
    pub due_date: Option<Date>,
    pub counterparty_id: Option<Uuid>,
    pub counterparty_name: String,
    pub counterparty_category: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub total_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub settled_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub remaining_amount: Decimal,
    pub status: SettlementStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub contract_id: Option<Uuid>,
    pub contract_number: Option<String>,
    pub buyer_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::settlements::Entity")]
    Settlements,
}

impl Related<super::settlements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Settlements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LedgerEntry {
    fn from(model: Model) -> Self {
        Self {
            id: model.id.into(),
            organization_id: model.organization_id.into(),
            direction: model.direction.into(),
            source_type: model.source_type.into(),
            reference_id: model.reference_id.into(),
            reference_number: model.reference_number,
            transaction_date: model.transaction_date,
            due_date: model.due_date,
            counterparty_id: model.counterparty_id.map(Into::into),
            counterparty_name: model.counterparty_name,
            counterparty_category: model.counterparty_category,
            total_amount: model.total_amount,
            settled_amount: model.settled_amount,
            remaining_amount: model.remaining_amount,
            status: model.status.into(),
            note: model.note,
            contract_id: model.contract_id.map(Into::into),
            contract_number: model.contract_number,
            buyer_id: model.buyer_id.map(Into::into),
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        }
    }
}
