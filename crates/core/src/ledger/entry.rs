//! Persisted ledger entry and settlement record shapes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use subledger_shared::types::{
    ContractId, CounterpartyId, LedgerEntryId, OrganizationId, SettlementId, SourceDocumentId,
    UserId,
};

use super::balance::EntryBalance;
use super::types::{LedgerDirection, SettlementMethod, SettlementStatus, SourceType};

/// A payable or receivable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Entry id.
    pub id: LedgerEntryId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Payable or receivable.
    pub direction: LedgerDirection,
    /// Originating document kind.
    pub source_type: SourceType,
    /// Id of the originating document.
    pub reference_id: SourceDocumentId,
    /// Human-readable document number.
    pub reference_number: String,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Counterparty master-data id, if known.
    pub counterparty_id: Option<CounterpartyId>,
    /// Counterparty display name snapshot.
    pub counterparty_name: String,
    /// Optional counterparty category.
    pub counterparty_category: Option<String>,
    /// Total amount, immutable after creation.
    pub total_amount: Decimal,
    /// Cumulative settled amount.
    pub settled_amount: Decimal,
    /// `max(0, total - settled)`.
    pub remaining_amount: Decimal,
    /// Derived settlement status.
    pub status: SettlementStatus,
    /// Free-text note.
    pub note: Option<String>,
    /// Originating sales contract (receivables only).
    pub contract_id: Option<ContractId>,
    /// Originating sales contract number (receivables only).
    pub contract_number: Option<String>,
    /// Buyer id (receivables only).
    pub buyer_id: Option<CounterpartyId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Returns the balance triple of this entry.
    #[must_use]
    pub fn balance(&self) -> EntryBalance {
        EntryBalance {
            total: self.total_amount,
            settled: self.settled_amount,
            remaining: self.remaining_amount,
            status: self.status,
        }
    }

    /// Returns true if the entry has a due date before `as_of` and is not paid.
    #[must_use]
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.status.is_open() && self.due_date.is_some_and(|due| due < as_of)
    }

    /// Key used to group entries by counterparty: the id when present,
    /// otherwise the trimmed display name.
    #[must_use]
    pub fn counterparty_key(&self) -> CounterpartyKey {
        match self.counterparty_id {
            Some(id) => CounterpartyKey::Id(id),
            None => CounterpartyKey::Name(self.counterparty_name.trim().to_string()),
        }
    }
}

/// Grouping key for counterparties that may lack a master-data id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CounterpartyKey {
    /// Master-data counterparty.
    Id(CounterpartyId),
    /// Free-text counterparty name.
    Name(String),
}

/// A payment (for payables) or receipt (for receivables).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// Record id.
    pub id: SettlementId,
    /// Owning ledger entry.
    pub ledger_entry_id: LedgerEntryId,
    /// Amount settled by this record.
    pub amount: Decimal,
    /// When the settlement happened.
    pub settled_at: DateTime<Utc>,
    /// Optional payment method.
    pub method: Option<SettlementMethod>,
    /// Optional external reference number.
    pub external_reference: Option<String>,
    /// Optional note.
    pub note: Option<String>,
    /// User who recorded the settlement.
    pub recorded_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A ledger entry together with its settlement history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryWithSettlements {
    /// The entry.
    #[serde(flatten)]
    pub entry: LedgerEntry,
    /// Settlements ordered by settlement date, newest first.
    pub settlements: Vec<SettlementRecord>,
}
