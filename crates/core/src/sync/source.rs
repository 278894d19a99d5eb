//! Finalized operational documents as seen by synchronization.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use subledger_shared::types::{ContractId, CounterpartyId, SourceDocumentId};

use crate::ledger::types::{LedgerDirection, SourceType, UnknownVariant};

/// Source types maintained by synchronization.
///
/// Each variant knows its ledger direction. Adding a source means adding a
/// variant here and a valuation basis for its documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncSource {
    /// Goods receipts of raw material (payables).
    GoodsReceipt,
    /// Purchase orders (payables).
    PurchaseOrder,
    /// Direct purchase requests (payables).
    DirectPurchaseRequest,
    /// Outbound product deliveries (receivables).
    ProductDelivery,
}

impl SyncSource {
    /// Every synced source, in report order.
    pub const ALL: [Self; 4] = [
        Self::GoodsReceipt,
        Self::PurchaseOrder,
        Self::DirectPurchaseRequest,
        Self::ProductDelivery,
    ];

    /// Returns the ledger source type tag for entries created from this source.
    #[must_use]
    pub const fn source_type(self) -> SourceType {
        match self {
            Self::GoodsReceipt => SourceType::GoodsReceipt,
            Self::PurchaseOrder => SourceType::PurchaseOrder,
            Self::DirectPurchaseRequest => SourceType::DirectPurchaseRequest,
            Self::ProductDelivery => SourceType::ProductDelivery,
        }
    }

    /// Returns the direction of entries created from this source.
    #[must_use]
    pub const fn direction(self) -> LedgerDirection {
        match self {
            Self::GoodsReceipt | Self::PurchaseOrder | Self::DirectPurchaseRequest => {
                LedgerDirection::Payable
            }
            Self::ProductDelivery => LedgerDirection::Receivable,
        }
    }

    /// Returns the synced sources that feed one direction.
    pub fn for_direction(direction: LedgerDirection) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |s| s.direction() == direction)
    }
}

impl TryFrom<SourceType> for SyncSource {
    type Error = UnknownVariant;

    fn try_from(value: SourceType) -> Result<Self, Self::Error> {
        match value {
            SourceType::GoodsReceipt => Ok(Self::GoodsReceipt),
            SourceType::PurchaseOrder => Ok(Self::PurchaseOrder),
            SourceType::DirectPurchaseRequest => Ok(Self::DirectPurchaseRequest),
            SourceType::ProductDelivery => Ok(Self::ProductDelivery),
            SourceType::Manual => Err(UnknownVariant {
                kind: "sync source",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for SyncSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source_type(), f)
    }
}

impl FromStr for SyncSource {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<SourceType>()?.try_into()
    }
}

/// One priced line of a purchase-type document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Quantity received or ordered.
    pub quantity: Option<Decimal>,
    /// Price per unit.
    pub unit_price: Option<Decimal>,
}

impl LineItem {
    /// Creates a fully priced line.
    #[must_use]
    pub fn new(quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            quantity: Some(quantity),
            unit_price: Some(unit_price),
        }
    }
}

/// How a document's ledger amount is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValuationBasis {
    /// Sum of quantity times unit price over the lines.
    LineItems {
        /// Document lines.
        lines: Vec<LineItem>,
    },
    /// Delivered weight times unit price.
    Weight {
        /// Delivered (net) weight.
        weight: Option<Decimal>,
        /// Price per weight unit.
        unit_price: Option<Decimal>,
    },
}

/// A finalized document eligible for synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Source kind.
    pub source: SyncSource,
    /// Document id; becomes the entry's reference id.
    pub id: SourceDocumentId,
    /// Human-readable document number.
    pub reference_number: String,
    /// Document date; becomes the entry's transaction date.
    pub document_date: NaiveDate,
    /// Payment due date, when the document carries terms.
    pub due_date: Option<NaiveDate>,
    /// Supplier or buyer id.
    pub counterparty_id: Option<CounterpartyId>,
    /// Supplier or buyer display name.
    pub counterparty_name: String,
    /// Optional counterparty category.
    pub counterparty_category: Option<String>,
    /// Originating contract (deliveries only).
    pub contract_id: Option<ContractId>,
    /// Originating contract number (deliveries only).
    pub contract_number: Option<String>,
    /// Free-text note copied onto the entry.
    pub note: Option<String>,
    /// Valuation inputs.
    pub basis: ValuationBasis,
}
