//! Ledger domain types for entry creation, settlement and listing.
//!
//! Payables and receivables share one shape; [`LedgerDirection`] tells
//! them apart. Every enum here has a stable lowercase string form that is
//! used both for persistence and for operator input.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use subledger_shared::types::{ContractId, CounterpartyId, SourceDocumentId, UserId};
use thiserror::Error;

/// Error returned when parsing an enum from its string form fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Name of the enum being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Economic direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerDirection {
    /// Amount the organization owes a third party.
    Payable,
    /// Amount a third party owes the organization.
    Receivable,
}

impl LedgerDirection {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payable => "payable",
            Self::Receivable => "receivable",
        }
    }
}

impl fmt::Display for LedgerDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerDirection {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payable" => Ok(Self::Payable),
            "receivable" => Ok(Self::Receivable),
            other => Err(UnknownVariant {
                kind: "ledger direction",
                value: other.to_string(),
            }),
        }
    }
}

/// Kind of operational document that originated a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Goods receipt of raw material.
    GoodsReceipt,
    /// Purchase order.
    PurchaseOrder,
    /// Direct purchase request (no requisition step).
    DirectPurchaseRequest,
    /// Outbound product delivery to a buyer.
    ProductDelivery,
    /// Entered by hand, not backed by a synced document.
    Manual,
}

impl SourceType {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoodsReceipt => "goods_receipt",
            Self::PurchaseOrder => "purchase_order",
            Self::DirectPurchaseRequest => "direct_purchase_request",
            Self::ProductDelivery => "product_delivery",
            Self::Manual => "manual",
        }
    }

    /// Returns true for source types maintained by synchronization.
    #[must_use]
    pub const fn is_synced(self) -> bool {
        !matches!(self, Self::Manual)
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goods_receipt" => Ok(Self::GoodsReceipt),
            "purchase_order" => Ok(Self::PurchaseOrder),
            "direct_purchase_request" => Ok(Self::DirectPurchaseRequest),
            "product_delivery" => Ok(Self::ProductDelivery),
            "manual" => Ok(Self::Manual),
            other => Err(UnknownVariant {
                kind: "source type",
                value: other.to_string(),
            }),
        }
    }
}

/// Settlement status of an entry, always derived from its amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Nothing settled yet.
    Unpaid,
    /// Partly settled.
    Partial,
    /// Fully settled.
    Paid,
}

impl SettlementStatus {
    /// Derives the status from total and settled amounts.
    ///
    /// `Paid` when nothing remains, `Unpaid` when nothing is settled,
    /// otherwise `Partial`.
    #[must_use]
    pub fn derive(total: Decimal, settled: Decimal) -> Self {
        if total - settled <= Decimal::ZERO {
            Self::Paid
        } else if settled == Decimal::ZERO {
            Self::Unpaid
        } else {
            Self::Partial
        }
    }

    /// Returns true if the entry still has an outstanding balance.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Paid)
    }

    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettlementStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            other => Err(UnknownVariant {
                kind: "settlement status",
                value: other.to_string(),
            }),
        }
    }
}

/// How a settlement was paid or received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementMethod {
    /// Cash.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Cheque.
    Cheque,
    /// Giro.
    Giro,
    /// Marker recorded when the whole remaining balance is settled at once.
    PaidInFull,
}

impl SettlementMethod {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::Cheque => "cheque",
            Self::Giro => "giro",
            Self::PaidInFull => "paid_in_full",
        }
    }
}

impl fmt::Display for SettlementMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettlementMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "bank_transfer" => Ok(Self::BankTransfer),
            "cheque" => Ok(Self::Cheque),
            "giro" => Ok(Self::Giro),
            "paid_in_full" => Ok(Self::PaidInFull),
            other => Err(UnknownVariant {
                kind: "settlement method",
                value: other.to_string(),
            }),
        }
    }
}

/// A validated ledger entry ready to be persisted.
///
/// Produced by synchronization and by manual entry validation. Settled
/// amount and status are not part of the draft: every new entry starts
/// unpaid with its full total remaining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    /// Payable or receivable.
    pub direction: LedgerDirection,
    /// Originating document kind.
    pub source_type: SourceType,
    /// Id of the originating document.
    pub reference_id: SourceDocumentId,
    /// Human-readable document number.
    pub reference_number: String,
    /// Date of the originating transaction.
    pub transaction_date: NaiveDate,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Counterparty master-data id, if known.
    pub counterparty_id: Option<CounterpartyId>,
    /// Counterparty display name snapshot.
    pub counterparty_name: String,
    /// Optional counterparty category.
    pub counterparty_category: Option<String>,
    /// Total amount, fixed at creation.
    pub total_amount: Decimal,
    /// Free-text note.
    pub note: Option<String>,
    /// Originating sales contract (receivables only).
    pub contract_id: Option<ContractId>,
    /// Originating sales contract number (receivables only).
    pub contract_number: Option<String>,
    /// Buyer id (receivables only).
    pub buyer_id: Option<CounterpartyId>,
}

/// Input for a manually entered ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualEntryInput {
    /// Payable or receivable.
    pub direction: LedgerDirection,
    /// Reference id; generated when absent.
    pub reference_id: Option<SourceDocumentId>,
    /// Human-readable reference number.
    pub reference_number: String,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Counterparty master-data id, if known.
    pub counterparty_id: Option<CounterpartyId>,
    /// Counterparty display name.
    pub counterparty_name: String,
    /// Optional counterparty category.
    pub counterparty_category: Option<String>,
    /// Total amount (must be positive).
    pub total_amount: Decimal,
    /// Free-text note.
    pub note: Option<String>,
}

/// Parameters of a single settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleRequest {
    /// Amount to settle (must be positive and not exceed the remaining balance).
    pub amount: Decimal,
    /// Optional payment method.
    pub method: Option<SettlementMethod>,
    /// Optional external reference (bank reference, cheque number).
    pub external_reference: Option<String>,
    /// Optional note.
    pub note: Option<String>,
    /// Settlement timestamp; defaults to the time of recording.
    pub settled_at: Option<DateTime<Utc>>,
    /// User recording the settlement.
    pub recorded_by: UserId,
}

impl SettleRequest {
    /// Creates a request with only the required fields set.
    #[must_use]
    pub fn new(amount: Decimal, recorded_by: UserId) -> Self {
        Self {
            amount,
            method: None,
            external_reference: None,
            note: None,
            settled_at: None,
            recorded_by,
        }
    }

    /// Sets the payment method.
    #[must_use]
    pub fn with_method(mut self, method: SettlementMethod) -> Self {
        self.method = Some(method);
        self
    }
}

/// Filters for listing ledger entries.
///
/// Every field is optional; date bounds are inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerFilter {
    /// Restrict to payables or receivables.
    pub direction: Option<LedgerDirection>,
    /// Restrict to one status.
    pub status: Option<SettlementStatus>,
    /// Restrict to one source type.
    pub source_type: Option<SourceType>,
    /// Restrict to one counterparty.
    pub counterparty_id: Option<CounterpartyId>,
    /// Earliest transaction date (inclusive).
    pub date_from: Option<NaiveDate>,
    /// Latest transaction date (inclusive).
    pub date_to: Option<NaiveDate>,
}

impl LedgerFilter {
    /// Creates a filter scoped to one direction.
    #[must_use]
    pub fn for_direction(direction: LedgerDirection) -> Self {
        Self {
            direction: Some(direction),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case::untouched(dec!(100), dec!(0), SettlementStatus::Unpaid)]
    #[case::partly(dec!(100), dec!(40), SettlementStatus::Partial)]
    #[case::cent_short(dec!(100), dec!(99.99), SettlementStatus::Partial)]
    #[case::exact(dec!(100), dec!(100), SettlementStatus::Paid)]
    fn test_status_derivation(
        #[case] total: Decimal,
        #[case] settled: Decimal,
        #[case] expected: SettlementStatus,
    ) {
        assert_eq!(SettlementStatus::derive(total, settled), expected);
    }

    #[test]
    fn test_status_is_open() {
        assert!(SettlementStatus::Unpaid.is_open());
        assert!(SettlementStatus::Partial.is_open());
        assert!(!SettlementStatus::Paid.is_open());
    }

    #[test]
    fn test_enum_string_forms_round_trip() {
        for source in [
            SourceType::GoodsReceipt,
            SourceType::PurchaseOrder,
            SourceType::DirectPurchaseRequest,
            SourceType::ProductDelivery,
            SourceType::Manual,
        ] {
            assert_eq!(source.as_str().parse::<SourceType>().unwrap(), source);
        }
        for method in [
            SettlementMethod::Cash,
            SettlementMethod::BankTransfer,
            SettlementMethod::Cheque,
            SettlementMethod::Giro,
            SettlementMethod::PaidInFull,
        ] {
            assert_eq!(method.to_string().parse::<SettlementMethod>().unwrap(), method);
        }
        assert_eq!(
            "receivable".parse::<LedgerDirection>().unwrap(),
            LedgerDirection::Receivable
        );
    }

    #[test]
    fn test_unknown_variant_message() {
        let err = "settled".parse::<SettlementStatus>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown settlement status: settled");
    }

    #[test]
    fn test_serde_matches_string_form() {
        let json = serde_json::to_string(&SourceType::DirectPurchaseRequest).unwrap();
        assert_eq!(json, "\"direct_purchase_request\"");
        let json = serde_json::to_string(&SettlementStatus::Partial).unwrap();
        assert_eq!(json, "\"partial\"");
    }

    #[test]
    fn test_manual_is_not_synced() {
        assert!(!SourceType::Manual.is_synced());
        assert!(SourceType::ProductDelivery.is_synced());
    }
}
