//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use subledger_shared::types::{CounterpartyId, LedgerEntryId, MaterialId, StorageTankId};

use crate::ledger::types::{LedgerDirection, SettlementStatus, SourceType};

/// Amount and status totals over a set of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountTotals {
    /// Sum of total amounts.
    pub total: Decimal,
    /// Sum of settled amounts.
    pub settled: Decimal,
    /// Sum of remaining amounts.
    pub remaining: Decimal,
    /// Entries with nothing settled.
    pub count_unpaid: u64,
    /// Partly settled entries.
    pub count_partial: u64,
    /// Fully settled entries.
    pub count_paid: u64,
}

impl AmountTotals {
    /// Adds one entry's amounts and status.
    pub fn add(&mut self, total: Decimal, settled: Decimal, remaining: Decimal, status: SettlementStatus) {
        self.total += total;
        self.settled += settled;
        self.remaining += remaining;
        match status {
            SettlementStatus::Unpaid => self.count_unpaid += 1,
            SettlementStatus::Partial => self.count_partial += 1,
            SettlementStatus::Paid => self.count_paid += 1,
        }
    }

    /// Number of entries counted.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.count_unpaid + self.count_partial + self.count_paid
    }
}

/// Totals for one source type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTypeSummary {
    /// Source type.
    pub source_type: SourceType,
    /// Totals for entries of this type.
    #[serde(flatten)]
    pub totals: AmountTotals,
}

/// Summary of payables or receivables for one organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Direction summarized.
    pub direction: LedgerDirection,
    /// Date used for overdue checks.
    pub as_of: NaiveDate,
    /// Totals over every entry.
    #[serde(flatten)]
    pub totals: AmountTotals,
    /// Open entries whose due date has passed.
    pub overdue_count: u64,
    /// Remaining balance of overdue entries.
    pub overdue_remaining: Decimal,
    /// Totals per source type, in source type order.
    pub by_type: Vec<SourceTypeSummary>,
}

/// Outstanding balance for one counterparty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartyGroup {
    /// Counterparty id, if the entries reference master data.
    pub counterparty_id: Option<CounterpartyId>,
    /// Display name.
    pub counterparty_name: String,
    /// Sum of total amounts.
    pub total: Decimal,
    /// Sum of settled amounts.
    pub settled: Decimal,
    /// Sum of remaining amounts.
    pub remaining: Decimal,
    /// Number of open entries.
    pub entry_count: u64,
}

/// Aging tier of an outstanding entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucketKind {
    /// Up to 30 days old (including future-dated entries).
    Current,
    /// 31 to 60 days old.
    Days31To60,
    /// 61 to 90 days old.
    Days61To90,
    /// More than 90 days old.
    Over90,
}

impl AgingBucketKind {
    /// All tiers, youngest first.
    pub const ALL: [Self; 4] = [Self::Current, Self::Days31To60, Self::Days61To90, Self::Over90];

    /// Returns the tier for an age in days. Upper bounds are inclusive.
    #[must_use]
    pub const fn for_age(age_days: i64) -> Self {
        match age_days {
            i64::MIN..=30 => Self::Current,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            _ => Self::Over90,
        }
    }
}

/// An outstanding entry placed in an aging bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingEntry {
    /// Entry id.
    pub entry_id: LedgerEntryId,
    /// Document number.
    pub reference_number: String,
    /// Counterparty display name.
    pub counterparty_name: String,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// Due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Whole days between transaction date and the report date.
    pub age_days: i64,
    /// Remaining balance.
    pub remaining: Decimal,
    /// True when the due date has passed.
    pub is_overdue: bool,
}

/// One aging bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingBucket {
    /// Tier.
    pub kind: AgingBucketKind,
    /// Sum of remaining balances in this bucket.
    pub total_remaining: Decimal,
    /// Contributing entries.
    pub entries: Vec<AgingEntry>,
}

impl AgingBucket {
    /// Creates an empty bucket.
    #[must_use]
    pub fn empty(kind: AgingBucketKind) -> Self {
        Self {
            kind,
            total_remaining: Decimal::ZERO,
            entries: Vec::new(),
        }
    }

    /// Adds an entry to the bucket.
    pub fn push(&mut self, entry: AgingEntry) {
        self.total_remaining += entry.remaining;
        self.entries.push(entry);
    }
}

/// Aging of outstanding balances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingReport {
    /// Direction analysed.
    pub direction: LedgerDirection,
    /// Reference date.
    pub as_of: NaiveDate,
    /// 0 to 30 days.
    pub current: AgingBucket,
    /// 31 to 60 days.
    pub days_31_to_60: AgingBucket,
    /// 61 to 90 days.
    pub days_61_to_90: AgingBucket,
    /// Over 90 days.
    pub over_90: AgingBucket,
    /// Sum of all buckets.
    pub total_remaining: Decimal,
}

impl AgingReport {
    /// Creates an empty report.
    #[must_use]
    pub fn empty(direction: LedgerDirection, as_of: NaiveDate) -> Self {
        Self {
            direction,
            as_of,
            current: AgingBucket::empty(AgingBucketKind::Current),
            days_31_to_60: AgingBucket::empty(AgingBucketKind::Days31To60),
            days_61_to_90: AgingBucket::empty(AgingBucketKind::Days61To90),
            over_90: AgingBucket::empty(AgingBucketKind::Over90),
            total_remaining: Decimal::ZERO,
        }
    }

    /// Returns the bucket for a tier.
    #[must_use]
    pub fn bucket(&self, kind: AgingBucketKind) -> &AgingBucket {
        match kind {
            AgingBucketKind::Current => &self.current,
            AgingBucketKind::Days31To60 => &self.days_31_to_60,
            AgingBucketKind::Days61To90 => &self.days_61_to_90,
            AgingBucketKind::Over90 => &self.over_90,
        }
    }

    /// Returns the bucket for a tier, mutably.
    pub fn bucket_mut(&mut self, kind: AgingBucketKind) -> &mut AgingBucket {
        match kind {
            AgingBucketKind::Current => &mut self.current,
            AgingBucketKind::Days31To60 => &mut self.days_31_to_60,
            AgingBucketKind::Days61To90 => &mut self.days_61_to_90,
            AgingBucketKind::Over90 => &mut self.over_90,
        }
    }
}

/// On-hand stock of one material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Material id.
    pub material_id: MaterialId,
    /// Material name.
    pub name: String,
    /// On-hand quantity.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
}

/// Current contents of one storage tank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankStock {
    /// Tank id.
    pub tank_id: StorageTankId,
    /// Tank name.
    pub name: String,
    /// Current level in stock units.
    pub level: Decimal,
    /// Price per stock unit.
    pub unit_price: Decimal,
}

/// A valued asset line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLine {
    /// Material or tank id.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Quantity valued.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// `quantity * unit_price`, rounded.
    pub value: Decimal,
}

/// Inputs gathered from the ledger and the valuation collaborators.
#[derive(Debug, Clone, Default)]
pub struct BalanceSheetInput {
    /// Material stock.
    pub inventory: Vec<InventoryItem>,
    /// Tank stock.
    pub tanks: Vec<TankStock>,
    /// Outstanding receivables.
    pub receivables_remaining: Decimal,
    /// Outstanding payables.
    pub payables_remaining: Decimal,
}

/// Current assets section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetSection {
    /// Valued materials.
    pub inventory: Vec<AssetLine>,
    /// Sum of material values.
    pub inventory_total: Decimal,
    /// Valued tank contents.
    pub tank_stock: Vec<AssetLine>,
    /// Sum of tank values.
    pub tank_total: Decimal,
    /// Outstanding receivables.
    pub receivables: Decimal,
    /// Total current assets.
    pub total: Decimal,
}

/// Liabilities section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiabilitySection {
    /// Outstanding payables.
    pub payables: Decimal,
    /// Total liabilities.
    pub total: Decimal,
}

/// Balance sheet snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Report type identifier.
    pub report_type: String,
    /// Snapshot date.
    pub as_of: NaiveDate,
    /// Current assets.
    pub assets: AssetSection,
    /// Liabilities.
    pub liabilities: LiabilitySection,
    /// Assets minus liabilities.
    pub equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity.
    pub is_balanced: bool,
}
