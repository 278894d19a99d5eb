//! Report generation service.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AgingBucketKind, AgingEntry, AgingReport, AmountTotals, AssetLine, AssetSection,
    BalanceSheetInput, BalanceSheetReport, CounterpartyGroup, LedgerSummary, LiabilitySection,
    SourceTypeSummary,
};
use crate::ledger::entry::{CounterpartyKey, LedgerEntry};
use crate::ledger::types::LedgerDirection;

/// Largest tolerated difference in the balance sheet identity.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Service for generating ledger reports.
///
/// Every function is a single pass over the entries it is given. Entries
/// of the other direction are ignored.
pub struct ReportService;

impl ReportService {
    /// Summarizes all entries of one direction.
    #[must_use]
    pub fn summary(
        direction: LedgerDirection,
        entries: &[LedgerEntry],
        as_of: NaiveDate,
    ) -> LedgerSummary {
        let mut totals = AmountTotals::default();
        let mut by_type: BTreeMap<_, AmountTotals> = BTreeMap::new();
        let mut overdue_count = 0;
        let mut overdue_remaining = Decimal::ZERO;

        for entry in entries.iter().filter(|e| e.direction == direction) {
            totals.add(
                entry.total_amount,
                entry.settled_amount,
                entry.remaining_amount,
                entry.status,
            );
            by_type.entry(entry.source_type).or_default().add(
                entry.total_amount,
                entry.settled_amount,
                entry.remaining_amount,
                entry.status,
            );
            if entry.is_overdue(as_of) {
                overdue_count += 1;
                overdue_remaining += entry.remaining_amount;
            }
        }

        LedgerSummary {
            direction,
            as_of,
            totals,
            overdue_count,
            overdue_remaining,
            by_type: by_type
                .into_iter()
                .map(|(source_type, totals)| SourceTypeSummary {
                    source_type,
                    totals,
                })
                .collect(),
        }
    }

    /// Groups open entries by counterparty.
    ///
    /// The key is the counterparty id when present, otherwise the trimmed
    /// display name. Groups are ordered by remaining balance, largest first,
    /// then by name.
    #[must_use]
    pub fn group_by_counterparty(
        direction: LedgerDirection,
        entries: &[LedgerEntry],
    ) -> Vec<CounterpartyGroup> {
        let mut groups: HashMap<CounterpartyKey, CounterpartyGroup> = HashMap::new();

        for entry in entries
            .iter()
            .filter(|e| e.direction == direction && e.status.is_open())
        {
            let group = groups
                .entry(entry.counterparty_key())
                .or_insert_with(|| CounterpartyGroup {
                    counterparty_id: entry.counterparty_id,
                    counterparty_name: entry.counterparty_name.trim().to_string(),
                    total: Decimal::ZERO,
                    settled: Decimal::ZERO,
                    remaining: Decimal::ZERO,
                    entry_count: 0,
                });
            group.total += entry.total_amount;
            group.settled += entry.settled_amount;
            group.remaining += entry.remaining_amount;
            group.entry_count += 1;
        }

        let mut groups: Vec<_> = groups.into_values().collect();
        groups.sort_by(|a, b| {
            b.remaining
                .cmp(&a.remaining)
                .then_with(|| a.counterparty_name.cmp(&b.counterparty_name))
                .then_with(|| a.counterparty_id.cmp(&b.counterparty_id))
        });
        groups
    }

    /// Places every open entry in exactly one aging bucket.
    ///
    /// Age is the whole number of days from transaction date to `as_of`;
    /// future-dated entries count as current.
    #[must_use]
    pub fn aging(
        direction: LedgerDirection,
        entries: &[LedgerEntry],
        as_of: NaiveDate,
    ) -> AgingReport {
        let mut report = AgingReport::empty(direction, as_of);

        for entry in entries
            .iter()
            .filter(|e| e.direction == direction && e.status.is_open())
        {
            let age_days = (as_of - entry.transaction_date).num_days();
            report
                .bucket_mut(AgingBucketKind::for_age(age_days))
                .push(AgingEntry {
                    entry_id: entry.id,
                    reference_number: entry.reference_number.clone(),
                    counterparty_name: entry.counterparty_name.clone(),
                    transaction_date: entry.transaction_date,
                    due_date: entry.due_date,
                    age_days,
                    remaining: entry.remaining_amount,
                    is_overdue: entry.is_overdue(as_of),
                });
            report.total_remaining += entry.remaining_amount;
        }

        report
    }

    /// Sums the remaining balance of open entries of one direction.
    #[must_use]
    pub fn outstanding(direction: LedgerDirection, entries: &[LedgerEntry]) -> Decimal {
        entries
            .iter()
            .filter(|e| e.direction == direction && e.status.is_open())
            .map(|e| e.remaining_amount)
            .sum()
    }

    /// Composes the balance sheet.
    ///
    /// Current assets are valued inventory, tank stock and receivables;
    /// liabilities are payables; equity is the difference.
    #[must_use]
    pub fn balance_sheet(input: BalanceSheetInput, as_of: NaiveDate, scale: u32) -> BalanceSheetReport {
        let inventory: Vec<AssetLine> = input
            .inventory
            .into_iter()
            .map(|item| AssetLine {
                id: item.material_id.into_inner(),
                value: Self::value(item.quantity, item.unit_price, scale),
                name: item.name,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();
        let tank_stock: Vec<AssetLine> = input
            .tanks
            .into_iter()
            .map(|tank| AssetLine {
                id: tank.tank_id.into_inner(),
                value: Self::value(tank.level, tank.unit_price, scale),
                name: tank.name,
                quantity: tank.level,
                unit_price: tank.unit_price,
            })
            .collect();

        let inventory_total: Decimal = inventory.iter().map(|l| l.value).sum();
        let tank_total: Decimal = tank_stock.iter().map(|l| l.value).sum();
        let assets = AssetSection {
            inventory,
            inventory_total,
            tank_stock,
            tank_total,
            receivables: input.receivables_remaining,
            total: inventory_total + tank_total + input.receivables_remaining,
        };
        let liabilities = LiabilitySection {
            payables: input.payables_remaining,
            total: input.payables_remaining,
        };

        let equity = assets.total - liabilities.total;
        let liabilities_and_equity = liabilities.total + equity;
        let is_balanced = (assets.total - liabilities_and_equity).abs() < BALANCE_TOLERANCE;

        BalanceSheetReport {
            report_type: "balance_sheet".to_string(),
            as_of,
            assets,
            liabilities,
            equity,
            liabilities_and_equity,
            is_balanced,
        }
    }

    /// Re-checks the balance sheet identity.
    ///
    /// # Errors
    ///
    /// Returns `Unbalanced` if `assets - (liabilities + equity)` is not
    /// within [`BALANCE_TOLERANCE`] of zero.
    pub fn verify_balance_sheet(report: &BalanceSheetReport) -> Result<(), ReportError> {
        let difference = report.assets.total - (report.liabilities.total + report.equity);
        if difference.abs() < BALANCE_TOLERANCE && report.is_balanced {
            return Ok(());
        }
        Err(ReportError::Unbalanced {
            assets: report.assets.total,
            liabilities: report.liabilities.total,
            equity: report.equity,
            difference,
        })
    }

    fn value(quantity: Decimal, unit_price: Decimal, scale: u32) -> Decimal {
        (quantity * unit_price).round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven)
    }
}
