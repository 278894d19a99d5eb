//! Tests for the reports module.

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use subledger_shared::types::{
    CounterpartyId, MaterialId, OrganizationId, SourceDocumentId, StorageTankId,
};

use super::service::ReportService;
use super::types::{AgingBucketKind, BalanceSheetInput, InventoryItem, TankStock};
use crate::ledger::balance::EntryBalance;
use crate::ledger::entry::LedgerEntry;
use crate::ledger::service::LedgerService;
use crate::ledger::types::{LedgerDirection, NewLedgerEntry, SettlementStatus, SourceType};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

fn entry(
    direction: LedgerDirection,
    source_type: SourceType,
    days_old: i64,
    total: Decimal,
    settled: Decimal,
) -> LedgerEntry {
    let mut entry = LedgerService::open_entry(
        OrganizationId::new(),
        NewLedgerEntry {
            direction,
            source_type,
            reference_id: SourceDocumentId::new(),
            reference_number: format!("REF-{days_old}"),
            transaction_date: as_of() - Duration::days(days_old),
            due_date: None,
            counterparty_id: None,
            counterparty_name: "Counterparty".to_string(),
            counterparty_category: None,
            total_amount: total,
            note: None,
            contract_id: None,
            contract_number: None,
            buyer_id: None,
        },
        Utc::now(),
    );
    let balance = EntryBalance::from_amounts(total, settled);
    entry.settled_amount = balance.settled;
    entry.remaining_amount = balance.remaining;
    entry.status = balance.status;
    entry
}

fn payable(days_old: i64, total: Decimal, settled: Decimal) -> LedgerEntry {
    entry(LedgerDirection::Payable, SourceType::GoodsReceipt, days_old, total, settled)
}

// ============================================================================
// Summary
// ============================================================================

#[test]
fn test_summary_totals_and_counts() {
    let entries = vec![
        payable(5, dec!(1000), dec!(0)),
        payable(10, dec!(2000), dec!(500)),
        payable(20, dec!(300), dec!(300)),
        entry(LedgerDirection::Payable, SourceType::PurchaseOrder, 1, dec!(50), dec!(0)),
        entry(LedgerDirection::Receivable, SourceType::ProductDelivery, 1, dec!(9999), dec!(0)),
    ];

    let summary = ReportService::summary(LedgerDirection::Payable, &entries, as_of());

    assert_eq!(summary.totals.total, dec!(3350));
    assert_eq!(summary.totals.settled, dec!(800));
    assert_eq!(summary.totals.remaining, dec!(2550));
    assert_eq!(summary.totals.count_unpaid, 2);
    assert_eq!(summary.totals.count_partial, 1);
    assert_eq!(summary.totals.count_paid, 1);

    assert_eq!(summary.by_type.len(), 2);
    assert_eq!(summary.by_type[0].source_type, SourceType::GoodsReceipt);
    assert_eq!(summary.by_type[0].totals.total, dec!(3300));
    assert_eq!(summary.by_type[1].source_type, SourceType::PurchaseOrder);
    assert_eq!(summary.by_type[1].totals.entry_count(), 1);
}

#[test]
fn test_summary_overdue() {
    let mut overdue = payable(40, dec!(100), dec!(25));
    overdue.due_date = Some(as_of() - Duration::days(10));
    let mut due_today = payable(40, dec!(100), dec!(0));
    due_today.due_date = Some(as_of());
    let mut paid_late = payable(40, dec!(100), dec!(100));
    paid_late.due_date = Some(as_of() - Duration::days(10));

    let summary = ReportService::summary(
        LedgerDirection::Payable,
        &[overdue, due_today, paid_late],
        as_of(),
    );
    assert_eq!(summary.overdue_count, 1);
    assert_eq!(summary.overdue_remaining, dec!(75));
}

// ============================================================================
// Counterparty grouping
// ============================================================================

#[test]
fn test_group_by_counterparty() {
    let supplier = CounterpartyId::new();
    let mut a = payable(1, dec!(100), dec!(0));
    a.counterparty_id = Some(supplier);
    a.counterparty_name = "PT Alpha".to_string();
    let mut b = payable(2, dec!(300), dec!(100));
    b.counterparty_id = Some(supplier);
    b.counterparty_name = "PT Alpha (old name)".to_string();
    let mut c = payable(3, dec!(50), dec!(0));
    c.counterparty_name = " Pak Budi ".to_string();
    let mut d = payable(4, dec!(70), dec!(0));
    d.counterparty_name = "Pak Budi".to_string();
    let mut settled = payable(5, dec!(1000), dec!(1000));
    settled.counterparty_name = "Settled Co".to_string();

    let groups = ReportService::group_by_counterparty(LedgerDirection::Payable, &[a, b, c, d, settled]);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].counterparty_id, Some(supplier));
    assert_eq!(groups[0].counterparty_name, "PT Alpha");
    assert_eq!(groups[0].remaining, dec!(300));
    assert_eq!(groups[0].entry_count, 2);
    assert_eq!(groups[1].counterparty_id, None);
    assert_eq!(groups[1].counterparty_name, "Pak Budi");
    assert_eq!(groups[1].remaining, dec!(120));
}

// ============================================================================
// Aging
// ============================================================================

#[test]
fn test_aging_45_days_lands_in_second_bucket() {
    let entries = vec![payable(45, dec!(50000), dec!(0))];
    let report = ReportService::aging(LedgerDirection::Payable, &entries, as_of());

    assert_eq!(report.days_31_to_60.total_remaining, dec!(50000));
    assert_eq!(report.days_31_to_60.entries.len(), 1);
    assert_eq!(report.days_31_to_60.entries[0].age_days, 45);
    assert_eq!(report.current.total_remaining, Decimal::ZERO);
    assert_eq!(report.days_61_to_90.total_remaining, Decimal::ZERO);
    assert_eq!(report.over_90.total_remaining, Decimal::ZERO);
}

#[rstest::rstest]
#[case::future(-3, AgingBucketKind::Current)]
#[case::today(0, AgingBucketKind::Current)]
#[case::edge_30(30, AgingBucketKind::Current)]
#[case::edge_31(31, AgingBucketKind::Days31To60)]
#[case::edge_60(60, AgingBucketKind::Days31To60)]
#[case::edge_61(61, AgingBucketKind::Days61To90)]
#[case::edge_90(90, AgingBucketKind::Days61To90)]
#[case::edge_91(91, AgingBucketKind::Over90)]
fn test_aging_bucket_boundaries(#[case] days_old: i64, #[case] expected: AgingBucketKind) {
    assert_eq!(AgingBucketKind::for_age(days_old), expected);

    let report = ReportService::aging(
        LedgerDirection::Payable,
        &[payable(days_old, dec!(10), dec!(0))],
        as_of(),
    );
    assert_eq!(report.bucket(expected).entries.len(), 1);
}

#[test]
fn test_aging_skips_paid_and_other_direction() {
    let entries = vec![
        payable(10, dec!(100), dec!(100)),
        entry(LedgerDirection::Receivable, SourceType::ProductDelivery, 10, dec!(100), dec!(0)),
    ];
    let report = ReportService::aging(LedgerDirection::Payable, &entries, as_of());
    assert_eq!(report.total_remaining, Decimal::ZERO);
    assert!(AgingBucketKind::ALL
        .iter()
        .all(|kind| report.bucket(*kind).entries.is_empty()));
}

// ============================================================================
// Balance sheet
// ============================================================================

#[test]
fn test_balance_sheet_composition() {
    let input = BalanceSheetInput {
        inventory: vec![InventoryItem {
            material_id: MaterialId::new(),
            name: "Fresh fruit bunches".to_string(),
            quantity: dec!(12000),
            unit_price: dec!(2150),
        }],
        tanks: vec![TankStock {
            tank_id: StorageTankId::new(),
            name: "Tank 1".to_string(),
            level: dec!(350.5),
            unit_price: dec!(12500),
        }],
        receivables_remaining: dec!(4000000),
        payables_remaining: dec!(30000000),
    };

    let report = ReportService::balance_sheet(input, as_of(), 2);

    assert_eq!(report.assets.inventory_total, dec!(25800000));
    assert_eq!(report.assets.tank_total, dec!(4381250));
    assert_eq!(report.assets.total, dec!(34181250));
    assert_eq!(report.liabilities.total, dec!(30000000));
    assert_eq!(report.equity, dec!(4181250));
    assert!(report.is_balanced);
    assert!(ReportService::verify_balance_sheet(&report).is_ok());
}

#[test]
fn test_balance_sheet_negative_equity_still_balances() {
    let input = BalanceSheetInput {
        payables_remaining: dec!(500),
        ..BalanceSheetInput::default()
    };
    let report = ReportService::balance_sheet(input, as_of(), 2);
    assert_eq!(report.equity, dec!(-500));
    assert!(ReportService::verify_balance_sheet(&report).is_ok());
}

#[test]
fn test_verify_detects_tampered_report() {
    let mut report = ReportService::balance_sheet(BalanceSheetInput::default(), as_of(), 2);
    report.equity = dec!(1);
    assert!(ReportService::verify_balance_sheet(&report).is_err());
}

// ============================================================================
// Properties
// ============================================================================

fn entries_strategy() -> impl Strategy<Value = Vec<LedgerEntry>> {
    prop::collection::vec(
        (-10i64..400, 1i64..10_000_000, 0u32..=100, any::<bool>()),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(days, cents, share, receivable)| {
                let total = Decimal::new(cents, 2);
                let settled = (total * Decimal::from(share) / Decimal::from(100)).round_dp(2);
                let direction = if receivable {
                    LedgerDirection::Receivable
                } else {
                    LedgerDirection::Payable
                };
                let source = if receivable {
                    SourceType::ProductDelivery
                } else {
                    SourceType::PurchaseOrder
                };
                entry(direction, source, days, total, settled)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every open entry is in exactly one bucket and bucket totals add up to
    /// the outstanding total.
    #[test]
    fn prop_aging_partitions_outstanding(entries in entries_strategy()) {
        let report = ReportService::aging(LedgerDirection::Payable, &entries, as_of());

        let open = entries
            .iter()
            .filter(|e| e.direction == LedgerDirection::Payable && e.status != SettlementStatus::Paid)
            .count();
        let placed: usize = AgingBucketKind::ALL
            .iter()
            .map(|kind| report.bucket(*kind).entries.len())
            .sum();
        prop_assert_eq!(placed, open);

        let bucket_sum: Decimal = AgingBucketKind::ALL
            .iter()
            .map(|kind| report.bucket(*kind).total_remaining)
            .sum();
        let outstanding = ReportService::outstanding(LedgerDirection::Payable, &entries);
        prop_assert_eq!(bucket_sum, outstanding);
        prop_assert_eq!(report.total_remaining, outstanding);
    }

    /// Summary remaining equals total minus settled.
    #[test]
    fn prop_summary_remaining_consistent(entries in entries_strategy()) {
        let summary = ReportService::summary(LedgerDirection::Receivable, &entries, as_of());
        prop_assert_eq!(summary.totals.remaining, summary.totals.total - summary.totals.settled);

        let by_type_total: Decimal = summary.by_type.iter().map(|t| t.totals.total).sum();
        prop_assert_eq!(by_type_total, summary.totals.total);
    }

    /// The balance sheet identity holds for any ledger and stock state.
    #[test]
    fn prop_balance_identity(
        entries in entries_strategy(),
        stock in prop::collection::vec((0i64..1_000_000, 0i64..10_000_000), 0..10),
    ) {
        let input = BalanceSheetInput {
            inventory: stock
                .iter()
                .map(|(qty, price)| InventoryItem {
                    material_id: MaterialId::new(),
                    name: "Material".to_string(),
                    quantity: Decimal::new(*qty, 3),
                    unit_price: Decimal::new(*price, 2),
                })
                .collect(),
            tanks: Vec::new(),
            receivables_remaining: ReportService::outstanding(LedgerDirection::Receivable, &entries),
            payables_remaining: ReportService::outstanding(LedgerDirection::Payable, &entries),
        };

        let report = ReportService::balance_sheet(input, as_of(), 2);
        prop_assert!(report.is_balanced);
        prop_assert!(ReportService::verify_balance_sheet(&report).is_ok());
    }
}
