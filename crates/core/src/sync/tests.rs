//! Tests for sync planning.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use subledger_shared::types::{ContractId, CounterpartyId, OrganizationId, SourceDocumentId};

use super::planner::SyncPlanner;
use super::report::{SourceSyncReport, SyncReport};
use super::source::{LineItem, SourceDocument, SyncSource, ValuationBasis};
use crate::ledger::service::LedgerService;
use crate::ledger::types::{LedgerDirection, SettlementStatus, SourceType};

fn receipt(number: &str, price: Option<Decimal>) -> SourceDocument {
    SourceDocument {
        source: SyncSource::GoodsReceipt,
        id: SourceDocumentId::new(),
        reference_number: number.to_string(),
        document_date: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2024, 5, 10),
        counterparty_id: Some(CounterpartyId::new()),
        counterparty_name: "PT Tandan Buah".to_string(),
        counterparty_category: Some("plasma".to_string()),
        contract_id: None,
        contract_number: None,
        note: None,
        basis: ValuationBasis::LineItems {
            lines: vec![LineItem {
                quantity: Some(dec!(10)),
                unit_price: price,
            }],
        },
    }
}

fn delivery(number: &str) -> SourceDocument {
    SourceDocument {
        source: SyncSource::ProductDelivery,
        id: SourceDocumentId::new(),
        reference_number: number.to_string(),
        document_date: NaiveDate::from_ymd_opt(2024, 4, 12).unwrap(),
        due_date: None,
        counterparty_id: Some(CounterpartyId::new()),
        counterparty_name: "PT Minyak Nusantara".to_string(),
        counterparty_category: None,
        contract_id: Some(ContractId::new()),
        contract_number: Some("KTR-07".to_string()),
        note: None,
        basis: ValuationBasis::Weight {
            weight: Some(dec!(1000)),
            unit_price: Some(dec!(12500)),
        },
    }
}

#[test]
fn test_second_run_creates_only_new_document() {
    let a = receipt("GR-A", Some(dec!(100)));
    let b = receipt("GR-B", Some(dec!(200)));

    let existing = HashSet::new();
    let first = SyncPlanner::plan(SyncSource::GoodsReceipt, vec![a.clone(), b.clone()], &existing, 2);
    assert_eq!(first.to_create.len(), 2);
    assert_eq!(first.already_synced, 0);

    let existing: HashSet<_> = first.to_create.iter().map(|d| d.reference_id).collect();
    let c = receipt("GR-C", Some(dec!(300)));
    let second = SyncPlanner::plan(SyncSource::GoodsReceipt, vec![a, b, c.clone()], &existing, 2);

    assert_eq!(second.to_create.len(), 1);
    assert_eq!(second.to_create[0].reference_id, c.id);
    assert_eq!(second.to_create[0].total_amount, dec!(3000));
    assert_eq!(second.already_synced, 2);
}

#[test]
fn test_failed_document_does_not_block_batch() {
    let good = receipt("GR-1", Some(dec!(100)));
    let bad = receipt("GR-2", None);

    let plan = SyncPlanner::plan(
        SyncSource::GoodsReceipt,
        vec![bad.clone(), good.clone()],
        &HashSet::new(),
        2,
    );

    assert_eq!(plan.to_create.len(), 1);
    assert_eq!(plan.to_create[0].reference_id, good.id);
    assert_eq!(plan.failures.len(), 1);
    assert_eq!(plan.failures[0].reference_id, bad.id);
    assert_eq!(plan.failures[0].code, "MISSING_UNIT_PRICE");
}

#[test]
fn test_duplicate_document_in_batch_planned_once() {
    let doc = receipt("GR-1", Some(dec!(100)));
    let plan = SyncPlanner::plan(
        SyncSource::GoodsReceipt,
        vec![doc.clone(), doc],
        &HashSet::new(),
        2,
    );
    assert_eq!(plan.to_create.len(), 1);
    assert_eq!(plan.already_synced, 1);
}

#[test]
fn test_foreign_source_document_reported() {
    let plan = SyncPlanner::plan(
        SyncSource::GoodsReceipt,
        vec![delivery("DO-1")],
        &HashSet::new(),
        2,
    );
    assert!(plan.to_create.is_empty());
    assert_eq!(plan.failures[0].code, "WRONG_SOURCE");
}

#[test]
fn test_delivery_draft_is_receivable_with_contract() {
    let doc = delivery("DO-1");
    let plan = SyncPlanner::plan(SyncSource::ProductDelivery, vec![doc.clone()], &HashSet::new(), 2);
    let draft = &plan.to_create[0];

    assert_eq!(draft.direction, LedgerDirection::Receivable);
    assert_eq!(draft.source_type, SourceType::ProductDelivery);
    assert_eq!(draft.total_amount, dec!(12500000));
    assert_eq!(draft.contract_number.as_deref(), Some("KTR-07"));
    assert_eq!(draft.buyer_id, doc.counterparty_id);

    let entry = LedgerService::open_entry(OrganizationId::new(), draft.clone(), Utc::now());
    assert_eq!(entry.status, SettlementStatus::Unpaid);
    assert_eq!(entry.remaining_amount, entry.total_amount);
}

#[test]
fn test_payable_draft_has_no_buyer() {
    let plan = SyncPlanner::plan(
        SyncSource::GoodsReceipt,
        vec![receipt("GR-1", Some(dec!(1)))],
        &HashSet::new(),
        2,
    );
    assert_eq!(plan.to_create[0].buyer_id, None);
    assert_eq!(plan.to_create[0].direction, LedgerDirection::Payable);
}

#[test]
fn test_report_merge_orders_sources_and_totals() {
    let receivables = SourceSyncReport::new(SyncSource::ProductDelivery, vec![], 3, vec![]);
    let plan = SyncPlanner::plan(
        SyncSource::GoodsReceipt,
        vec![receipt("GR-1", None)],
        &HashSet::new(),
        2,
    );
    let payables = SourceSyncReport::new(SyncSource::GoodsReceipt, vec![], 1, plan.failures);

    let report = SyncReport::merge(vec![receivables, payables]);
    assert_eq!(report.sources[0].source, SyncSource::GoodsReceipt);
    assert_eq!(report.sources[1].source, SyncSource::ProductDelivery);
    assert_eq!(report.total_already_synced, 4);
    assert_eq!(report.total_failed, 1);
    assert!(!report.is_clean());
    assert_eq!(report.sources[0].failed_references().len(), 1);
}

#[test]
fn test_document_beyond_ledger_capacity_reported() {
    let huge = receipt("GR-HUGE", Some(dec!(1000000000000000)));
    let normal = receipt("GR-OK", Some(dec!(100)));

    let plan = SyncPlanner::plan(
        SyncSource::GoodsReceipt,
        vec![huge.clone(), normal.clone()],
        &HashSet::new(),
        2,
    );

    assert_eq!(plan.to_create.len(), 1);
    assert_eq!(plan.to_create[0].reference_id, normal.id);
    assert_eq!(plan.failures.len(), 1);
    assert_eq!(plan.failures[0].reference_id, huge.id);
    assert_eq!(plan.failures[0].reference_number, "GR-HUGE");
    assert_eq!(plan.failures[0].code, "INVALID_ENTRY");
}

fn batch(max_len: usize) -> impl Strategy<Value = Vec<SourceDocument>> {
    prop::collection::vec(
        (1i64..1_000_000i64, any::<bool>()).prop_map(|(cents, priced)| {
            let price = priced.then(|| Decimal::new(cents, 2));
            receipt("GR-PROP", price)
        }),
        0..=max_len,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Re-planning with the references created by a first run creates nothing.
    #[test]
    fn prop_replan_is_idempotent(documents in batch(20)) {
        let first = SyncPlanner::plan(SyncSource::GoodsReceipt, documents.clone(), &HashSet::new(), 2);
        let existing: HashSet<_> = first.to_create.iter().map(|d| d.reference_id).collect();

        let second = SyncPlanner::plan(SyncSource::GoodsReceipt, documents, &existing, 2);
        prop_assert!(second.to_create.is_empty());
        prop_assert_eq!(second.already_synced, first.to_create.len());
        prop_assert_eq!(second.failures.len(), first.failures.len());
    }

    /// Every document is accounted for exactly once.
    #[test]
    fn prop_every_document_accounted(documents in batch(20)) {
        let total = documents.len();
        let plan = SyncPlanner::plan(SyncSource::GoodsReceipt, documents, &HashSet::new(), 2);
        prop_assert_eq!(plan.to_create.len() + plan.already_synced + plan.failures.len(), total);
    }
}
