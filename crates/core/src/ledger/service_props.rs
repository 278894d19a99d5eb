//! Property-based tests for settlement planning.
//!
//! - Conservation: settled equals the sum of accepted settlements
//! - Non-overspend: rejected settlements leave the balance untouched
//! - Status derivation holds after every mutation

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use subledger_shared::types::{OrganizationId, SourceDocumentId, UserId};

use super::entry::{LedgerEntry, SettlementRecord};
use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{LedgerDirection, NewLedgerEntry, SettleRequest, SettlementStatus, SourceType};

/// Strategy to generate positive decimal amounts (0.01 to 10,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate settlement attempts, some of which will overspend.
fn attempts(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(
        prop_oneof![
            4 => positive_amount(),
            1 => Just(Decimal::ZERO),
            1 => (1i64..100_000i64).prop_map(|cents| Decimal::new(-cents, 2)),
        ],
        1..=max_len,
    )
}

fn make_entry(total: Decimal) -> LedgerEntry {
    LedgerService::open_entry(
        OrganizationId::new(),
        NewLedgerEntry {
            direction: LedgerDirection::Receivable,
            source_type: SourceType::ProductDelivery,
            reference_id: SourceDocumentId::new(),
            reference_number: "DO-PROP".to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            due_date: None,
            counterparty_id: None,
            counterparty_name: "Buyer".to_string(),
            counterparty_category: None,
            total_amount: total,
            note: None,
            contract_id: None,
            contract_number: None,
            buyer_id: None,
        },
        Utc::now(),
    )
}

/// Applies attempts in order, mirroring what the store does on success.
fn run(entry: &mut LedgerEntry, amounts: &[Decimal]) -> Vec<SettlementRecord> {
    let user = UserId::new();
    let mut history = Vec::new();
    for amount in amounts {
        let request = SettleRequest::new(*amount, user);
        if let Ok(plan) = LedgerService::plan_settlement(entry, &request, Utc::now()) {
            entry.settled_amount = plan.balance.settled;
            entry.remaining_amount = plan.balance.remaining;
            entry.status = plan.balance.status;
            history.push(plan.record);
        }
    }
    history
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Settled amount always equals the sum of recorded settlements.
    #[test]
    fn prop_conservation_holds(
        total in positive_amount(),
        amounts in attempts(20),
    ) {
        let mut entry = make_entry(total);
        let history = run(&mut entry, &amounts);

        let sum: Decimal = history.iter().map(|r| r.amount).sum();
        prop_assert_eq!(entry.settled_amount, sum);
        prop_assert!(LedgerService::verify_conservation(&entry, &history).is_ok());
        prop_assert!(entry.settled_amount <= entry.total_amount);
    }

    /// An amount above the remaining balance is rejected and nothing changes.
    #[test]
    fn prop_overspend_rejected_without_effect(
        total in positive_amount(),
        first_share in 0u32..100,
        excess in positive_amount(),
    ) {
        let mut entry = make_entry(total);
        let first = (total * Decimal::from(first_share) / Decimal::from(100)).round_dp(2);
        run(&mut entry, &[first]);
        let before = entry.balance();

        let request = SettleRequest::new(entry.remaining_amount + excess, UserId::new());
        let result = LedgerService::plan_settlement(&entry, &request, Utc::now());

        if entry.status == SettlementStatus::Paid {
            prop_assert!(matches!(result, Err(LedgerError::AlreadySettled)));
        } else {
            let is_exceeds = matches!(
                result,
                Err(LedgerError::ExceedsRemaining { remaining, .. }) if remaining == before.remaining
            );
            prop_assert!(is_exceeds);
        }
        prop_assert_eq!(entry.balance(), before);
    }

    /// Amounts finer than the stored scale are rejected before any change.
    #[test]
    fn prop_excess_precision_rejected(
        total in positive_amount(),
        units in 1i64..1_000_000_000i64,
        scale in 5u32..=8,
    ) {
        let amount = Decimal::new(units, scale);
        prop_assume!(amount.normalize().scale() > 4);

        let entry = make_entry(total);
        let request = SettleRequest::new(amount, UserId::new());
        let result = LedgerService::plan_settlement(&entry, &request, Utc::now());
        prop_assert!(
            matches!(result, Err(LedgerError::AmountPrecision { .. })),
            "expected AmountPrecision error, got {:?}",
            result
        );
    }

    /// Status matches the derivation rule after every accepted mutation.
    #[test]
    fn prop_status_derivation_after_each_step(
        total in positive_amount(),
        amounts in attempts(15),
    ) {
        let mut entry = make_entry(total);
        for amount in amounts {
            run(&mut entry, &[amount]);
            let paid = entry.remaining_amount == Decimal::ZERO;
            let untouched = entry.settled_amount == Decimal::ZERO;
            prop_assert_eq!(entry.status == SettlementStatus::Paid, paid);
            prop_assert_eq!(entry.status == SettlementStatus::Unpaid, untouched);
            prop_assert_eq!(entry.remaining_amount, entry.total_amount - entry.settled_amount);
        }
    }

    /// Settling in full always lands on Paid with the exact remaining amount.
    #[test]
    fn prop_full_settlement_closes_entry(
        total in positive_amount(),
        amounts in attempts(5),
    ) {
        let mut entry = make_entry(total);
        run(&mut entry, &amounts);
        prop_assume!(entry.status != SettlementStatus::Paid);

        let remaining = entry.remaining_amount;
        let plan = LedgerService::plan_full_settlement(&entry, UserId::new(), Utc::now()).unwrap();
        prop_assert_eq!(plan.record.amount, remaining);
        prop_assert_eq!(plan.balance.status, SettlementStatus::Paid);
        prop_assert_eq!(plan.balance.settled, total);
    }
}
