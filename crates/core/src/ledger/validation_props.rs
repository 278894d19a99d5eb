//! Property-based tests for manual entry validation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{LedgerDirection, ManualEntryInput, SourceType};
use super::validation::validate_manual_entry;

fn input(total: Decimal, name: String, reference: String) -> ManualEntryInput {
    ManualEntryInput {
        direction: LedgerDirection::Payable,
        reference_id: None,
        reference_number: reference,
        transaction_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        due_date: None,
        counterparty_id: None,
        counterparty_name: name,
        counterparty_category: None,
        total_amount: total,
        note: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Non-positive totals are always rejected.
    #[test]
    fn prop_non_positive_total_rejected(cents in 0i64..100_000_000i64) {
        let result = validate_manual_entry(input(
            Decimal::new(-cents, 2),
            "Supplier".to_string(),
            "REF-1".to_string(),
        ));
        prop_assert!(matches!(result, Err(LedgerError::InvalidEntry(_))));
    }

    /// Valid input always yields a manual draft with the same total and trimmed text.
    #[test]
    fn prop_valid_input_accepted(
        cents in 1i64..100_000_000i64,
        name in "[A-Za-z][A-Za-z ]{0,30}",
        reference in "[A-Z]{2,4}-[0-9]{1,6}",
        pad in 0usize..3,
    ) {
        let padding = " ".repeat(pad);
        let total = Decimal::new(cents, 2);
        let draft = validate_manual_entry(input(
            total,
            format!("{padding}{name}{padding}"),
            format!("{padding}{reference}"),
        ))
        .unwrap();

        prop_assert_eq!(draft.total_amount, total);
        prop_assert_eq!(draft.source_type, SourceType::Manual);
        prop_assert_eq!(draft.counterparty_name, name.trim());
        prop_assert_eq!(draft.reference_number, reference);
    }
}
