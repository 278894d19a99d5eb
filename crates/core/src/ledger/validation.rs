//! Business rule validation for manual entries and list filters.

use rust_decimal::Decimal;

use super::balance::check_precision;
use super::error::LedgerError;
use super::types::{LedgerFilter, ManualEntryInput, NewLedgerEntry, SourceType};

/// Exclusive upper bound on a stored amount (16 integer digits).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_874_919_424, 2_328_306, 0, false, 0);

/// Longest counterparty name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Longest reference number, category or contract number, in characters.
pub const MAX_CODE_LEN: usize = 100;

/// Validates a manual entry and turns it into a persistable draft.
///
/// Text fields are trimmed; empty optional text becomes `None`. A reference
/// id is generated when the caller did not supply one.
///
/// # Errors
///
/// Returns `InvalidEntry` or `AmountPrecision` as described on
/// [`validate_draft`].
pub fn validate_manual_entry(input: ManualEntryInput) -> Result<NewLedgerEntry, LedgerError> {
    let draft = NewLedgerEntry {
        direction: input.direction,
        source_type: SourceType::Manual,
        reference_id: input.reference_id.unwrap_or_default(),
        reference_number: input.reference_number.trim().to_string(),
        transaction_date: input.transaction_date,
        due_date: input.due_date,
        counterparty_id: input.counterparty_id,
        counterparty_name: input.counterparty_name.trim().to_string(),
        counterparty_category: non_blank(input.counterparty_category),
        total_amount: input.total_amount,
        note: non_blank(input.note),
        contract_id: None,
        contract_number: None,
        buyer_id: None,
    };
    validate_draft(&draft)?;
    Ok(draft)
}

/// Checks a draft against what an entry may hold.
///
/// # Errors
///
/// - `InvalidEntry` if the total is not positive or not below
///   [`MAX_AMOUNT`], the counterparty name or reference number is blank,
///   a text field is longer than its column, or the due date precedes the
///   transaction date
/// - `AmountPrecision` if the total has more decimal places than storage keeps
pub fn validate_draft(draft: &NewLedgerEntry) -> Result<(), LedgerError> {
    if draft.total_amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidEntry(
            "total amount must be greater than zero".to_string(),
        ));
    }
    if draft.total_amount >= MAX_AMOUNT {
        return Err(LedgerError::InvalidEntry(format!(
            "total amount {} is too large",
            draft.total_amount
        )));
    }
    check_precision(draft.total_amount)?;

    if draft.counterparty_name.trim().is_empty() {
        return Err(LedgerError::InvalidEntry(
            "counterparty name is required".to_string(),
        ));
    }
    if draft.reference_number.trim().is_empty() {
        return Err(LedgerError::InvalidEntry(
            "reference number is required".to_string(),
        ));
    }

    check_length("counterparty name", &draft.counterparty_name, MAX_NAME_LEN)?;
    check_length("reference number", &draft.reference_number, MAX_CODE_LEN)?;
    if let Some(category) = &draft.counterparty_category {
        check_length("counterparty category", category, MAX_CODE_LEN)?;
    }
    if let Some(contract) = &draft.contract_number {
        check_length("contract number", contract, MAX_CODE_LEN)?;
    }

    if let Some(due) = draft.due_date
        && due < draft.transaction_date
    {
        return Err(LedgerError::InvalidEntry(format!(
            "due date {due} is before transaction date {}",
            draft.transaction_date
        )));
    }
    Ok(())
}

/// Validates a list filter.
///
/// # Errors
///
/// Returns `InvalidDateRange` if `date_from` is after `date_to`.
pub fn validate_filter(filter: &LedgerFilter) -> Result<(), LedgerError> {
    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to)
        && from > to
    {
        return Err(LedgerError::InvalidDateRange { from, to });
    }
    Ok(())
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), LedgerError> {
    let len = value.chars().count();
    if len > max {
        return Err(LedgerError::InvalidEntry(format!(
            "{field} is {len} characters long; at most {max} are allowed"
        )));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
