//! Source document valuation.
//!
//! Amounts are rounded once, on the document total, to the configured scale
//! using Banker's Rounding.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::error::ValuationError;
use super::source::{LineItem, SourceDocument, ValuationBasis};

/// Computes the ledger amount of a source document.
///
/// # Errors
///
/// Returns `ValuationError` if a required quantity, weight or price is
/// missing, or the resulting amount is not positive.
pub fn value_document(document: &SourceDocument, scale: u32) -> Result<Decimal, ValuationError> {
    let raw = match &document.basis {
        ValuationBasis::LineItems { lines } => value_lines(lines)?,
        ValuationBasis::Weight { weight, unit_price } => {
            let weight = weight.ok_or(ValuationError::MissingWeight)?;
            let price = unit_price.ok_or(ValuationError::MissingDeliveryPrice)?;
            weight.checked_mul(price).ok_or(ValuationError::Overflow)?
        }
    };

    let amount = raw.round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven);
    if amount <= Decimal::ZERO {
        return Err(ValuationError::NonPositiveValue(amount));
    }
    Ok(amount)
}

fn value_lines(lines: &[LineItem]) -> Result<Decimal, ValuationError> {
    if lines.is_empty() {
        return Err(ValuationError::NoLineItems);
    }

    lines
        .iter()
        .enumerate()
        .try_fold(Decimal::ZERO, |acc, (index, item)| {
            let line = index + 1;
            let quantity = item
                .quantity
                .ok_or(ValuationError::MissingQuantity { line })?;
            let price = item
                .unit_price
                .ok_or(ValuationError::MissingUnitPrice { line })?;
            quantity
                .checked_mul(price)
                .and_then(|value| acc.checked_add(value))
                .ok_or(ValuationError::Overflow)
        })
}
