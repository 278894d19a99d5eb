//! Valuation error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a source document cannot be valued.
///
/// These are scoped to one document: synchronization records them as a
/// failure for that document and carries on with the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// Document has no line items.
    #[error("Document has no line items")]
    NoLineItems,

    /// A line item has no unit price.
    #[error("Line {line} has no unit price")]
    MissingUnitPrice {
        /// 1-based line number.
        line: usize,
    },

    /// A line item has no quantity.
    #[error("Line {line} has no quantity")]
    MissingQuantity {
        /// 1-based line number.
        line: usize,
    },

    /// Delivery has no delivered weight.
    #[error("Delivery has no delivered weight")]
    MissingWeight,

    /// Delivery has no unit price.
    #[error("Delivery has no unit price")]
    MissingDeliveryPrice,

    /// Arithmetic overflowed while valuing the document.
    #[error("Value overflowed while computing the document amount")]
    Overflow,

    /// Computed value is zero or negative.
    #[error("Computed value {0} is not positive")]
    NonPositiveValue(Decimal),
}

impl ValuationError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoLineItems => "NO_LINE_ITEMS",
            Self::MissingUnitPrice { .. } | Self::MissingDeliveryPrice => "MISSING_UNIT_PRICE",
            Self::MissingQuantity { .. } => "MISSING_QUANTITY",
            Self::MissingWeight => "MISSING_WEIGHT",
            Self::Overflow => "VALUE_OVERFLOW",
            Self::NonPositiveValue(_) => "NON_POSITIVE_VALUE",
        }
    }
}
