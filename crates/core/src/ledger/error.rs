//! Ledger error types for validation and state errors.
//!
//! Covers lookups, settlement validation, manual entry validation,
//! concurrency, and invariant drift detected after a mutation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use subledger_shared::types::LedgerEntryId;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Lookup Errors ==========
    /// Entry does not exist or belongs to another organization.
    #[error("Ledger entry not found: {0}")]
    EntryNotFound(LedgerEntryId),

    // ========== Settlement Errors ==========
    /// Entry is already fully settled.
    #[error("Ledger entry is already fully settled")]
    AlreadySettled,

    /// Settlement amount exceeds the remaining balance.
    #[error("Settlement amount {requested} exceeds remaining balance; at most {remaining} may be settled")]
    ExceedsRemaining {
        /// Amount the caller asked to settle.
        requested: Decimal,
        /// Remaining balance at the time of the request.
        remaining: Decimal,
    },

    /// Settlement amount must be positive.
    #[error("Settlement amount must be greater than zero")]
    NonPositiveAmount,

    /// Amount has more decimal places than stored amounts keep.
    #[error("Amount {amount} has more than {max_scale} decimal places")]
    AmountPrecision {
        /// Rejected amount.
        amount: Decimal,
        /// Decimal places kept in storage.
        max_scale: u32,
    },

    // ========== Entry Creation Errors ==========
    /// Manual entry input is invalid.
    #[error("Invalid ledger entry: {0}")]
    InvalidEntry(String),

    /// Date range filter is inverted.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange {
        /// Lower bound.
        from: NaiveDate,
        /// Upper bound.
        to: NaiveDate,
    },

    /// An entry already exists for the same source document.
    #[error("A ledger entry already exists for reference {0}")]
    DuplicateReference(String),

    // ========== Concurrency Errors ==========
    /// Concurrent modification detected.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    // ========== Consistency Errors ==========
    /// Stored amounts violate an entry invariant.
    #[error("Ledger entry is inconsistent: {0}")]
    Inconsistent(String),
}

impl LedgerError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AlreadySettled => "ALREADY_SETTLED",
            Self::ExceedsRemaining { .. } => "EXCEEDS_REMAINING",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::AmountPrecision { .. } => "AMOUNT_PRECISION",
            Self::InvalidEntry(_) => "INVALID_ENTRY",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::DuplicateReference(_) => "DUPLICATE_REFERENCE",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Inconsistent(_) => "INCONSISTENT_ENTRY",
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::AlreadySettled.error_code(), "ALREADY_SETTLED");
        assert_eq!(
            LedgerError::ExceedsRemaining {
                requested: Decimal::new(700_000, 0),
                remaining: Decimal::new(600_000, 0),
            }
            .error_code(),
            "EXCEEDS_REMAINING"
        );
        assert_eq!(
            LedgerError::NonPositiveAmount.error_code(),
            "NON_POSITIVE_AMOUNT"
        );
        assert_eq!(
            LedgerError::EntryNotFound(LedgerEntryId::new()).error_code(),
            "ENTRY_NOT_FOUND"
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LedgerError::ConcurrentModification.is_retryable());
        assert!(!LedgerError::AlreadySettled.is_retryable());
        assert!(!LedgerError::NonPositiveAmount.is_retryable());
    }

    #[test]
    fn test_amount_precision_message() {
        let err = LedgerError::AmountPrecision {
            amount: Decimal::new(3_333_335, 5),
            max_scale: 4,
        };
        assert_eq!(err.error_code(), "AMOUNT_PRECISION");
        assert_eq!(err.to_string(), "Amount 33.33335 has more than 4 decimal places");
    }

    #[test]
    fn test_exceeds_remaining_message_carries_allowed_amount() {
        let err = LedgerError::ExceedsRemaining {
            requested: Decimal::new(700_000, 0),
            remaining: Decimal::new(600_000, 0),
        };
        assert_eq!(
            err.to_string(),
            "Settlement amount 700000 exceeds remaining balance; at most 600000 may be settled"
        );
    }
}
