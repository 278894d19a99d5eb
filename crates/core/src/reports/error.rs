//! Report error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Balance sheet identity does not hold.
    ///
    /// Indicates a bug or corrupted data, never a user mistake.
    #[error(
        "Balance sheet does not balance: assets {assets}, liabilities {liabilities}, equity {equity}, difference {difference}"
    )]
    Unbalanced {
        /// Total assets.
        assets: Decimal,
        /// Total liabilities.
        liabilities: Decimal,
        /// Equity.
        equity: Decimal,
        /// `assets - (liabilities + equity)`.
        difference: Decimal,
    },
}

impl ReportError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unbalanced { .. } => "BALANCE_SHEET_UNBALANCED",
        }
    }
}
