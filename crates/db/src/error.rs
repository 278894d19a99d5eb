//! Storage error type and database error classification.

use sea_orm::{DbErr, RuntimeErr, SqlErr};
use subledger_core::ledger::LedgerError;
use subledger_core::reports::ReportError;
use subledger_shared::AppError;
use thiserror::Error;

/// Postgres `serialization_failure`.
const SERIALIZATION_FAILURE: &str = "40001";
/// Postgres `deadlock_detected`.
const DEADLOCK_DETECTED: &str = "40P01";
/// Postgres `lock_not_available`.
const LOCK_NOT_AVAILABLE: &str = "55P03";

/// Errors returned by the ledger repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Ledger rule or lookup failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Report generation failure.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.error_code(),
            Self::Report(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if the operation may succeed when repeated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Ledger(err) => err.is_retryable(),
            Self::Report(_) | Self::Database(_) => false,
        }
    }

    /// Classifies a database error raised inside a settlement transaction.
    ///
    /// Lock contention becomes `ConcurrentModification` so callers can retry.
    pub(crate) fn from_contended(err: DbErr) -> Self {
        if is_contention(&err) {
            Self::Ledger(LedgerError::ConcurrentModification)
        } else {
            Self::Database(err)
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::Ledger(ledger) => match ledger {
                LedgerError::EntryNotFound(_) => Self::NotFound(message),
                LedgerError::NonPositiveAmount
                | LedgerError::AmountPrecision { .. }
                | LedgerError::InvalidEntry(_)
                | LedgerError::InvalidDateRange { .. } => Self::Validation(message),
                LedgerError::AlreadySettled | LedgerError::ExceedsRemaining { .. } => {
                    Self::BusinessRule(message)
                }
                LedgerError::DuplicateReference(_) | LedgerError::ConcurrentModification => {
                    Self::Conflict(message)
                }
                LedgerError::Inconsistent(_) => Self::Consistency(message),
            },
            StoreError::Report(ReportError::Unbalanced { .. }) => Self::Consistency(message),
            StoreError::Database(_) => Self::Database(message),
        }
    }
}

/// Returns the Postgres SQLSTATE carried by a database error, if any.
pub(crate) fn sqlstate(err: &DbErr) -> Option<String> {
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(inner)) | DbErr::Query(RuntimeErr::SqlxError(inner)) => {
            inner
                .as_database_error()
                .and_then(|db| db.code())
                .map(std::borrow::Cow::into_owned)
        }
        _ => None,
    }
}

/// True for errors caused by another transaction holding the same rows.
pub(crate) fn is_contention(err: &DbErr) -> bool {
    matches!(
        sqlstate(err).as_deref(),
        Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED | LOCK_NOT_AVAILABLE)
    )
}

/// True when an insert hit a unique constraint.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
