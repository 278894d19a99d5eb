//! Source reconciliation logic.
//!
//! Turns finalized operational documents into ledger entry drafts:
//! - Source kinds and document shapes
//! - Per-source valuation rules
//! - Idempotent sync planning against existing references
//! - Sync reports with per-document failures

pub mod error;
pub mod planner;
pub mod report;
pub mod source;
pub mod valuation;

#[cfg(test)]
mod tests;

pub use error::ValuationError;
pub use planner::{SyncPlan, SyncPlanner};
pub use report::{SourceSyncReport, SyncFailure, SyncReport};
pub use source::{LineItem, SourceDocument, SyncSource, ValuationBasis};
pub use valuation::value_document;
