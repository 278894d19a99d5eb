//! Sync run reports.

use serde::{Deserialize, Serialize};
use subledger_shared::types::SourceDocumentId;

use super::source::SyncSource;
use crate::ledger::entry::LedgerEntry;

/// A document that could not be synced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncFailure {
    /// Document id.
    pub reference_id: SourceDocumentId,
    /// Document number.
    pub reference_number: String,
    /// Stable failure code.
    pub code: String,
    /// Human-readable reason.
    pub reason: String,
}

/// Result of syncing one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSyncReport {
    /// Source that was synced.
    pub source: SyncSource,
    /// Entries created by this run.
    pub created: Vec<LedgerEntry>,
    /// Number of entries created.
    pub count: usize,
    /// Documents skipped because an entry already existed.
    pub already_synced: usize,
    /// Documents that could not be valued.
    pub failures: Vec<SyncFailure>,
}

impl SourceSyncReport {
    /// Creates a report for one source.
    #[must_use]
    pub fn new(
        source: SyncSource,
        created: Vec<LedgerEntry>,
        already_synced: usize,
        failures: Vec<SyncFailure>,
    ) -> Self {
        Self {
            source,
            count: created.len(),
            created,
            already_synced,
            failures,
        }
    }

    /// Failed reference ids, in the order they were encountered.
    #[must_use]
    pub fn failed_references(&self) -> Vec<SourceDocumentId> {
        self.failures.iter().map(|f| f.reference_id).collect()
    }
}

/// Merged result of syncing several sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// Per-source reports, in [`SyncSource::ALL`] order.
    pub sources: Vec<SourceSyncReport>,
    /// Entries created across all sources.
    pub total_created: usize,
    /// Documents skipped as already synced across all sources.
    pub total_already_synced: usize,
    /// Documents that failed across all sources.
    pub total_failed: usize,
}

impl SyncReport {
    /// Merges per-source reports.
    #[must_use]
    pub fn merge(mut sources: Vec<SourceSyncReport>) -> Self {
        sources.sort_by_key(|r| r.source);
        Self {
            total_created: sources.iter().map(|r| r.count).sum(),
            total_already_synced: sources.iter().map(|r| r.already_synced).sum(),
            total_failed: sources.iter().map(|r| r.failures.len()).sum(),
            sources,
        }
    }

    /// Returns true if no document failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.total_failed == 0
    }
}

impl From<SourceSyncReport> for SyncReport {
    fn from(report: SourceSyncReport) -> Self {
        Self::merge(vec![report])
    }
}
