//! Source reconciliation: creates missing ledger entries from finalized
//! operational documents.
//!
//! A run is idempotent. Documents already referenced by an entry are left
//! alone, and the unique `(organization, source type, reference)` index
//! settles races between concurrent runs: the loser counts the document as
//! already synced.

use std::future::Future;

use chrono::Utc;
use futures::future::join_all;
use sea_orm::{DatabaseConnection, DbErr};
use subledger_core::ledger::{LedgerEntry, LedgerService};
use subledger_core::sync::{SourceSyncReport, SyncPlanner, SyncReport, SyncSource};
use subledger_shared::types::OrganizationId;
use tracing::{debug, error, info, instrument, warn};

use super::ledger::{LedgerRepository, insert_entry};
use super::source::SourceDocumentRepository;
use crate::error::{StoreError, is_unique_violation};

/// Default decimal places for document valuation.
pub const DEFAULT_VALUATION_SCALE: u32 = 2;

/// Repository running synchronization jobs.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
    ledger: LedgerRepository,
    sources: SourceDocumentRepository,
    valuation_scale: u32,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            ledger: LedgerRepository::new(db.clone()),
            sources: SourceDocumentRepository::new(db.clone()),
            db,
            valuation_scale: DEFAULT_VALUATION_SCALE,
        }
    }

    /// Sets the decimal places kept when valuing documents.
    #[must_use]
    pub const fn with_valuation_scale(mut self, scale: u32) -> Self {
        self.valuation_scale = scale;
        self
    }

    /// Creates entries for finalized documents of one source that have none.
    ///
    /// Documents that cannot be valued are skipped and listed in the report.
    ///
    /// # Errors
    ///
    /// Returns an error only if the database fails; per-document problems
    /// never abort the run. Entries inserted before a failure stay in place
    /// and are picked up as already synced by the next run.
    #[instrument(skip_all, fields(organization_id = %organization_id, source = %source))]
    pub async fn sync_from_source(
        &self,
        organization_id: OrganizationId,
        source: SyncSource,
    ) -> Result<SourceSyncReport, StoreError> {
        let documents = self.sources.fetch_finalized(organization_id, source).await?;
        let existing = self
            .ledger
            .existing_references(organization_id, source.source_type())
            .await?;

        let plan = SyncPlanner::plan(source, documents, &existing, self.valuation_scale);
        for failure in &plan.failures {
            warn!(
                reference_id = %failure.reference_id,
                reference = %failure.reference_number,
                code = %failure.code,
                reason = %failure.reason,
                "source document skipped"
            );
        }

        let now = Utc::now();
        let entries = plan
            .to_create
            .into_iter()
            .map(|draft| LedgerService::open_entry(organization_id, draft, now));
        let db = &self.db;
        let outcome = insert_entries(entries, |entry| async move {
            insert_entry(db, &entry).await
        })
        .await;

        if let Some(err) = outcome.aborted {
            error!(
                created = outcome.created.len(),
                already_synced = plan.already_synced + outcome.already_synced,
                error = %err,
                "source synchronization aborted; entries created so far are kept"
            );
            return Err(err.into());
        }

        let already_synced = plan.already_synced + outcome.already_synced;
        info!(
            created = outcome.created.len(),
            already_synced,
            failed = plan.failures.len(),
            "source synchronized"
        );

        Ok(SourceSyncReport::new(
            source,
            outcome.created,
            already_synced,
            plan.failures,
        ))
    }

    /// Runs every source concurrently and merges the reports.
    ///
    /// # Errors
    ///
    /// Returns the first database error raised by any source.
    #[instrument(skip_all, fields(organization_id = %organization_id))]
    pub async fn sync_all(&self, organization_id: OrganizationId) -> Result<SyncReport, StoreError> {
        let runs = SyncSource::ALL
            .into_iter()
            .map(|source| self.sync_from_source(organization_id, source));

        let reports = join_all(runs)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        let report = SyncReport::merge(reports);
        info!(
            total_created = report.total_created,
            total_already_synced = report.total_already_synced,
            total_failed = report.total_failed,
            "all sources synchronized"
        );

        Ok(report)
    }
}

/// Result of inserting a batch of planned entries.
#[derive(Debug, Default)]
struct InsertOutcome {
    created: Vec<LedgerEntry>,
    already_synced: usize,
    aborted: Option<DbErr>,
}

/// Inserts entries one by one until the first error that is not a unique
/// violation, which stops the batch and is returned alongside what was
/// already inserted.
async fn insert_entries<I, F, Fut>(entries: I, mut insert: F) -> InsertOutcome
where
    I: IntoIterator<Item = LedgerEntry>,
    F: FnMut(LedgerEntry) -> Fut,
    Fut: Future<Output = Result<LedgerEntry, DbErr>>,
{
    let mut outcome = InsertOutcome::default();

    for entry in entries {
        let reference_id = entry.reference_id;
        match insert(entry).await {
            Ok(stored) => outcome.created.push(stored),
            Err(err) if is_unique_violation(&err) => {
                debug!(reference_id = %reference_id, "created by a concurrent run");
                outcome.already_synced += 1;
            }
            Err(err) => {
                outcome.aborted = Some(err);
                break;
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use subledger_core::ledger::{LedgerDirection, NewLedgerEntry, SourceType};
    use subledger_shared::types::SourceDocumentId;

    fn entry(reference: &str) -> LedgerEntry {
        let draft = NewLedgerEntry {
            direction: LedgerDirection::Receivable,
            source_type: SourceType::ProductDelivery,
            reference_id: SourceDocumentId::new(),
            reference_number: reference.to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            due_date: None,
            counterparty_id: None,
            counterparty_name: "PT Refinery Dumai".to_string(),
            counterparty_category: None,
            total_amount: dec!(125000),
            note: None,
            contract_id: None,
            contract_number: None,
            buyer_id: None,
        };
        LedgerService::open_entry(OrganizationId::new(), draft, Utc::now())
    }

    #[tokio::test]
    async fn test_insert_entries_keeps_rows_created_before_failure() {
        let entries = vec![entry("DO-001"), entry("DO-002"), entry("DO-003")];
        let mut attempts = 0;

        let outcome = insert_entries(entries, |entry| {
            attempts += 1;
            let fail = attempts == 2;
            async move {
                if fail {
                    Err(DbErr::Custom("connection reset".to_string()))
                } else {
                    Ok(entry)
                }
            }
        })
        .await;

        assert_eq!(attempts, 2);
        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.created[0].reference_number, "DO-001");
        assert_eq!(outcome.already_synced, 0);
        assert!(matches!(outcome.aborted, Some(DbErr::Custom(_))));
    }

    #[tokio::test]
    async fn test_insert_entries_without_failure_creates_all() {
        let entries = vec![entry("DO-001"), entry("DO-002")];

        let outcome = insert_entries(entries, |entry| async move { Ok(entry) }).await;

        assert_eq!(outcome.created.len(), 2);
        assert!(outcome.aborted.is_none());
    }
}
