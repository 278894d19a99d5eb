//! Sync planning: decide which documents become new ledger entries.

use std::collections::HashSet;

use rust_decimal::Decimal;
use subledger_shared::types::SourceDocumentId;

use super::report::SyncFailure;
use super::source::{SourceDocument, SyncSource};
use super::valuation::value_document;
use crate::ledger::types::{LedgerDirection, NewLedgerEntry};
use crate::ledger::validation::validate_draft;

/// What one sync run must do for one source.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    /// Source the plan was built for.
    pub source: SyncSource,
    /// Drafts for documents without an entry yet.
    pub to_create: Vec<NewLedgerEntry>,
    /// Documents skipped because an entry already exists.
    pub already_synced: usize,
    /// Documents that could not be valued.
    pub failures: Vec<SyncFailure>,
}

/// Builds sync plans from finalized documents and the set of references
/// already present in the ledger.
pub struct SyncPlanner;

impl SyncPlanner {
    /// Plans a sync run for `source`.
    ///
    /// Documents already referenced by an entry are skipped, as are repeats
    /// of the same document within the batch. Documents that fail valuation,
    /// yield an entry the ledger cannot hold, or belong to another source,
    /// are reported as failures. Input
    /// order is preserved in `to_create`.
    #[must_use]
    pub fn plan(
        source: SyncSource,
        documents: Vec<SourceDocument>,
        existing: &HashSet<SourceDocumentId>,
        scale: u32,
    ) -> SyncPlan {
        let mut seen: HashSet<SourceDocumentId> = HashSet::with_capacity(documents.len());
        let mut plan = SyncPlan {
            source,
            to_create: Vec::new(),
            already_synced: 0,
            failures: Vec::new(),
        };

        for document in documents {
            if document.source != source {
                plan.failures.push(SyncFailure {
                    reference_id: document.id,
                    reference_number: document.reference_number,
                    code: "WRONG_SOURCE".to_string(),
                    reason: format!("document belongs to {}", document.source),
                });
                continue;
            }

            if existing.contains(&document.id) || !seen.insert(document.id) {
                plan.already_synced += 1;
                continue;
            }

            let amount = match value_document(&document, scale) {
                Ok(amount) => amount,
                Err(err) => {
                    plan.failures.push(SyncFailure {
                        reference_id: document.id,
                        reference_number: document.reference_number,
                        code: err.error_code().to_string(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let draft = Self::draft(document, amount);
            match validate_draft(&draft) {
                Ok(()) => plan.to_create.push(draft),
                Err(err) => plan.failures.push(SyncFailure {
                    reference_id: draft.reference_id,
                    code: err.error_code().to_string(),
                    reason: err.to_string(),
                    reference_number: draft.reference_number,
                }),
            }
        }

        plan
    }

    fn draft(document: SourceDocument, amount: Decimal) -> NewLedgerEntry {
        let source = document.source;
        let buyer_id = match source.direction() {
            LedgerDirection::Receivable => document.counterparty_id,
            LedgerDirection::Payable => None,
        };

        NewLedgerEntry {
            direction: source.direction(),
            source_type: source.source_type(),
            reference_id: document.id,
            reference_number: document.reference_number,
            transaction_date: document.document_date,
            due_date: document.due_date,
            counterparty_id: document.counterparty_id,
            counterparty_name: document.counterparty_name,
            counterparty_category: document.counterparty_category,
            total_amount: amount,
            note: document.note,
            contract_id: document.contract_id,
            contract_number: document.contract_number,
            buyer_id,
        }
    }
}
