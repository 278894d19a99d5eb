//! Balance mutation: payments against payables and receipts against
//! receivables.
//!
//! Each settlement is one database transaction. The entry row is locked with
//! `SELECT ... FOR UPDATE`, so settlements on the same entry serialize while
//! different entries proceed concurrently. The new balance is computed by
//! [`LedgerService`] and written together with the history record; any
//! failure drops the transaction and nothing is applied.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use subledger_core::ledger::{
    LedgerEntry, LedgerError, LedgerService, SettleRequest, SettlementRecord,
};
use subledger_shared::types::{LedgerEntryId, OrganizationId, UserId};
use tracing::{info, instrument, warn};

use crate::entities::{ledger_entries, settlements};
use crate::error::StoreError;

/// Attempts made when a settlement loses a lock race.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// What a settlement should apply.
#[derive(Debug, Clone, Copy)]
enum SettleKind<'a> {
    /// A caller-chosen amount.
    Amount(&'a SettleRequest),
    /// Whatever remains, recorded with the paid-in-full marker.
    InFull(UserId),
}

/// Repository applying settlements to ledger entries.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    db: DatabaseConnection,
    retry_attempts: u32,
}

impl SettlementRepository {
    /// Creates a new settlement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        }
    }

    /// Sets how many times a contended settlement is attempted.
    #[must_use]
    pub const fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Settles part or all of an entry's remaining balance.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if the entry does not exist in this organization
    /// - `AlreadySettled` if the entry is paid
    /// - `NonPositiveAmount`, `AmountPrecision` or `ExceedsRemaining` for an
    ///   invalid amount
    /// - `ConcurrentModification` if lock contention outlasts the retries
    #[instrument(skip_all, fields(organization_id = %organization_id, entry_id = %entry_id, amount = %request.amount))]
    pub async fn settle(
        &self,
        organization_id: OrganizationId,
        entry_id: LedgerEntryId,
        request: SettleRequest,
    ) -> Result<SettlementRecord, StoreError> {
        self.run(organization_id, entry_id, SettleKind::Amount(&request))
            .await
    }

    /// Settles the whole remaining balance of an entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `AlreadySettled`, or
    /// `ConcurrentModification` if lock contention outlasts the retries.
    #[instrument(skip_all, fields(organization_id = %organization_id, entry_id = %entry_id))]
    pub async fn settle_in_full(
        &self,
        organization_id: OrganizationId,
        entry_id: LedgerEntryId,
        recorded_by: UserId,
    ) -> Result<SettlementRecord, StoreError> {
        self.run(organization_id, entry_id, SettleKind::InFull(recorded_by))
            .await
    }

    async fn run(
        &self,
        organization_id: OrganizationId,
        entry_id: LedgerEntryId,
        kind: SettleKind<'_>,
    ) -> Result<SettlementRecord, StoreError> {
        let attempts = self.retry_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.apply(organization_id, entry_id, kind).await {
                Err(err) if err.is_retryable() && attempt < attempts => {
                    warn!(attempt, error = %err, "settlement contended, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn apply(
        &self,
        organization_id: OrganizationId,
        entry_id: LedgerEntryId,
        kind: SettleKind<'_>,
    ) -> Result<SettlementRecord, StoreError> {
        let txn = self.db.begin().await.map_err(StoreError::from_contended)?;

        let entry: LedgerEntry = ledger_entries::Entity::find_by_id(entry_id.into_inner())
            .filter(ledger_entries::Column::OrganizationId.eq(organization_id.into_inner()))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(StoreError::from_contended)?
            .ok_or(LedgerError::EntryNotFound(entry_id))?
            .into();

        let now = Utc::now();
        let plan = match kind {
            SettleKind::Amount(request) => LedgerService::plan_settlement(&entry, request, now)?,
            SettleKind::InFull(recorded_by) => {
                LedgerService::plan_full_settlement(&entry, recorded_by, now)?
            }
        };

        ledger_entries::ActiveModel {
            id: Unchanged(entry.id.into_inner()),
            settled_amount: Set(plan.balance.settled),
            remaining_amount: Set(plan.balance.remaining),
            status: Set(plan.balance.status.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(StoreError::from_contended)?;

        let record = plan.record;
        let stored = settlements::ActiveModel {
            id: Set(record.id.into_inner()),
            ledger_entry_id: Set(record.ledger_entry_id.into_inner()),
            organization_id: Set(organization_id.into_inner()),
            amount: Set(record.amount),
            settled_at: Set(record.settled_at.into()),
            method: Set(record.method.map(Into::into)),
            external_reference: Set(record.external_reference),
            note: Set(record.note),
            recorded_by: Set(record.recorded_by.into_inner()),
            created_at: Set(record.created_at.into()),
        }
        .insert(&txn)
        .await
        .map_err(StoreError::from_contended)?;

        txn.commit().await.map_err(StoreError::from_contended)?;

        info!(
            settlement_id = %stored.id,
            settled = %plan.balance.settled,
            remaining = %plan.balance.remaining,
            status = %plan.balance.status,
            "settlement recorded"
        );

        Ok(stored.into())
    }
}
