//! Ledger store: creation, lookup and listing of payable/receivable entries.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use subledger_core::ledger::{
    LedgerDirection, LedgerEntry, LedgerEntryWithSettlements, LedgerError, LedgerFilter,
    LedgerService, ManualEntryInput, NewLedgerEntry, SettlementRecord, SettlementStatus,
    SourceType, validate_draft, validate_filter, validate_manual_entry,
};
use subledger_shared::types::{
    ContractId, CounterpartyId, LedgerEntryId, OrganizationId, PageRequest, PageResponse,
    SourceDocumentId,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums;
use crate::entities::{ledger_entries, settlements};
use crate::error::{StoreError, is_unique_violation};

/// Repository for ledger entries and their settlement history.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an unpaid entry from a draft.
    ///
    /// # Errors
    ///
    /// - `InvalidEntry` or `AmountPrecision` if the draft cannot be stored
    ///   as given
    /// - `DuplicateReference` if an entry already exists for the same
    ///   `(organization, source type, reference id)`
    #[instrument(skip_all, fields(organization_id = %organization_id, source_type = %draft.source_type))]
    pub async fn create(
        &self,
        organization_id: OrganizationId,
        draft: NewLedgerEntry,
    ) -> Result<LedgerEntry, StoreError> {
        validate_draft(&draft)?;
        let reference = draft.reference_number.clone();
        let entry = LedgerService::open_entry(organization_id, draft, Utc::now());

        match insert_entry(&self.db, &entry).await {
            Ok(entry) => {
                info!(entry_id = %entry.id, reference = %entry.reference_number, total = %entry.total_amount, "ledger entry created");
                Ok(entry)
            }
            Err(err) if is_unique_violation(&err) => {
                Err(LedgerError::DuplicateReference(reference).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Validates and creates a manual entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntry` for invalid input, or any error of [`Self::create`].
    pub async fn create_manual(
        &self,
        organization_id: OrganizationId,
        input: ManualEntryInput,
    ) -> Result<LedgerEntry, StoreError> {
        let draft = validate_manual_entry(input)?;
        self.create(organization_id, draft).await
    }

    /// Finds an entry by id within an organization.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry does not exist in this organization.
    pub async fn find_by_id(
        &self,
        organization_id: OrganizationId,
        entry_id: LedgerEntryId,
    ) -> Result<LedgerEntry, StoreError> {
        let model = ledger_entries::Entity::find_by_id(entry_id.into_inner())
            .filter(ledger_entries::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        Ok(model.into())
    }

    /// Gets an entry together with its settlement history.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry does not exist in this organization.
    pub async fn get_with_settlements(
        &self,
        organization_id: OrganizationId,
        entry_id: LedgerEntryId,
    ) -> Result<LedgerEntryWithSettlements, StoreError> {
        let entry = self.find_by_id(organization_id, entry_id).await?;
        let settlements = self.settlements_of(organization_id, entry_id).await?;
        Ok(LedgerEntryWithSettlements { entry, settlements })
    }

    /// Lists entries matching a filter, newest transaction date first.
    ///
    /// Entries sharing a transaction date keep insertion order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if the filter's range is inverted.
    pub async fn find_all(
        &self,
        organization_id: OrganizationId,
        filter: &LedgerFilter,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        validate_filter(filter)?;

        let models = filtered(organization_id, filter)
            .order_by_desc(ledger_entries::Column::TransactionDate)
            .order_by_asc(ledger_entries::Column::Seq)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Lists one page of entries in the same order as [`Self::find_all`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if the filter's range is inverted.
    pub async fn find_page(
        &self,
        organization_id: OrganizationId,
        filter: &LedgerFilter,
        page: PageRequest,
    ) -> Result<PageResponse<LedgerEntry>, StoreError> {
        validate_filter(filter)?;

        let total = filtered(organization_id, filter).count(&self.db).await?;
        let models = filtered(organization_id, filter)
            .order_by_desc(ledger_entries::Column::TransactionDate)
            .order_by_asc(ledger_entries::Column::Seq)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(
            models.into_iter().map(Into::into).collect(),
            page.page,
            page.per_page,
            total,
        ))
    }

    /// Lists entries that still carry a remaining balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_open(
        &self,
        organization_id: OrganizationId,
        direction: Option<LedgerDirection>,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let mut query = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(
                ledger_entries::Column::Status
                    .ne(sea_orm_active_enums::SettlementStatus::from(SettlementStatus::Paid)),
            );

        if let Some(direction) = direction {
            query = query.filter(
                ledger_entries::Column::Direction
                    .eq(sea_orm_active_enums::LedgerDirection::from(direction)),
            );
        }

        let models = query
            .order_by_asc(ledger_entries::Column::TransactionDate)
            .order_by_asc(ledger_entries::Column::Seq)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Finds the entry created from a source document, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_reference(
        &self,
        organization_id: OrganizationId,
        reference_id: SourceDocumentId,
    ) -> Result<Option<LedgerEntry>, StoreError> {
        let model = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(ledger_entries::Column::ReferenceId.eq(reference_id.into_inner()))
            .order_by_asc(ledger_entries::Column::Seq)
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    /// Returns the reference ids already present for one source type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn existing_references(
        &self,
        organization_id: OrganizationId,
        source_type: SourceType,
    ) -> Result<HashSet<SourceDocumentId>, StoreError> {
        let ids: Vec<Uuid> = ledger_entries::Entity::find()
            .select_only()
            .column(ledger_entries::Column::ReferenceId)
            .filter(ledger_entries::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(
                ledger_entries::Column::SourceType
                    .eq(sea_orm_active_enums::LedgerSourceType::from(source_type)),
            )
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(ids.into_iter().map(SourceDocumentId::from).collect())
    }

    /// Lists the settlement history of an entry, latest settlement first.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry does not exist in this organization.
    pub async fn list_settlements(
        &self,
        organization_id: OrganizationId,
        entry_id: LedgerEntryId,
    ) -> Result<Vec<SettlementRecord>, StoreError> {
        // Resolves tenancy before reading history
        self.find_by_id(organization_id, entry_id).await?;
        self.settlements_of(organization_id, entry_id).await
    }

    /// Checks that the entry's settled amount equals its settlement history.
    ///
    /// # Errors
    ///
    /// Returns `Inconsistent` when they disagree, or `EntryNotFound`.
    pub async fn verify_conservation(
        &self,
        organization_id: OrganizationId,
        entry_id: LedgerEntryId,
    ) -> Result<(), StoreError> {
        let detail = self.get_with_settlements(organization_id, entry_id).await?;
        LedgerService::verify_conservation(&detail.entry, &detail.settlements)?;
        Ok(())
    }

    async fn settlements_of(
        &self,
        organization_id: OrganizationId,
        entry_id: LedgerEntryId,
    ) -> Result<Vec<SettlementRecord>, StoreError> {
        let models = settlements::Entity::find()
            .filter(settlements::Column::LedgerEntryId.eq(entry_id.into_inner()))
            .filter(settlements::Column::OrganizationId.eq(organization_id.into_inner()))
            .order_by_desc(settlements::Column::SettledAt)
            .order_by_desc(settlements::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}

/// Base query for an organization's entries with the filter applied.
fn filtered(organization_id: OrganizationId, filter: &LedgerFilter) -> Select<ledger_entries::Entity> {
    let mut query = ledger_entries::Entity::find()
        .filter(ledger_entries::Column::OrganizationId.eq(organization_id.into_inner()));

    if let Some(direction) = filter.direction {
        query = query.filter(
            ledger_entries::Column::Direction.eq(sea_orm_active_enums::LedgerDirection::from(direction)),
        );
    }

    if let Some(status) = filter.status {
        query = query.filter(
            ledger_entries::Column::Status.eq(sea_orm_active_enums::SettlementStatus::from(status)),
        );
    }

    if let Some(source_type) = filter.source_type {
        query = query.filter(
            ledger_entries::Column::SourceType
                .eq(sea_orm_active_enums::LedgerSourceType::from(source_type)),
        );
    }

    if let Some(counterparty_id) = filter.counterparty_id {
        query = query.filter(ledger_entries::Column::CounterpartyId.eq(counterparty_id.into_inner()));
    }

    if let Some(date_from) = filter.date_from {
        query = query.filter(ledger_entries::Column::TransactionDate.gte(date_from));
    }

    if let Some(date_to) = filter.date_to {
        query = query.filter(ledger_entries::Column::TransactionDate.lte(date_to));
    }

    query
}

/// Inserts a freshly opened entry and returns it as stored.
pub(crate) async fn insert_entry<C: ConnectionTrait>(
    conn: &C,
    entry: &LedgerEntry,
) -> Result<LedgerEntry, DbErr> {
    let model = ledger_entries::ActiveModel {
        id: Set(entry.id.into_inner()),
        organization_id: Set(entry.organization_id.into_inner()),
        direction: Set(entry.direction.into()),
        source_type: Set(entry.source_type.into()),
        reference_id: Set(entry.reference_id.into_inner()),
        reference_number: Set(entry.reference_number.clone()),
        transaction_date: Set(entry.transaction_date),
        due_date: Set(entry.due_date),
        counterparty_id: Set(entry.counterparty_id.map(CounterpartyId::into_inner)),
        counterparty_name: Set(entry.counterparty_name.clone()),
        counterparty_category: Set(entry.counterparty_category.clone()),
        total_amount: Set(entry.total_amount),
        settled_amount: Set(entry.settled_amount),
        remaining_amount: Set(entry.remaining_amount),
        status: Set(entry.status.into()),
        note: Set(entry.note.clone()),
        contract_id: Set(entry.contract_id.map(ContractId::into_inner)),
        contract_number: Set(entry.contract_number.clone()),
        buyer_id: Set(entry.buyer_id.map(CounterpartyId::into_inner)),
        created_at: Set(entry.created_at.into()),
        updated_at: Set(entry.updated_at.into()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(model.into())
}
