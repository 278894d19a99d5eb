//! Report repository: loads ledger and stock state and hands it to
//! [`ReportService`].

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use subledger_core::ledger::{LedgerDirection, LedgerFilter};
use subledger_core::reports::{
    AgingReport, BalanceSheetInput, BalanceSheetReport, CounterpartyGroup, LedgerSummary,
    ReportService,
};
use subledger_shared::types::OrganizationId;
use tracing::{error, instrument};

use super::inventory::InventoryRepository;
use super::ledger::LedgerRepository;
use super::reconciliation::DEFAULT_VALUATION_SCALE;
use crate::error::StoreError;

/// Repository for ledger reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    ledger: LedgerRepository,
    inventory: InventoryRepository,
    valuation_scale: u32,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            ledger: LedgerRepository::new(db.clone()),
            inventory: InventoryRepository::new(db),
            valuation_scale: DEFAULT_VALUATION_SCALE,
        }
    }

    /// Sets the decimal places kept when valuing stock.
    #[must_use]
    pub const fn with_valuation_scale(mut self, scale: u32) -> Self {
        self.valuation_scale = scale;
        self
    }

    /// Totals, status counts and per-source breakdown for one direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn summary(
        &self,
        organization_id: OrganizationId,
        direction: LedgerDirection,
        as_of: NaiveDate,
    ) -> Result<LedgerSummary, StoreError> {
        let entries = self
            .ledger
            .find_all(organization_id, &LedgerFilter::for_direction(direction))
            .await?;
        Ok(ReportService::summary(direction, &entries, as_of))
    }

    /// Outstanding balances grouped by counterparty.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn counterparties(
        &self,
        organization_id: OrganizationId,
        direction: LedgerDirection,
    ) -> Result<Vec<CounterpartyGroup>, StoreError> {
        let open = self.ledger.find_open(organization_id, Some(direction)).await?;
        Ok(ReportService::group_by_counterparty(direction, &open))
    }

    /// Aging of outstanding balances as of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn aging(
        &self,
        organization_id: OrganizationId,
        direction: LedgerDirection,
        as_of: NaiveDate,
    ) -> Result<AgingReport, StoreError> {
        let open = self.ledger.find_open(organization_id, Some(direction)).await?;
        Ok(ReportService::aging(direction, &open, as_of))
    }

    /// Balance sheet snapshot: stock and receivables against payables.
    ///
    /// # Errors
    ///
    /// Returns `Unbalanced` if the composed report fails its identity check,
    /// or a database error.
    #[instrument(skip_all, fields(organization_id = %organization_id, as_of = %as_of))]
    pub async fn balance_sheet(
        &self,
        organization_id: OrganizationId,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, StoreError> {
        let (open, inventory, tanks) = tokio::try_join!(
            self.ledger.find_open(organization_id, None),
            self.inventory.materials(organization_id),
            self.inventory.tanks(organization_id),
        )?;

        let input = BalanceSheetInput {
            inventory,
            tanks,
            receivables_remaining: ReportService::outstanding(LedgerDirection::Receivable, &open),
            payables_remaining: ReportService::outstanding(LedgerDirection::Payable, &open),
        };
        let report = ReportService::balance_sheet(input, as_of, self.valuation_scale);

        if let Err(err) = ReportService::verify_balance_sheet(&report) {
            error!(error = %err, "balance sheet identity check failed");
            return Err(err.into());
        }

        Ok(report)
    }
}
