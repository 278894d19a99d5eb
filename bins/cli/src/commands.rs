//! Command dispatch.

use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{Value, json};
use subledger_core::ledger::{LedgerFilter, ManualEntryInput, SettleRequest};
use subledger_db::{LedgerRepository, ReconciliationRepository, ReportRepository, SettlementRepository};
use subledger_shared::config::LedgerConfig;
use subledger_shared::types::{OrganizationId, PageRequest};
use subledger_shared::AppError;

use crate::args::Command;

/// Repositories the commands run against.
pub struct Services {
    ledger: LedgerRepository,
    settlements: SettlementRepository,
    reconciliation: ReconciliationRepository,
    reports: ReportRepository,
}

impl Services {
    /// Builds the repositories over one connection pool.
    #[must_use]
    pub fn new(db: &DatabaseConnection, config: &LedgerConfig) -> Self {
        Self {
            ledger: LedgerRepository::new(db.clone()),
            settlements: SettlementRepository::new(db.clone())
                .with_retry_attempts(config.settle_retry_attempts),
            reconciliation: ReconciliationRepository::new(db.clone())
                .with_valuation_scale(config.valuation_scale),
            reports: ReportRepository::new(db.clone())
                .with_valuation_scale(config.valuation_scale),
        }
    }
}

/// Runs one command and returns its JSON result.
///
/// # Errors
///
/// Returns the command's failure mapped to an [`AppError`].
#[allow(clippy::too_many_lines)]
pub async fn run(
    services: &Services,
    organization_id: OrganizationId,
    command: Command,
) -> Result<Value, AppError> {
    match command {
        Command::List {
            direction,
            status,
            source_type,
            counterparty,
            from,
            to,
            page,
            per_page,
        } => {
            let filter = LedgerFilter {
                direction,
                status,
                source_type,
                counterparty_id: counterparty,
                date_from: from,
                date_to: to,
            };
            match page {
                Some(page) => {
                    let page = services
                        .ledger
                        .find_page(organization_id, &filter, PageRequest::new(page, per_page))
                        .await?;
                    to_json(&page)
                }
                None => to_json(&services.ledger.find_all(organization_id, &filter).await?),
            }
        }

        Command::Show { id } => to_json(
            &services
                .ledger
                .get_with_settlements(organization_id, id)
                .await?,
        ),

        Command::Add {
            direction,
            reference,
            date,
            due,
            counterparty_name,
            counterparty,
            total,
            note,
        } => {
            let input = ManualEntryInput {
                direction,
                reference_id: None,
                reference_number: reference,
                transaction_date: date,
                due_date: due,
                counterparty_id: counterparty,
                counterparty_name,
                counterparty_category: None,
                total_amount: total,
                note,
            };
            to_json(&services.ledger.create_manual(organization_id, input).await?)
        }

        Command::Settle {
            id,
            amount,
            recorded_by,
            method,
            external_reference,
            note,
            settled_at,
        } => {
            let request = SettleRequest {
                method,
                external_reference,
                note,
                settled_at,
                ..SettleRequest::new(amount, recorded_by)
            };
            to_json(&services.settlements.settle(organization_id, id, request).await?)
        }

        Command::SettleFull { id, recorded_by } => to_json(
            &services
                .settlements
                .settle_in_full(organization_id, id, recorded_by)
                .await?,
        ),

        Command::Verify { id } => {
            services.ledger.verify_conservation(organization_id, id).await?;
            Ok(json!({ "entry_id": id, "consistent": true }))
        }

        Command::Sync { source: Some(source) } => to_json(
            &services
                .reconciliation
                .sync_from_source(organization_id, source)
                .await?,
        ),

        Command::Sync { source: None } => {
            to_json(&services.reconciliation.sync_all(organization_id).await?)
        }

        Command::Summary { direction, as_of } => to_json(
            &services
                .reports
                .summary(organization_id, direction, or_today(as_of))
                .await?,
        ),

        Command::Counterparties { direction } => to_json(
            &services
                .reports
                .counterparties(organization_id, direction)
                .await?,
        ),

        Command::Aging { direction, as_of } => to_json(
            &services
                .reports
                .aging(organization_id, direction, or_today(as_of))
                .await?,
        ),

        Command::BalanceSheet { as_of } => to_json(
            &services
                .reports
                .balance_sheet(organization_id, or_today(as_of))
                .await?,
        ),
    }
}

/// Renders an error as the JSON document printed on failure.
#[must_use]
pub fn error_json(err: &AppError) -> Value {
    json!({
        "error": {
            "code": err.error_code(),
            "message": err.to_string(),
        }
    })
}

fn or_today(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Utc::now().date_naive())
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()))
}
