//! Ledger service for entry creation and settlement planning.
//!
//! Pure business logic: given the current state of an entry, decide what the
//! next state and the settlement record must be. The storage layer applies
//! the result inside one transaction while holding the entry's row lock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use subledger_shared::types::{LedgerEntryId, OrganizationId, SettlementId, UserId};

use super::balance::EntryBalance;
use super::entry::{LedgerEntry, SettlementRecord};
use super::error::LedgerError;
use super::types::{NewLedgerEntry, SettleRequest, SettlementMethod};

/// Outcome of a validated settlement: the entry's next balance and the record
/// to append.
#[derive(Debug, Clone)]
pub struct SettlementPlan {
    /// Balance the entry must hold after the settlement.
    pub balance: EntryBalance,
    /// History record to insert.
    pub record: SettlementRecord,
}

/// Ledger service for entry and settlement rules.
///
/// This service contains pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Builds a new unpaid entry from a validated draft.
    #[must_use]
    pub fn open_entry(
        organization_id: OrganizationId,
        draft: NewLedgerEntry,
        now: DateTime<Utc>,
    ) -> LedgerEntry {
        let balance = EntryBalance::opening(draft.total_amount);
        LedgerEntry {
            id: LedgerEntryId::new(),
            organization_id,
            direction: draft.direction,
            source_type: draft.source_type,
            reference_id: draft.reference_id,
            reference_number: draft.reference_number,
            transaction_date: draft.transaction_date,
            due_date: draft.due_date,
            counterparty_id: draft.counterparty_id,
            counterparty_name: draft.counterparty_name,
            counterparty_category: draft.counterparty_category,
            total_amount: balance.total,
            settled_amount: balance.settled,
            remaining_amount: balance.remaining,
            status: balance.status,
            note: draft.note,
            contract_id: draft.contract_id,
            contract_number: draft.contract_number,
            buyer_id: draft.buyer_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates a settlement against the entry's current state.
    ///
    /// Validation order:
    /// 1. Stored balance satisfies its invariants
    /// 2. Entry is not already paid
    /// 3. Amount is positive
    /// 4. Amount does not exceed the remaining balance
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if any check fails; nothing should be persisted.
    pub fn plan_settlement(
        entry: &LedgerEntry,
        request: &SettleRequest,
        now: DateTime<Utc>,
    ) -> Result<SettlementPlan, LedgerError> {
        let balance = entry.balance().settle(request.amount)?;

        Ok(SettlementPlan {
            balance,
            record: SettlementRecord {
                id: SettlementId::new(),
                ledger_entry_id: entry.id,
                amount: request.amount,
                settled_at: request.settled_at.unwrap_or(now),
                method: request.method,
                external_reference: request.external_reference.clone(),
                note: request.note.clone(),
                recorded_by: request.recorded_by,
                created_at: now,
            },
        })
    }

    /// Plans a settlement of the whole remaining balance, recorded with the
    /// `PaidInFull` marker.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySettled` if the entry is paid.
    pub fn plan_full_settlement(
        entry: &LedgerEntry,
        recorded_by: UserId,
        now: DateTime<Utc>,
    ) -> Result<SettlementPlan, LedgerError> {
        let amount = entry.balance().full_settlement_amount()?;
        let request = SettleRequest::new(amount, recorded_by).with_method(SettlementMethod::PaidInFull);
        Self::plan_settlement(entry, &request, now)
    }

    /// Checks that the entry's settled amount equals the sum of its history.
    ///
    /// # Errors
    ///
    /// Returns `Inconsistent` when the two disagree or the history contains a
    /// record belonging to another entry.
    pub fn verify_conservation(
        entry: &LedgerEntry,
        settlements: &[SettlementRecord],
    ) -> Result<(), LedgerError> {
        if let Some(foreign) = settlements.iter().find(|s| s.ledger_entry_id != entry.id) {
            return Err(LedgerError::Inconsistent(format!(
                "settlement {} belongs to entry {}",
                foreign.id, foreign.ledger_entry_id
            )));
        }

        let history: Decimal = settlements.iter().map(|s| s.amount).sum();
        if history != entry.settled_amount {
            return Err(LedgerError::Inconsistent(format!(
                "settled amount {} differs from settlement history {}",
                entry.settled_amount, history
            )));
        }

        entry.balance().check()
    }
}
