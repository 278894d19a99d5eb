//! Payable and receivable ledger logic.
//!
//! This module implements the entry model and the balance mutation rules:
//! - Entry, settlement and filter types
//! - Balance arithmetic with derived status
//! - Settlement planning and conservation checks
//! - Manual entry validation
//! - Error types for ledger operations

pub mod balance;
pub mod entry;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use balance::{EntryBalance, check_precision};
pub use entry::{CounterpartyKey, LedgerEntry, LedgerEntryWithSettlements, SettlementRecord};
pub use error::LedgerError;
pub use service::{LedgerService, SettlementPlan};
pub use types::{
    LedgerDirection, LedgerFilter, ManualEntryInput, NewLedgerEntry, SettleRequest,
    SettlementMethod, SettlementStatus, SourceType, UnknownVariant,
};
pub use validation::{
    MAX_AMOUNT, MAX_CODE_LEN, MAX_NAME_LEN, validate_draft, validate_filter, validate_manual_entry,
};
