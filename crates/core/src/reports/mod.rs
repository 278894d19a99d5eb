//! Aggregation and aging reports.
//!
//! This module provides pure business logic over ledger entries and
//! inventory valuations:
//! - Summary by status and source type
//! - Outstanding balances per counterparty
//! - Aging buckets
//! - Balance sheet composition with identity self-check

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
