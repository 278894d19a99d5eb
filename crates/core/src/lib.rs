//! Core business logic for the payables and receivables sub-ledger.
//!
//! This crate contains pure business logic with ZERO database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Entry model, settlement arithmetic and conservation checks
//! - `sync` - Source document valuation and idempotent sync planning
//! - `reports` - Summaries, counterparty grouping, aging and balance sheet

pub mod ledger;
pub mod reports;
pub mod sync;
