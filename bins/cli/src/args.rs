//! Command-line arguments.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use subledger_core::ledger::{LedgerDirection, SettlementMethod, SettlementStatus, SourceType};
use subledger_core::sync::SyncSource;
use subledger_shared::types::{CounterpartyId, LedgerEntryId, OrganizationId, UserId};

/// Payables and receivables sub-ledger
#[derive(Parser, Debug)]
#[command(name = "subledger")]
#[command(about = "Payables and receivables sub-ledger", long_about = None)]
pub struct CliArgs {
    /// Organization the command operates on
    #[arg(long = "org", value_name = "UUID")]
    pub organization_id: OrganizationId,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Operations exposed to operators. Every command prints JSON on stdout.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List ledger entries, newest first
    List {
        /// payable or receivable
        #[arg(long)]
        direction: Option<LedgerDirection>,
        /// unpaid, partial or paid
        #[arg(long)]
        status: Option<SettlementStatus>,
        /// Originating document kind, e.g. goods_receipt
        #[arg(long = "source")]
        source_type: Option<SourceType>,
        /// Counterparty id
        #[arg(long)]
        counterparty: Option<CounterpartyId>,
        /// Earliest transaction date (inclusive)
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: Option<NaiveDate>,
        /// Latest transaction date (inclusive)
        #[arg(long, value_name = "YYYY-MM-DD")]
        to: Option<NaiveDate>,
        /// Page number; lists everything when omitted
        #[arg(long)]
        page: Option<u32>,
        /// Entries per page
        #[arg(long, default_value_t = 20)]
        per_page: u32,
    },

    /// Show one entry with its settlement history
    Show {
        /// Entry id
        id: LedgerEntryId,
    },

    /// Record a manual entry
    Add {
        /// payable or receivable
        #[arg(long)]
        direction: LedgerDirection,
        /// Document number
        #[arg(long)]
        reference: String,
        /// Transaction date
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: NaiveDate,
        /// Payment due date
        #[arg(long, value_name = "YYYY-MM-DD")]
        due: Option<NaiveDate>,
        /// Counterparty display name
        #[arg(long)]
        counterparty_name: String,
        /// Counterparty id
        #[arg(long)]
        counterparty: Option<CounterpartyId>,
        /// Total amount
        #[arg(long)]
        total: Decimal,
        /// Free-text note
        #[arg(long)]
        note: Option<String>,
    },

    /// Settle part of an entry's remaining balance
    Settle {
        /// Entry id
        id: LedgerEntryId,
        /// Amount to settle
        #[arg(long)]
        amount: Decimal,
        /// Acting user
        #[arg(long = "user", value_name = "UUID")]
        recorded_by: UserId,
        /// cash, bank_transfer, cheque or giro
        #[arg(long)]
        method: Option<SettlementMethod>,
        /// External reference, e.g. a bank transfer number
        #[arg(long)]
        external_reference: Option<String>,
        /// Free-text note
        #[arg(long)]
        note: Option<String>,
        /// Settlement time (RFC 3339); defaults to now
        #[arg(long)]
        settled_at: Option<DateTime<Utc>>,
    },

    /// Settle the whole remaining balance of an entry
    SettleFull {
        /// Entry id
        id: LedgerEntryId,
        /// Acting user
        #[arg(long = "user", value_name = "UUID")]
        recorded_by: UserId,
    },

    /// Check an entry's settled amount against its history
    Verify {
        /// Entry id
        id: LedgerEntryId,
    },

    /// Create entries for finalized source documents
    Sync {
        /// One source; all sources when omitted
        #[arg(long)]
        source: Option<SyncSource>,
    },

    /// Totals and status counts for one direction
    Summary {
        /// payable or receivable
        direction: LedgerDirection,
        /// Date used for overdue checks; defaults to today (UTC)
        #[arg(long, value_name = "YYYY-MM-DD")]
        as_of: Option<NaiveDate>,
    },

    /// Outstanding balances per counterparty
    Counterparties {
        /// payable or receivable
        direction: LedgerDirection,
    },

    /// Aging of outstanding balances
    Aging {
        /// payable or receivable
        direction: LedgerDirection,
        /// Reference date; defaults to today (UTC)
        #[arg(long, value_name = "YYYY-MM-DD")]
        as_of: Option<NaiveDate>,
    },

    /// Balance sheet snapshot
    BalanceSheet {
        /// Snapshot date; defaults to today (UTC)
        #[arg(long, value_name = "YYYY-MM-DD")]
        as_of: Option<NaiveDate>,
    },
}
