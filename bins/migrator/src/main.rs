//! Database migration runner for the sub-ledger schema.
//!
//! Usage:
//!   migrator up      - Apply the ledger and source document tables
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop everything and re-apply
//!
//! Reads `DATABASE_URL`, also from a `.env` file.

use sea_orm_migration::prelude::*;
use subledger_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // sea-orm-migration installs its own tracing subscriber
    cli::run_cli(Migrator).await;
}
