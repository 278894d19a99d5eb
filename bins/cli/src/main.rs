//! Sub-ledger operator CLI.
//!
//! Every command prints one JSON document on stdout. Logs go to stderr.
//! Failures print `{"error": {...}}` and exit with a code per error kind.

mod args;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use subledger_db::connect_with;
use subledger_shared::config::LogConfig;
use subledger_shared::{AppConfig, AppError};

use crate::args::CliArgs;
use crate::commands::{Services, error_json};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = AppConfig::load()?;
    init_tracing(&config.log);

    let db = connect_with(&config.database).await?;
    info!(max_connections = config.database.max_connections, "Connected to database");

    let services = Services::new(&db, &config.ledger);
    match commands::run(&services, args.organization_id, args.command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(code = err.error_code(), error = %err, "Command failed");
            println!("{}", serde_json::to_string_pretty(&error_json(&err))?);
            Ok(exit_code(&err))
        }
    }
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if log.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn exit_code(err: &AppError) -> ExitCode {
    u8::try_from(err.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
}
