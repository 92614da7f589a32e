//! # catalog: Command-Line Catalog Search
//!
//! Runs one request against the catalog database and prints the JSON
//! response on stdout. Logs go to stderr.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments (clap)                                             │
//! │  2. Load AppConfig (file + env + defaults)                             │
//! │  3. Initialize tracing (EnvFilter)                                     │
//! │  4. Open database (pool + migrations)                                  │
//! │  5. Run the command through SearchService                              │
//! │  6. Print response, or { "error", "code" } and exit 1                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;
use crate::config::AppConfig;
use catalog_db::{Database, SearchService};

#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(about = "Search and inspect the product catalog")]
struct Cli {
    /// Configuration file (TOML). Defaults to ./catalog.toml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database file, overriding the configured path.
    #[arg(short, long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut app_config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(db) = cli.db {
        app_config.database.database_path = db;
    }

    init_logging(&app_config.log.filter);
    info!(
        path = %app_config.database.database_path.display(),
        "Configuration loaded"
    );

    let db = Database::new(app_config.database.clone())
        .await
        .context("opening catalog database")?;
    let service = SearchService::new(&db, &app_config.search);

    let outcome = cli.command.run(&service).await;
    db.close().await;

    match outcome {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let body = serde_json::json!({ "error": err.to_string(), "code": err.code() });
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
