//! Fieldlog CLI - Offline-first capture and sync for field inspection reports
//!
//! Reports recorded here are durable immediately and pushed to the remote
//! records service whenever connectivity allows.

mod cli;
mod commands;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::common::resolve_db_path;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fieldlog_core=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);

    match cli.command {
        Commands::Add {
            location,
            technician,
            findings,
        } => commands::add::run_add(&location, &technician, &findings, &db_path)?,
        Commands::List {
            limit,
            status,
            json,
        } => commands::list::run_list(limit, status, json, &db_path)?,
        Commands::Status => commands::status::run_status(&db_path)?,
        Commands::Sync => commands::sync::run_sync(&db_path).await?,
        Commands::Watch => commands::watch::run_watch(&db_path).await?,
    }

    Ok(())
}
