//! Roster CLI
//!
//! Student records over PostgreSQL with a Redis read/write-through cache, and
//! a supply report that joins an XML file against reference tables.

mod commands;
mod config;
mod storage;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{error, info};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version, about = "Roster - student records and supply reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive create/read/update/delete/list menu for students
    Students,

    /// Join the supply file against suppliers, parts and projects
    #[command(name = "supply-report")]
    SupplyReport {
        /// Supply XML file (defaults to SUPPLY_FILE)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Apply a schema file to the database
    Schema {
        /// SQL file (defaults to SCHEMA_PATH)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "roster_cli=debug,roster_core=debug"
        } else {
            "roster_cli=info"
        })
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    info!("Starting Roster CLI v{}", env!("CARGO_PKG_VERSION"));

    let result = run(cli.command).await;

    if let Err(ref e) = result {
        error!("Command failed: {:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}

async fn run(command: Commands) -> Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;

    match command {
        Commands::Students => commands::students::run(&settings).await,
        Commands::SupplyReport { file } => commands::supply::run(&settings, file).await,
        Commands::Schema { file } => commands::schema::run(&settings, file).await,
    }
}
