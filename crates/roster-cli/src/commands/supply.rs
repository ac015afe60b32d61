//! Supply report command

use crate::config::Settings;
use crate::storage::{Database, PgReferenceSource};
use anyhow::{Context, Result};
use colored::Colorize;
use roster_core::supply::{build_report, JoinOutcome};
use std::path::PathBuf;

pub async fn run(settings: &Settings, file: Option<PathBuf>) -> Result<()> {
    let path = file.unwrap_or_else(|| settings.supply_file.clone());

    let db = Database::connect(settings.pg_connect_options()).await?;
    let source = PgReferenceSource::new(db);

    let report = build_report(&source, &path)
        .await
        .with_context(|| format!("Failed to build supply report from {}", path.display()))?;

    for outcome in &report.outcomes {
        match outcome {
            JoinOutcome::Reported(supply) => println!("{}", supply),
            JoinOutcome::Skipped(notice) => println!("{}", notice.to_string().yellow()),
        }
    }

    println!();
    println!("{}", report.summary().dimmed());
    Ok(())
}
