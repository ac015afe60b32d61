//! Schema command

use crate::config::Settings;
use crate::storage::Database;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub async fn run(settings: &Settings, file: Option<PathBuf>) -> Result<()> {
    let path = file.unwrap_or_else(|| settings.schema_path.clone());

    let db = Database::connect(settings.pg_connect_options()).await?;
    db.apply_schema(&path).await?;

    println!(
        "{}",
        format!("✅ Applied schema from {}", path.display()).green()
    );
    Ok(())
}
