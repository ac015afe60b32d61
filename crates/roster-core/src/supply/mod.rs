//! Supply join reporter
//!
//! Loads the supplier, part and project reference tables, reads supply links
//! from an XML file and joins them in file order.

pub mod join;
pub mod parse;

pub use join::{join_supplies, JoinOutcome, ReportedSupply, SkipNotice, SkipReason, SupplyReport};
pub use parse::{parse_supplies, read_supply_file, InvalidSupply, SupplyEntry};

use crate::ports::ReferenceSource;
use crate::Result;
use roster_types::{Part, Project, Supplier};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Reference mappings keyed by composite code
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub suppliers: BTreeMap<String, Supplier>,
    pub parts: BTreeMap<String, Part>,
    pub projects: BTreeMap<String, Project>,
}

impl ReferenceData {
    pub fn from_records(
        suppliers: impl IntoIterator<Item = Supplier>,
        parts: impl IntoIterator<Item = Part>,
        projects: impl IntoIterator<Item = Project>,
    ) -> Self {
        Self {
            suppliers: suppliers.into_iter().map(|s| (s.code.clone(), s)).collect(),
            parts: parts.into_iter().map(|p| (p.code.clone(), p)).collect(),
            projects: projects.into_iter().map(|j| (j.code.clone(), j)).collect(),
        }
    }
}

/// Load references, parse the supply file and join them
pub async fn build_report(source: &dyn ReferenceSource, path: &Path) -> Result<SupplyReport> {
    let references = source.load_references().await?;
    info!(
        "Loaded references: {} suppliers, {} parts, {} projects",
        references.suppliers.len(),
        references.parts.len(),
        references.projects.len()
    );

    let entries = read_supply_file(path).await?;
    info!("Parsed {} supply records from {}", entries.len(), path.display());

    Ok(join_supplies(&references, &entries))
}
