//! In-memory join of supply links against the reference mappings

use super::parse::SupplyEntry;
use super::ReferenceData;
use roster_types::{EntityKind, Part, Project, Supplier, SupplyLink};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportedSupply {
    pub supplier: Supplier,
    pub part: Part,
    pub project: Project,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A referenced code is not in its mapping
    Missing { kind: EntityKind, code: String },
    /// The record itself could not be read
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipNotice {
    /// 1-based position of the record in the file
    pub position: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    Reported(ReportedSupply),
    Skipped(SkipNotice),
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

impl fmt::Display for ReportedSupply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Supplier {} ({}) supplies {} of part {} ({}) to project {} ({})",
            self.supplier.name,
            or_dash(&self.supplier.city),
            self.quantity,
            self.part.name,
            or_dash(&self.part.color),
            self.project.name,
            or_dash(&self.project.city),
        )
    }
}

impl fmt::Display for SkipNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            SkipReason::Missing { kind, code } => write!(
                f,
                "Skipping supply #{}: {} {} not found",
                self.position, kind, code
            ),
            SkipReason::Invalid(reason) => {
                write!(f, "Skipping supply #{}: {}", self.position, reason)
            }
        }
    }
}

impl fmt::Display for JoinOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinOutcome::Reported(supply) => supply.fmt(f),
            JoinOutcome::Skipped(notice) => notice.fmt(f),
        }
    }
}

/// Result of joining a whole supply file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplyReport {
    pub outcomes: Vec<JoinOutcome>,
}

impl SupplyReport {
    pub fn reported_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, JoinOutcome::Reported(_)))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.reported_count()
    }

    /// Report lines in file order, without the summary
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.outcomes.iter().map(|o| o.to_string())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} supplies reported, {} skipped",
            self.reported_count(),
            self.skipped_count()
        )
    }
}

/// Join entries against the reference mappings, in file order
pub fn join_supplies(references: &ReferenceData, entries: &[SupplyEntry]) -> SupplyReport {
    let outcomes = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| join_one(references, index + 1, entry))
        .collect();

    SupplyReport { outcomes }
}

fn join_one(references: &ReferenceData, position: usize, entry: &SupplyEntry) -> JoinOutcome {
    let link = match entry {
        Ok(link) => link,
        Err(invalid) => {
            debug!("Supply #{} unreadable: {}", position, invalid);
            return JoinOutcome::Skipped(SkipNotice {
                position,
                reason: SkipReason::Invalid(invalid.reason.clone()),
            });
        }
    };

    match resolve(references, link) {
        Ok(supply) => JoinOutcome::Reported(supply),
        Err(reason) => {
            debug!("Supply #{} skipped: {:?}", position, reason);
            JoinOutcome::Skipped(SkipNotice { position, reason })
        }
    }
}

/// Resolve supplier, part and project in that order; the first miss wins
fn resolve(references: &ReferenceData, link: &SupplyLink) -> Result<ReportedSupply, SkipReason> {
    let supplier = lookup(&references.suppliers, EntityKind::Supplier, &link.supplier_code)?;
    let part = lookup(&references.parts, EntityKind::Part, &link.part_code)?;
    let project = lookup(&references.projects, EntityKind::Project, &link.project_code)?;

    Ok(ReportedSupply {
        supplier: supplier.clone(),
        part: part.clone(),
        project: project.clone(),
        quantity: link.quantity,
    })
}

fn lookup<'a, T>(
    mapping: &'a BTreeMap<String, T>,
    kind: EntityKind,
    code: &str,
) -> Result<&'a T, SkipReason> {
    mapping.get(code).ok_or_else(|| SkipReason::Missing {
        kind,
        code: code.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supply::InvalidSupply;

    fn references() -> ReferenceData {
        ReferenceData::from_records(
            vec![
                Supplier {
                    code: "S1".to_string(),
                    name: "Smith".to_string(),
                    status: Some(20),
                    city: Some("London".to_string()),
                },
                Supplier {
                    code: "S2".to_string(),
                    name: "Jones".to_string(),
                    status: None,
                    city: None,
                },
            ],
            vec![Part {
                code: "P1".to_string(),
                name: "Nut".to_string(),
                color: Some("Red".to_string()),
                weight: Some(12.0),
                city: Some("London".to_string()),
            }],
            vec![Project {
                code: "J1".to_string(),
                name: "Sorter".to_string(),
                city: Some("Paris".to_string()),
            }],
        )
    }

    fn link(supplier: &str, part: &str, project: &str, quantity: i64) -> SupplyEntry {
        Ok(SupplyLink {
            supplier_code: supplier.to_string(),
            part_code: part.to_string(),
            project_code: project.to_string(),
            quantity,
        })
    }

    #[test]
    fn test_resolvable_link_reports_one_line() {
        let report = join_supplies(&references(), &[link("S1", "P1", "J1", 200)]);
        assert_eq!(report.outcomes.len(), 1);

        let line = report.outcomes[0].to_string();
        assert!(matches!(report.outcomes[0], JoinOutcome::Reported(_)));
        assert!(line.contains("Smith"));
        assert!(line.contains("Nut"));
        assert!(line.contains("Sorter"));
        assert!(line.contains("200"));
        assert_eq!(
            line,
            "Supplier Smith (London) supplies 200 of part Nut (Red) to project Sorter (Paris)"
        );
    }

    #[test]
    fn test_missing_reference_skips_once() {
        let cases = [
            (link("S9", "P1", "J1", 1), EntityKind::Supplier, "S9"),
            (link("S1", "P9", "J1", 1), EntityKind::Part, "P9"),
            (link("S1", "P1", "J9", 1), EntityKind::Project, "J9"),
        ];

        for (entry, kind, code) in cases {
            let report = join_supplies(&references(), &[entry]);
            assert_eq!(report.reported_count(), 0);
            assert_eq!(report.skipped_count(), 1);
            assert_eq!(
                report.outcomes[0],
                JoinOutcome::Skipped(SkipNotice {
                    position: 1,
                    reason: SkipReason::Missing {
                        kind,
                        code: code.to_string()
                    },
                })
            );
        }
    }

    #[test]
    fn test_first_missing_reference_is_named() {
        let report = join_supplies(&references(), &[link("S9", "P9", "J9", 1)]);
        assert_eq!(
            report.outcomes[0].to_string(),
            "Skipping supply #1: supplier S9 not found"
        );
    }

    #[test]
    fn test_file_order_without_dedup() {
        let entries = vec![
            link("S1", "P1", "J1", 5),
            Err(InvalidSupply {
                reason: "missing part code".to_string(),
            }),
            link("S1", "P1", "J1", 5),
            link("S2", "P1", "J1", 0),
        ];

        let report = join_supplies(&references(), &entries);
        let lines: Vec<String> = report.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], lines[2]);
        assert_eq!(lines[1], "Skipping supply #2: missing part code");
        assert_eq!(
            lines[3],
            "Supplier Jones (-) supplies 0 of part Nut (Red) to project Sorter (Paris)"
        );
        assert_eq!(report.summary(), "3 supplies reported, 1 skipped");
    }
}
