//! Supply XML parsing
//!
//! A document that is not well-formed is an error; a malformed `<supply>`
//! element is not. The document is walked with a pull reader and every
//! `<supply>` child of the root is deserialized on its own, so each one yields
//! either a link or an [`InvalidSupply`] explaining why it could not be read.
//! Other elements between records are ignored.

use crate::{Result, RosterError};
use quick_xml::events::Event;
use quick_xml::Reader;
use roster_types::{EntityKind, SupplyLink};
use serde::Deserialize;
use std::path::Path;

const SUPPLY_TAG: &[u8] = b"supply";

/// One `<supply>` element in file order
pub type SupplyEntry = std::result::Result<SupplyLink, InvalidSupply>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSupply {
    pub reason: String,
}

impl std::fmt::Display for InvalidSupply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSupply {
    supplier: Option<String>,
    part: Option<String>,
    project: Option<String>,
    quantity: Option<String>,
}

impl RawSupply {
    fn into_entry(self) -> SupplyEntry {
        let supplier_code = required_code(EntityKind::Supplier, self.supplier)?;
        let part_code = required_code(EntityKind::Part, self.part)?;
        let project_code = required_code(EntityKind::Project, self.project)?;

        let quantity = match self.quantity.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw.parse::<i64>().map_err(|_| InvalidSupply {
                reason: format!("quantity '{}' is not a number", raw),
            })?,
        };

        Ok(SupplyLink {
            supplier_code,
            part_code,
            project_code,
            quantity,
        })
    }
}

fn required_code(
    kind: EntityKind,
    value: Option<String>,
) -> std::result::Result<String, InvalidSupply> {
    match value.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => Ok(code.to_string()),
        _ => Err(InvalidSupply {
            reason: format!("missing {} code", kind),
        }),
    }
}

/// Parse a supply document into entries, preserving element order
pub fn parse_supplies(xml: &str) -> Result<Vec<SupplyEntry>> {
    let mut reader = Reader::from_str(xml);
    let mut entries = Vec::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                depth += 1;
                if depth == 2 && start.name().as_ref() == SUPPLY_TAG {
                    let span = reader.read_to_end(start.name())?;
                    let inner = &xml[span.start as usize..span.end as usize];
                    entries.push(parse_element(&format!("<supply>{}</supply>", inner)));
                    depth -= 1;
                }
            }
            Event::Empty(empty) if depth == 1 && empty.name().as_ref() == SUPPLY_TAG => {
                entries.push(parse_element("<supply/>"));
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(RosterError::Xml(
            "unexpected end of document: unclosed element".to_string(),
        ));
    }

    Ok(entries)
}

fn parse_element(element: &str) -> SupplyEntry {
    let raw: RawSupply = quick_xml::de::from_str(element).map_err(|e| InvalidSupply {
        reason: format!("unreadable record: {}", e),
    })?;
    raw.into_entry()
}

pub async fn read_supply_file(path: &Path) -> Result<Vec<SupplyEntry>> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_supplies(&content).map_err(|e| match e {
        RosterError::Xml(msg) => RosterError::Xml(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}
