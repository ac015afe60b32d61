//! Supply reference types

use serde::{Deserialize, Serialize};

/// Kinds of reference entity a supply link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Supplier,
    Part,
    Project,
}

impl EntityKind {
    /// Letter prefix of the composite code
    pub fn prefix(&self) -> char {
        match self {
            EntityKind::Supplier => 'S',
            EntityKind::Part => 'P',
            EntityKind::Project => 'J',
        }
    }

    /// Composite code for a numeric id, e.g. `S1`
    pub fn code(&self, id: i32) -> String {
        format!("{}{}", self.prefix(), id)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Supplier => write!(f, "supplier"),
            EntityKind::Part => write!(f, "part"),
            EntityKind::Project => write!(f, "project"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub code: String,
    pub name: String,
    pub status: Option<i32>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub code: String,
    pub name: String,
    pub color: Option<String>,
    pub weight: Option<f64>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub code: String,
    pub name: String,
    pub city: Option<String>,
}

/// Supply relationship between a supplier, a part and a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyLink {
    pub supplier_code: String,
    pub part_code: String,
    pub project_code: String,
    pub quantity: i64,
}
