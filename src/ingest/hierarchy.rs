//! Static skill-hierarchy ingestion.
//!
//! The definition maps a parent skill name to its children, either as bare
//! strings or as `{child, weight}` objects. Loading is wholesale and
//! idempotent: skills are created on first encounter and existing edges
//! are left untouched.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, SkillmapError};
use crate::storage::{Database, Provenance};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChildSpec {
    Named(String),
    Weighted { child: String, weight: f64 },
}

impl ChildSpec {
    fn name(&self) -> &str {
        match self {
            ChildSpec::Named(name) => name,
            ChildSpec::Weighted { child, .. } => child,
        }
    }

    fn weight(&self) -> f64 {
        match self {
            ChildSpec::Named(_) => 1.0,
            ChildSpec::Weighted { weight, .. } => *weight,
        }
    }
}

pub type HierarchyDef = BTreeMap<String, Vec<ChildSpec>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct HierarchyStats {
    pub skills_created: usize,
    pub edges_added: usize,
    pub edges_skipped: usize,
}

pub fn load_hierarchy(path: &Path) -> Result<HierarchyDef> {
    let raw = std::fs::read_to_string(path)?;
    let def: HierarchyDef = serde_json::from_str(&raw)
        .map_err(|err| SkillmapError::InvalidHierarchy(err.to_string()))?;

    for (parent, children) in &def {
        for child in children {
            let weight = child.weight();
            if !(0.0..=1.0).contains(&weight) {
                return Err(SkillmapError::InvalidHierarchy(format!(
                    "weight {weight} out of range for {parent} -> {}",
                    child.name()
                )));
            }
        }
    }
    Ok(def)
}

/// Upsert every relationship in the definition, creating missing skills as
/// hierarchy-defined placeholders.
pub fn ingest_hierarchy(db: &Database, def: &HierarchyDef) -> Result<HierarchyStats> {
    let skills_before = db.table_count("skills")?;
    let mut stats = HierarchyStats::default();

    for (parent_name, children) in def {
        let parent_id = db.upsert_skill(parent_name, Provenance::HierarchyDefined)?;

        for child in children {
            let child_id = db.upsert_skill(child.name(), Provenance::HierarchyDefined)?;
            let metadata = serde_json::json!({
                "relationship_type": "hierarchy",
                "parent_skill": parent_name,
                "child_skill": child.name(),
            });

            if db.upsert_edge(parent_id, child_id, child.weight(), &metadata.to_string())? {
                stats.edges_added += 1;
            } else {
                debug!(parent = %parent_name, child = %child.name(), "edge already present");
                stats.edges_skipped += 1;
            }
        }
    }

    stats.skills_created = (db.table_count("skills")? - skills_before).max(0) as usize;
    info!(?stats, "hierarchy ingested");
    Ok(stats)
}
