//! Hierarchical frequency aggregation.
//!
//! Propagates leaf mention counts upward through the skill graph. Every
//! ancestor accumulates the *set* of distinct leaves that reach it, so a
//! leaf reachable over two paths (diamond) counts once, and job counts are
//! unions of posting ids rather than sums. Cycles degrade to "stop
//! propagating" inside the traversal; they never abort a run.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::counter::{count_mentions, LeafFrequency};
use crate::error::Result;
use crate::graph::{ancestors_of, SkillGraph};
use crate::storage::{AggregateRecord, Database, LeafRecord};

/// One computed aggregate row, before persistence stamps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRow {
    /// The leaf's own mention count; 0 for pure ancestors.
    pub direct_frequency: i64,
    /// Sum of direct counts over the distinct contributing leaves.
    pub total_frequency: i64,
    /// Distinct postings across all contributing leaves.
    pub job_count: i64,
}

pub struct HierarchicalAggregator<'a> {
    graph: &'a SkillGraph,
}

impl<'a> HierarchicalAggregator<'a> {
    pub fn new(graph: &'a SkillGraph) -> Self {
        Self { graph }
    }

    /// Compute aggregate rows for every skill reachable from a leaf,
    /// leaves included. The result is a pure function of the inputs and
    /// independent of edge or leaf iteration order.
    pub fn aggregate(&self, leaves: &BTreeMap<i64, LeafFrequency>) -> BTreeMap<i64, AggregateRow> {
        let mut contributors: HashMap<i64, HashSet<i64>> = HashMap::new();

        for &leaf in leaves.keys() {
            // A leaf is its own zero-distance ancestor.
            contributors.entry(leaf).or_default().insert(leaf);
            for ancestor in ancestors_of(self.graph, leaf) {
                contributors.entry(ancestor).or_default().insert(leaf);
            }
        }

        let mut rows = BTreeMap::new();
        for (skill_id, contribs) in contributors {
            let mut total_frequency = 0;
            let mut jobs: HashSet<&str> = HashSet::new();
            for leaf_id in &contribs {
                let leaf = &leaves[leaf_id];
                total_frequency += leaf.direct_frequency;
                jobs.extend(leaf.job_ids.iter().map(String::as_str));
            }

            let direct_frequency = leaves
                .get(&skill_id)
                .map_or(0, |leaf| leaf.direct_frequency);

            rows.insert(
                skill_id,
                AggregateRow {
                    direct_frequency,
                    total_frequency,
                    job_count: jobs.len() as i64,
                },
            );
        }
        rows
    }
}

/// Summary of one completed analysis run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisOutcome {
    pub run_id: String,
    pub mention_count: usize,
    pub leaf_count: usize,
    pub aggregate_count: usize,
}

/// One full batch run: count mentions, aggregate up the graph, and replace
/// both derived tables atomically. The caller is expected to hold the
/// `RunLock` when concurrent triggers are possible.
pub fn run_analysis(db: &Database) -> Result<AnalysisOutcome> {
    let run_id = Uuid::new_v4().to_string();
    let mentions = db.job_extracted_mentions()?;
    let mention_count = mentions.len();
    let leaves = count_mentions(mentions);
    debug!(
        run_id,
        mentions = mention_count,
        leaves = leaves.len(),
        "counted leaf frequencies"
    );

    let graph = SkillGraph::load(db)?;
    let rows = HierarchicalAggregator::new(&graph).aggregate(&leaves);

    let leaf_records: Vec<LeafRecord> = leaves
        .iter()
        .map(|(skill_id, leaf)| LeafRecord {
            skill_id: *skill_id,
            direct_frequency: leaf.direct_frequency,
            job_count: leaf.job_count(),
        })
        .collect();

    let now = Utc::now().to_rfc3339();
    let aggregate_records: Vec<AggregateRecord> = rows
        .iter()
        .map(|(skill_id, row)| AggregateRecord {
            skill_id: *skill_id,
            direct_frequency: row.direct_frequency,
            total_frequency: row.total_frequency,
            job_count: row.job_count,
            last_updated: now.clone(),
        })
        .collect();

    db.rebuild_frequencies(&leaf_records, &aggregate_records)?;

    info!(
        run_id,
        leaves = leaf_records.len(),
        aggregates = aggregate_records.len(),
        "analysis run complete"
    );
    Ok(AnalysisOutcome {
        run_id,
        mention_count,
        leaf_count: leaf_records.len(),
        aggregate_count: aggregate_records.len(),
    })
}
