//! Leaf frequency table from raw mention rows.

use std::collections::{BTreeMap, HashSet};

/// Per-leaf mention statistics for one job-extracted skill.
///
/// `direct_frequency` counts every mention, so a skill listed twice in the
/// same posting counts twice; `job_ids` is the distinct posting set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafFrequency {
    pub direct_frequency: i64,
    pub job_ids: HashSet<String>,
}

impl LeafFrequency {
    pub fn job_count(&self) -> i64 {
        self.job_ids.len() as i64
    }
}

/// Fold (skill_id, job_id) mention pairs into one row per distinct skill.
/// Skills with zero mentions simply do not appear. The input is expected
/// to be pre-filtered to job-extracted skills.
pub fn count_mentions<I>(mentions: I) -> BTreeMap<i64, LeafFrequency>
where
    I: IntoIterator<Item = (i64, String)>,
{
    let mut table: BTreeMap<i64, LeafFrequency> = BTreeMap::new();
    for (skill_id, job_id) in mentions {
        let entry = table.entry(skill_id).or_default();
        entry.direct_frequency += 1;
        entry.job_ids.insert(job_id);
    }
    table
}
