//! Read-only views over the aggregated frequency table.

use itertools::Itertools;
use rusqlite::params;
use serde::Serialize;

use crate::error::{Result, SkillmapError};
use crate::graph::{descendants_with_depth, SkillGraph};
use crate::storage::Database;

/// Ranking key for top-N reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RankBy {
    /// Hierarchy-propagated total frequency
    Total,
    /// Raw mention count
    Direct,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrequencyRow {
    pub skill_id: i64,
    pub name: String,
    pub direct_frequency: i64,
    pub total_frequency: i64,
    pub job_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HierarchyRow {
    pub name: String,
    pub level: usize,
    pub direct_frequency: i64,
    pub total_frequency: i64,
    pub job_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    pub skill_count: i64,
    pub total_direct: i64,
    pub total_with_hierarchy: i64,
    pub avg_direct: f64,
    pub max_total: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WeightSummary {
    pub edge_count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// weight >= 0.8
    pub critical: usize,
    /// 0.7 <= weight < 0.8
    pub important: usize,
    /// 0.6 <= weight < 0.7
    pub moderate: usize,
    /// weight < 0.6
    pub low: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationshipView {
    pub skill: String,
    pub parents: Vec<(String, f64)>,
    pub children: Vec<(String, f64)>,
}

/// Postings mentioning one skill, with per-posting mention counts.
#[derive(Debug, Clone, Serialize)]
pub struct JobMentions {
    pub skill: String,
    pub jobs: Vec<(String, i64)>,
}

/// Top skills ordered by the chosen frequency, descending, ties broken
/// alphabetically by name.
pub fn top_skills(db: &Database, limit: usize, by: RankBy) -> Result<Vec<FrequencyRow>> {
    let order_field = match by {
        RankBy::Total => "f.total_frequency",
        RankBy::Direct => "f.direct_frequency",
    };
    let sql = format!(
        "SELECT f.skill_id, s.name, f.direct_frequency, f.total_frequency, f.job_count
         FROM aggregate_frequencies f
         JOIN skills s ON s.id = f.skill_id
         ORDER BY {order_field} DESC, s.name ASC
         LIMIT ?"
    );
    let mut stmt = db.conn().prepare(&sql)?;
    let rows = stmt.query_map([limit as i64], frequency_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Downward expansion from a named skill, each descendant with its own
/// aggregate row (zeros when it has none). Rows are grouped by level and
/// ordered by total frequency within a level.
pub fn hierarchy_slice(db: &Database, skill_name: &str, depth: usize) -> Result<Vec<HierarchyRow>> {
    let root = db
        .find_skill(skill_name)?
        .ok_or_else(|| SkillmapError::SkillNotFound(skill_name.to_string()))?;

    let graph = SkillGraph::load(db)?;
    let slice = descendants_with_depth(&graph, root.id, depth);

    let mut rows = Vec::with_capacity(slice.len());
    for (skill_id, level) in slice {
        let name = db
            .get_skill(skill_id)?
            .map(|s| s.name)
            .unwrap_or_else(|| format!("#{skill_id}"));
        let agg = db.aggregate_for(skill_id)?;
        let (direct, total, jobs) = agg
            .map(|a| (a.direct_frequency, a.total_frequency, a.job_count))
            .unwrap_or((0, 0, 0));
        rows.push(HierarchyRow {
            name,
            level,
            direct_frequency: direct,
            total_frequency: total,
            job_count: jobs,
        });
    }

    rows.sort_by(|a, b| {
        a.level
            .cmp(&b.level)
            .then(b.total_frequency.cmp(&a.total_frequency))
            .then(a.name.cmp(&b.name))
    });
    Ok(rows)
}

/// Summary statistics over the aggregate table; None when it is empty.
pub fn summary(db: &Database) -> Result<Option<SummaryStats>> {
    let count: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM aggregate_frequencies", [], |r| {
            r.get(0)
        })?;
    if count == 0 {
        return Ok(None);
    }

    let stats = db.conn().query_row(
        "SELECT COUNT(*),
                SUM(direct_frequency),
                SUM(total_frequency),
                AVG(direct_frequency),
                MAX(total_frequency)
         FROM aggregate_frequencies",
        [],
        |row| {
            Ok(SummaryStats {
                skill_count: row.get(0)?,
                total_direct: row.get(1)?,
                total_with_hierarchy: row.get(2)?,
                avg_direct: row.get(3)?,
                max_total: row.get(4)?,
            })
        },
    )?;
    Ok(Some(stats))
}

/// Edge weight distribution, bucketed the way the hierarchy definitions
/// grade importance.
pub fn weight_summary(db: &Database) -> Result<WeightSummary> {
    let edges = db.edges()?;
    if edges.is_empty() {
        return Ok(WeightSummary::default());
    }

    let weights: Vec<f64> = edges.iter().map(|e| e.weight).collect();
    let sum: f64 = weights.iter().sum();
    let mut out = WeightSummary {
        edge_count: weights.len(),
        min: weights.iter().copied().fold(f64::INFINITY, f64::min),
        max: weights.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        avg: sum / weights.len() as f64,
        ..WeightSummary::default()
    };
    for w in weights {
        if w >= 0.8 {
            out.critical += 1;
        } else if w >= 0.7 {
            out.important += 1;
        } else if w >= 0.6 {
            out.moderate += 1;
        } else {
            out.low += 1;
        }
    }
    Ok(out)
}

/// Case-insensitive substring search over skill names, most frequent first.
pub fn search(db: &Database, term: &str) -> Result<Vec<FrequencyRow>> {
    let pattern = format!("%{}%", term.trim().to_lowercase());
    let mut stmt = db.conn().prepare(
        "SELECT s.id, s.name,
                COALESCE(f.direct_frequency, 0),
                COALESCE(f.total_frequency, 0),
                COALESCE(f.job_count, 0)
         FROM skills s
         LEFT JOIN aggregate_frequencies f ON f.skill_id = s.id
         WHERE s.name_lower LIKE ?
         ORDER BY COALESCE(f.total_frequency, 0) DESC, s.name ASC",
    )?;
    let rows = stmt.query_map([pattern], frequency_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Parents and children of a named skill, heaviest edges first.
pub fn relationships_of(db: &Database, skill_name: &str) -> Result<RelationshipView> {
    let skill = db
        .find_skill(skill_name)?
        .ok_or_else(|| SkillmapError::SkillNotFound(skill_name.to_string()))?;

    let mut stmt = db.conn().prepare(
        "SELECT p.name, e.weight
         FROM skill_edges e JOIN skills p ON p.id = e.parent_id
         WHERE e.child_id = ?",
    )?;
    let parents: Vec<(String, f64)> = stmt
        .query_map(params![skill.id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut stmt = db.conn().prepare(
        "SELECT c.name, e.weight
         FROM skill_edges e JOIN skills c ON c.id = e.child_id
         WHERE e.parent_id = ?",
    )?;
    let children: Vec<(String, f64)> = stmt
        .query_map(params![skill.id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let by_weight_then_name = |list: Vec<(String, f64)>| {
        list.into_iter()
            .sorted_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            })
            .collect::<Vec<_>>()
    };

    Ok(RelationshipView {
        skill: skill.name,
        parents: by_weight_then_name(parents),
        children: by_weight_then_name(children),
    })
}

/// Postings that mention a named skill, most mentions first, ties broken
/// by job id.
pub fn jobs_with_skill(db: &Database, skill_name: &str) -> Result<JobMentions> {
    let skill = db
        .find_skill(skill_name)?
        .ok_or_else(|| SkillmapError::SkillNotFound(skill_name.to_string()))?;

    let mut stmt = db.conn().prepare(
        "SELECT job_id, COUNT(*) FROM skill_mentions
         WHERE skill_id = ?
         GROUP BY job_id
         ORDER BY COUNT(*) DESC, job_id ASC",
    )?;
    let jobs = stmt
        .query_map(params![skill.id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(JobMentions {
        skill: skill.name,
        jobs,
    })
}

fn frequency_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FrequencyRow> {
    Ok(FrequencyRow {
        skill_id: row.get(0)?,
        name: row.get(1)?,
        direct_frequency: row.get(2)?,
        total_frequency: row.get(3)?,
        job_count: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::run_analysis;
    use crate::storage::Provenance;

    /// Seed: Programming Languages -> Python -> NumPy, with Python and
    /// NumPy mentioned in jobs.
    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        let langs = db
            .upsert_skill("Programming Languages", Provenance::HierarchyDefined)
            .unwrap();
        let python = db.upsert_skill("python", Provenance::JobExtracted).unwrap();
        let numpy = db.upsert_skill("numpy", Provenance::JobExtracted).unwrap();
        db.upsert_edge(langs, python, 0.8, "{}").unwrap();
        db.upsert_edge(python, numpy, 0.7, "{}").unwrap();

        for job in ["j1", "j2"] {
            db.record_job(job, "{}").unwrap();
        }
        db.replace_job_mentions("j1", &[python, numpy]).unwrap();
        db.replace_job_mentions("j2", &[python]).unwrap();

        run_analysis(&db).unwrap();
        db
    }

    #[test]
    fn top_skills_orders_by_total_then_name() {
        let db = seeded_db();
        let rows = top_skills(&db, 10, RankBy::Total).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        // python and its ancestor tie on total=3; alphabetical break.
        assert_eq!(names, vec!["Programming Languages", "python", "numpy"]);
        assert_eq!(rows[0].direct_frequency, 0);
        assert_eq!(rows[0].total_frequency, 3);
    }

    #[test]
    fn top_skills_by_direct_excludes_ancestor_boost() {
        let db = seeded_db();
        let rows = top_skills(&db, 1, RankBy::Direct).unwrap();
        assert_eq!(rows[0].name, "python");
        assert_eq!(rows[0].direct_frequency, 2);
    }

    #[test]
    fn hierarchy_slice_levels_and_zero_fill() {
        let db = seeded_db();
        let rows = hierarchy_slice(&db, "programming languages", 3).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].level, 0);
        assert_eq!(rows[0].name, "Programming Languages");
        assert_eq!(rows[1].level, 1);
        assert_eq!(rows[1].name, "python");
        assert_eq!(rows[2].level, 2);
        assert_eq!(rows[2].name, "numpy");
    }

    #[test]
    fn hierarchy_slice_unknown_skill_errors() {
        let db = seeded_db();
        let err = hierarchy_slice(&db, "no-such-skill", 3).unwrap_err();
        assert!(matches!(err, SkillmapError::SkillNotFound(_)));
    }

    #[test]
    fn summary_reports_totals() {
        let db = seeded_db();
        let stats = summary(&db).unwrap().unwrap();
        assert_eq!(stats.skill_count, 3);
        assert_eq!(stats.total_direct, 3);
        assert_eq!(stats.max_total, 3);
    }

    #[test]
    fn summary_is_none_before_any_run() {
        let db = Database::open_in_memory().unwrap();
        assert!(summary(&db).unwrap().is_none());
    }

    #[test]
    fn weight_summary_buckets() {
        let db = seeded_db();
        let ws = weight_summary(&db).unwrap();
        assert_eq!(ws.edge_count, 2);
        assert_eq!(ws.critical, 1);
        assert_eq!(ws.important, 1);
        assert_eq!(ws.min, 0.7);
        assert_eq!(ws.max, 0.8);
    }

    #[test]
    fn search_matches_substring_case_insensitively() {
        let db = seeded_db();
        let rows = search(&db, "PY").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "python");
        assert_eq!(rows[1].name, "numpy");
    }

    #[test]
    fn jobs_with_skill_lists_postings() {
        let db = seeded_db();
        let view = jobs_with_skill(&db, "PYTHON").unwrap();
        assert_eq!(view.skill, "python");
        assert_eq!(
            view.jobs,
            vec![("j1".to_string(), 1), ("j2".to_string(), 1)]
        );

        let view = jobs_with_skill(&db, "numpy").unwrap();
        assert_eq!(view.jobs, vec![("j1".to_string(), 1)]);
    }

    #[test]
    fn jobs_with_skill_unknown_skill_errors() {
        let db = seeded_db();
        let err = jobs_with_skill(&db, "no-such-skill").unwrap_err();
        assert!(matches!(err, SkillmapError::SkillNotFound(_)));
    }

    #[test]
    fn relationships_lists_both_directions() {
        let db = seeded_db();
        let view = relationships_of(&db, "python").unwrap();
        assert_eq!(view.parents, vec![("Programming Languages".to_string(), 0.8)]);
        assert_eq!(view.children, vec![("numpy".to_string(), 0.7)]);
    }
}
