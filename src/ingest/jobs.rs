//! Job-posting ingestion.
//!
//! Postings arrive as JSON exports whose framing varies: a plain array, an
//! array wrapped in another array, or `[{"data": [...]}]`. Individual
//! records are navigated tolerantly; one malformed record is counted and
//! skipped, never fatal for the batch.

use std::path::Path;

use indicatif::ProgressBar;
use serde_json::Value as JsonValue;
use tracing::{debug, error, warn};

use crate::error::{Result, SkillmapError};
use crate::storage::{Database, Provenance};

/// Outcome counts for one ingestion batch, threaded explicitly through the
/// call chain and reported once at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub processed: usize,
    /// Records with no usable job id or structure.
    pub failed: usize,
    /// Well-formed records that carried no extractable skills.
    pub skipped: usize,
    pub mentions_recorded: usize,
}

/// One parsed posting, ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedJob {
    pub id: String,
    pub competencies_json: String,
    /// One entry per mention; duplicates within a posting are preserved.
    pub skill_names: Vec<String>,
}

/// Read a jobs file and unwrap whichever framing it uses.
pub fn load_jobs_file(path: &Path) -> Result<Vec<JsonValue>> {
    let raw = std::fs::read_to_string(path)?;
    let data: JsonValue = serde_json::from_str(&raw)?;
    Ok(unwrap_jobs(data))
}

fn unwrap_jobs(data: JsonValue) -> Vec<JsonValue> {
    match data {
        JsonValue::Array(items) => match items.first() {
            Some(JsonValue::Array(_)) => match items.into_iter().next() {
                Some(JsonValue::Array(inner)) => inner,
                _ => Vec::new(),
            },
            Some(JsonValue::Object(obj)) if obj.contains_key("data") => {
                match items.into_iter().next() {
                    Some(JsonValue::Object(mut obj)) => match obj.remove("data") {
                        Some(JsonValue::Array(inner)) => inner,
                        _ => Vec::new(),
                    },
                    _ => Vec::new(),
                }
            }
            _ => items,
        },
        other => vec![other],
    }
}

/// Extract id, competencies and skill mentions from one posting.
pub fn parse_job(record: &JsonValue) -> Result<ParsedJob> {
    let obj = record
        .as_object()
        .ok_or_else(|| SkillmapError::InvalidJobRecord("record is not an object".to_string()))?;

    let id = match obj.get("id") {
        Some(JsonValue::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(JsonValue::Number(n)) => n.to_string(),
        _ => {
            return Err(SkillmapError::InvalidJobRecord(
                "missing job id".to_string(),
            ))
        }
    };

    // Some exports nest a second `attributes` level.
    let mut attributes = obj.get("attributes").unwrap_or(&JsonValue::Null);
    if let Some(inner) = attributes.get("attributes") {
        attributes = inner;
    }

    let competencies = attributes
        .get("competencies")
        .and_then(JsonValue::as_array)
        .cloned()
        .unwrap_or_default();

    let mut skill_names = Vec::new();
    for competency in &competencies {
        let Some(list) = competency.get("skills").and_then(JsonValue::as_array) else {
            continue;
        };
        for entry in list {
            let name = match entry {
                JsonValue::String(s) => s.as_str(),
                JsonValue::Object(o) => o.get("name").and_then(JsonValue::as_str).unwrap_or(""),
                _ => "",
            };
            let name = name.trim().to_lowercase();
            if !name.is_empty() {
                skill_names.push(name);
            }
        }
    }

    Ok(ParsedJob {
        id,
        competencies_json: serde_json::to_string(&competencies)?,
        skill_names,
    })
}

/// Ingest a batch of postings. Per-record failures are absorbed into the
/// stats; a storage error aborts the run, reporting how far it got.
pub fn ingest_jobs(
    db: &Database,
    records: &[JsonValue],
    progress: &ProgressBar,
) -> Result<BatchStats> {
    let mut stats = BatchStats {
        total: records.len(),
        ..BatchStats::default()
    };

    for record in records {
        progress.inc(1);
        let job = match parse_job(record) {
            Ok(job) => job,
            Err(err) => {
                warn!(%err, "skipping malformed job record");
                stats.failed += 1;
                continue;
            }
        };

        if job.skill_names.is_empty() {
            debug!(job_id = %job.id, "no skills found in posting");
            stats.skipped += 1;
            continue;
        }

        let mentions = match store_parsed_job(db, &job) {
            Ok(mentions) => mentions,
            Err(err) => {
                error!(
                    job_id = %job.id,
                    processed = stats.processed,
                    total = stats.total,
                    %err,
                    "storage failure aborted batch"
                );
                return Err(SkillmapError::IngestAborted {
                    processed: stats.processed,
                    total: stats.total,
                    source: Box::new(err),
                });
            }
        };

        stats.processed += 1;
        stats.mentions_recorded += mentions;
    }

    debug!(?stats, "job batch ingested");
    Ok(stats)
}

fn store_parsed_job(db: &Database, job: &ParsedJob) -> Result<usize> {
    let mut skill_ids = Vec::with_capacity(job.skill_names.len());
    for name in &job.skill_names {
        skill_ids.push(db.upsert_skill(name, Provenance::JobExtracted)?);
    }
    db.record_job(&job.id, &job.competencies_json)?;
    db.replace_job_mentions(&job.id, &skill_ids)?;
    Ok(skill_ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn posting(id: &str, skills: JsonValue) -> JsonValue {
        json!({
            "id": id,
            "attributes": {
                "attributes": {
                    "competencies": [
                        {"name": "engineering", "skills": skills}
                    ]
                }
            }
        })
    }

    #[test]
    fn unwraps_plain_array() {
        let jobs = unwrap_jobs(json!([{"id": "a"}, {"id": "b"}]));
        assert_eq!(jobs.len(), 2);
    }

    #[test]
    fn unwraps_nested_array() {
        let jobs = unwrap_jobs(json!([[{"id": "a"}]]));
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["id"], "a");
    }

    #[test]
    fn unwraps_data_envelope() {
        let jobs = unwrap_jobs(json!([{"data": [{"id": "a"}, {"id": "b"}]}]));
        assert_eq!(jobs.len(), 2);
    }

    #[test]
    fn single_object_becomes_one_record() {
        let jobs = unwrap_jobs(json!({"id": "a"}));
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn parses_string_and_object_skills() {
        let record = posting("job-1", json!(["Python", {"name": "  NumPy "}, "", 42]));
        let job = parse_job(&record).unwrap();
        assert_eq!(job.id, "job-1");
        assert_eq!(job.skill_names, vec!["python", "numpy"]);
    }

    #[test]
    fn preserves_duplicate_mentions_within_a_posting() {
        let record = posting("job-1", json!(["python", "Python"]));
        let job = parse_job(&record).unwrap();
        assert_eq!(job.skill_names, vec!["python", "python"]);
    }

    #[test]
    fn accepts_numeric_job_ids() {
        let record = json!({"id": 17, "attributes": {"competencies": []}});
        let job = parse_job(&record).unwrap();
        assert_eq!(job.id, "17");
        assert!(job.skill_names.is_empty());
    }

    #[test]
    fn rejects_missing_id() {
        let record = json!({"attributes": {}});
        assert!(matches!(
            parse_job(&record),
            Err(SkillmapError::InvalidJobRecord(_))
        ));
    }

    #[test]
    fn batch_counts_processed_failed_and_skipped() {
        let db = Database::open_in_memory().unwrap();
        let records = vec![
            posting("job-1", json!(["python", "sql"])),
            json!({"no_id": true}),
            posting("job-2", json!([])),
        ];

        let stats = ingest_jobs(&db, &records, &ProgressBar::hidden()).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.mentions_recorded, 2);
    }

    #[test]
    fn storage_failure_reports_partial_progress() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .execute_batch(
                "CREATE TRIGGER reject_j2 BEFORE INSERT ON jobs
                 WHEN NEW.id = 'j2'
                 BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
            )
            .unwrap();

        let records = vec![
            posting("j1", json!(["python"])),
            posting("j2", json!(["sql"])),
            posting("j3", json!(["go"])),
        ];
        let err = ingest_jobs(&db, &records, &ProgressBar::hidden()).unwrap_err();

        assert!(err.to_string().contains("after 1 of 3"), "got: {err}");
        match err {
            SkillmapError::IngestAborted {
                processed, total, ..
            } => {
                assert_eq!(processed, 1);
                assert_eq!(total, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        // The first record's work survives (at-least-once model).
        assert_eq!(db.table_count("jobs").unwrap(), 1);
    }

    #[test]
    fn reingesting_same_batch_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let records = vec![posting("job-1", json!(["python", "sql"]))];

        ingest_jobs(&db, &records, &ProgressBar::hidden()).unwrap();
        ingest_jobs(&db, &records, &ProgressBar::hidden()).unwrap();

        assert_eq!(db.table_count("skills").unwrap(), 2);
        assert_eq!(db.table_count("jobs").unwrap(), 1);
        assert_eq!(db.table_count("skill_mentions").unwrap(), 2);
    }
}
