//! SQLite database layer

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Result, SkillmapError};
use crate::storage::migrations;

/// SQLite database wrapper for the skill registry
pub struct Database {
    conn: Connection,
    schema_version: u32,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

/// Where a skill was first (or ever) observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    JobExtracted,
    HierarchyDefined,
    Other,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::JobExtracted => "job-extracted",
            Provenance::HierarchyDefined => "hierarchy-defined",
            Provenance::Other => "other",
        }
    }

    fn from_str(s: &str) -> Self {
        match s {
            "job-extracted" => Provenance::JobExtracted,
            "hierarchy-defined" => Provenance::HierarchyDefined,
            _ => Provenance::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillRecord {
    pub id: i64,
    pub name: String,
    pub provenance: Provenance,
    pub metadata_json: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub parent_id: i64,
    pub child_id: i64,
    pub weight: f64,
    pub metadata_json: String,
}

/// Leaf frequency row for a job-extracted skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafRecord {
    pub skill_id: i64,
    pub direct_frequency: i64,
    pub job_count: i64,
}

/// Aggregate frequency row for any skill reachable from a leaf.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AggregateRecord {
    pub skill_id: i64,
    pub direct_frequency: i64,
    pub total_frequency: i64,
    pub job_count: i64,
    pub last_updated: String,
}

impl Database {
    /// Open database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory database, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        Self::configure_pragmas(&conn)?;
        let schema_version = migrations::run_migrations(&conn)?;

        Ok(Self {
            conn,
            schema_version,
        })
    }

    /// Get a reference to the connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Current schema version after migrations.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;",
        )?;
        Ok(())
    }

    // =========================================================================
    // Skills
    // =========================================================================

    /// Idempotent insert keyed on the case-insensitive name. Returns the
    /// existing id when the skill is already known, upgrading its provenance
    /// to job-extracted if this call observes it in a job.
    pub fn upsert_skill(&self, name: &str, provenance: Provenance) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SkillmapError::InvalidJobRecord(
                "empty skill name".to_string(),
            ));
        }
        let name_lower = name.to_lowercase();

        let existing: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT id, provenance FROM skills WHERE name_lower = ?",
                [&name_lower],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        if let Some((id, current)) = existing {
            if provenance == Provenance::JobExtracted
                && Provenance::from_str(&current) != Provenance::JobExtracted
            {
                self.conn.execute(
                    "UPDATE skills SET provenance = ? WHERE id = ?",
                    params![Provenance::JobExtracted.as_str(), id],
                )?;
            }
            return Ok(id);
        }

        self.conn.execute(
            "INSERT INTO skills (name, name_lower, provenance, metadata_json, created_at)
             VALUES (?, ?, ?, '{}', ?)",
            params![name, name_lower, provenance.as_str(), Utc::now().to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_skill(&self, id: i64) -> Result<Option<SkillRecord>> {
        self.conn
            .query_row(
                "SELECT id, name, provenance, metadata_json, created_at
                 FROM skills WHERE id = ?",
                [id],
                skill_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Case-insensitive lookup by name.
    pub fn find_skill(&self, name: &str) -> Result<Option<SkillRecord>> {
        self.conn
            .query_row(
                "SELECT id, name, provenance, metadata_json, created_at
                 FROM skills WHERE name_lower = ?",
                [name.trim().to_lowercase()],
                skill_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Skill counts grouped by provenance tag.
    pub fn provenance_counts(&self) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT provenance, COUNT(*) FROM skills GROUP BY provenance ORDER BY provenance",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }

    // =========================================================================
    // Edges
    // =========================================================================

    /// Insert a parent -> child edge unless the pair already exists.
    /// Returns true when a new edge was written.
    pub fn upsert_edge(
        &self,
        parent_id: i64,
        child_id: i64,
        weight: f64,
        metadata_json: &str,
    ) -> Result<bool> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM skill_edges WHERE parent_id = ? AND child_id = ?",
                params![parent_id, child_id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Ok(false);
        }

        self.conn.execute(
            "INSERT INTO skill_edges (parent_id, child_id, weight, metadata_json, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                parent_id,
                child_id,
                weight,
                metadata_json,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(true)
    }

    pub fn edges(&self) -> Result<Vec<EdgeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT parent_id, child_id, weight, metadata_json FROM skill_edges",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(EdgeRecord {
                parent_id: row.get(0)?,
                child_id: row.get(1)?,
                weight: row.get(2)?,
                metadata_json: row.get(3)?,
            })
        })?;
        let mut edges = Vec::new();
        for row in rows {
            edges.push(row?);
        }
        Ok(edges)
    }

    // =========================================================================
    // Jobs and mentions
    // =========================================================================

    /// Record an ingested job posting. Re-ingesting replaces the stored
    /// competency snapshot.
    pub fn record_job(&self, job_id: &str, competencies_json: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO jobs (id, competencies_json, ingested_at)
             VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                competencies_json=excluded.competencies_json,
                ingested_at=excluded.ingested_at",
            params![job_id, competencies_json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Replace the mention rows for one job. Delete-then-insert keeps
    /// whole-file re-ingestion idempotent.
    pub fn replace_job_mentions(&self, job_id: &str, skill_ids: &[i64]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM skill_mentions WHERE job_id = ?", [job_id])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO skill_mentions (skill_id, job_id) VALUES (?, ?)")?;
            for skill_id in skill_ids {
                stmt.execute(params![skill_id, job_id])?;
            }
        }
        tx.commit()
            .map_err(|err| SkillmapError::TransactionFailed(err.to_string()))?;
        Ok(())
    }

    /// All (skill_id, job_id) mention pairs for job-extracted skills.
    /// Skills created purely from the hierarchy never appear here.
    pub fn job_extracted_mentions(&self) -> Result<Vec<(i64, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.skill_id, m.job_id
             FROM skill_mentions m
             JOIN skills s ON s.id = m.skill_id
             WHERE s.provenance = 'job-extracted'",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut mentions = Vec::new();
        for row in rows {
            mentions.push(row?);
        }
        Ok(mentions)
    }

    // =========================================================================
    // Derived frequency tables
    // =========================================================================

    /// Clear and rebuild both derived tables in a single transaction.
    /// A failed run rolls back and leaves the previous aggregate intact.
    pub fn rebuild_frequencies(
        &self,
        leaves: &[LeafRecord],
        aggregates: &[AggregateRecord],
    ) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM leaf_frequencies", [])?;
        tx.execute("DELETE FROM aggregate_frequencies", [])?;

        {
            let now = Utc::now().to_rfc3339();
            let mut stmt = tx.prepare(
                "INSERT INTO leaf_frequencies (skill_id, direct_frequency, job_count, computed_at)
                 VALUES (?, ?, ?, ?)",
            )?;
            for leaf in leaves {
                stmt.execute(params![
                    leaf.skill_id,
                    leaf.direct_frequency,
                    leaf.job_count,
                    now
                ])?;
            }
        }
        {
            let mut stmt = tx.prepare(
                "INSERT INTO aggregate_frequencies
                     (skill_id, direct_frequency, total_frequency, job_count, last_updated)
                 VALUES (?, ?, ?, ?, ?)",
            )?;
            for agg in aggregates {
                stmt.execute(params![
                    agg.skill_id,
                    agg.direct_frequency,
                    agg.total_frequency,
                    agg.job_count,
                    agg.last_updated
                ])?;
            }
        }

        tx.commit()
            .map_err(|err| SkillmapError::TransactionFailed(err.to_string()))?;
        Ok(())
    }

    pub fn aggregate_for(&self, skill_id: i64) -> Result<Option<AggregateRecord>> {
        self.conn
            .query_row(
                "SELECT skill_id, direct_frequency, total_frequency, job_count, last_updated
                 FROM aggregate_frequencies WHERE skill_id = ?",
                [skill_id],
                aggregate_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Drop both derived tables' contents, keeping source data.
    pub fn clear_frequencies(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM leaf_frequencies", [])?;
        tx.execute("DELETE FROM aggregate_frequencies", [])?;
        tx.commit()
            .map_err(|err| SkillmapError::TransactionFailed(err.to_string()))?;
        Ok(())
    }

    /// Drop everything, dependents first so foreign keys hold throughout.
    pub fn clear_all(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for table in [
            "leaf_frequencies",
            "aggregate_frequencies",
            "skill_mentions",
            "jobs",
            "skill_edges",
            "skills",
        ] {
            tx.execute(&format!("DELETE FROM {table}"), [])?;
        }
        tx.commit()
            .map_err(|err| SkillmapError::TransactionFailed(err.to_string()))?;
        Ok(())
    }

    pub fn table_count(&self, table: &str) -> Result<i64> {
        // Table names come from a fixed internal list, never user input.
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })?;
        Ok(count)
    }
}

fn skill_from_row(row: &Row<'_>) -> rusqlite::Result<SkillRecord> {
    let provenance: String = row.get(2)?;
    Ok(SkillRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        provenance: Provenance::from_str(&provenance),
        metadata_json: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub(crate) fn aggregate_from_row(row: &Row<'_>) -> rusqlite::Result<AggregateRecord> {
    Ok(AggregateRecord {
        skill_id: row.get(0)?,
        direct_frequency: row.get(1)?,
        total_frequency: row.get(2)?,
        job_count: row.get(3)?,
        last_updated: row.get(4)?,
    })
}
