use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillmapError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Skill not found: {0}")]
    SkillNotFound(String),

    #[error("Invalid job record: {0}")]
    InvalidJobRecord(String),

    #[error("Ingestion aborted after {processed} of {total} records: {source}")]
    IngestAborted {
        processed: usize,
        total: usize,
        source: Box<SkillmapError>,
    },

    #[error("Invalid hierarchy definition: {0}")]
    InvalidHierarchy(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Another analysis run holds the lock: {0}")]
    LockHeld(String),

    #[error("Lock failed: {0}")]
    LockFailed(String),
}

pub type Result<T> = std::result::Result<T, SkillmapError>;
