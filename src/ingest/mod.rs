//! Batch ingestion of job postings and the static hierarchy definition.

pub mod hierarchy;
pub mod jobs;

pub use hierarchy::{ingest_hierarchy, load_hierarchy, HierarchyStats};
pub use jobs::{ingest_jobs, load_jobs_file, BatchStats};
