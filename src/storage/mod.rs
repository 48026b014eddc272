//! Storage layer for skillmap
//!
//! SQLite for the skill registry and derived frequency tables, plus an
//! advisory file lock that keeps analysis runs single-flight.

pub mod lock;
pub mod migrations;
pub mod sqlite;

pub use lock::RunLock;
pub use sqlite::{
    AggregateRecord, Database, EdgeRecord, LeafRecord, Provenance, SkillRecord,
};
