pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod storage;

pub use error::{Result, SkillmapError};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
