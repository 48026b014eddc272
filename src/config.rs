use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillmapError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the database and the run lock.
    pub data_dir: Option<PathBuf>,
    /// Explicit database path; overrides `data_dir`/skillmap.db.
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Default row limit for top-N reports.
    pub top_limit: usize,
    /// Default depth for hierarchy slices.
    pub tree_depth: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_limit: 20,
            tree_depth: 3,
        }
    }
}

impl Config {
    /// Load config from an explicit path, `SKILLMAP_CONFIG`, or the global
    /// config file. A missing file yields the defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SKILLMAP_CONFIG").ok().map(PathBuf::from))
            .or_else(|| dirs::config_dir().map(|d| d.join("skillmap/config.toml")));

        let mut config = match path {
            Some(ref p) if p.exists() => {
                let raw = std::fs::read_to_string(p).map_err(|err| {
                    SkillmapError::Config(format!("read config {}: {err}", p.display()))
                })?;
                toml::from_str(&raw)?
            }
            _ => Self::default(),
        };

        if let Ok(dir) = std::env::var("SKILLMAP_DATA_DIR") {
            config.storage.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(db) = std::env::var("SKILLMAP_DB_PATH") {
            config.storage.db_path = Some(PathBuf::from(db));
        }

        Ok(config)
    }

    /// Directory holding durable state. Defaults to the platform data dir.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.storage.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("skillmap"))
            .ok_or_else(|| SkillmapError::Config("data directory not found".to_string()))
    }

    /// Path of the SQLite database file.
    pub fn db_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.storage.db_path {
            return Ok(path.clone());
        }
        Ok(self.data_dir()?.join("skillmap.db"))
    }
}
