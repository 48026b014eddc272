//! Run-level mutual exclusion for analysis runs.
//!
//! The delete-then-insert rebuild of the aggregate table is not safe under
//! concurrent execution, so analyze takes an advisory file lock for the
//! duration of the run.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SkillmapError};

#[derive(Debug, Serialize, Deserialize)]
struct LockHolder {
    pid: u32,
    acquired_at: DateTime<Utc>,
}

/// Advisory file lock held for the duration of one analysis run.
pub struct RunLock {
    #[allow(dead_code)]
    lock_file: File,
    lock_path: PathBuf,
}

impl RunLock {
    const LOCK_FILENAME: &'static str = "skillmap.lock";

    /// Acquire the lock without blocking; errors with `LockHeld` when
    /// another run owns it.
    pub fn acquire(data_dir: &Path) -> Result<Self> {
        let lock_path = data_dir.join(Self::LOCK_FILENAME);
        fs::create_dir_all(data_dir)?;

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| SkillmapError::LockFailed(format!("open lock file: {e}")))?;

        if lock_file.try_lock_exclusive().is_err() {
            let holder = fs::read_to_string(&lock_path).unwrap_or_default();
            return Err(SkillmapError::LockHeld(if holder.is_empty() {
                lock_path.display().to_string()
            } else {
                holder
            }));
        }

        let holder = LockHolder {
            pid: std::process::id(),
            acquired_at: Utc::now(),
        };
        let holder_json = serde_json::to_string(&holder).unwrap_or_default();
        fs::write(&lock_path, holder_json).ok();

        debug!("Acquired run lock at {:?}", lock_path);
        Ok(Self {
            lock_file,
            lock_path,
        })
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        fs::write(&self.lock_path, "").ok();
        debug!("Released run lock at {:?}", self.lock_path);
    }
}
