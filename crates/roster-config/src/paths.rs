//! File system paths for roster.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Document database filename under the base directory.
const DATABASE_FILE_NAME: &str = "roster.sqlite";
/// Blob storage root directory name under the base directory.
const BLOBS_DIR_NAME: &str = "blobs";

/// Manages file system paths.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for all roster files (~/.roster)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.roster`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(".roster"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.roster).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.roster/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the document database path (~/.roster/roster.sqlite).
    pub fn database_file(&self) -> PathBuf {
        self.base_dir.join(DATABASE_FILE_NAME)
    }

    /// Get the blob storage root (~/.roster/blobs).
    pub fn blobs_dir(&self) -> PathBuf {
        self.base_dir.join(BLOBS_DIR_NAME)
    }

    /// Get the logs directory (~/.roster/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the JSONL log file path (~/.roster/logs/roster.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("roster.jsonl")
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.blobs_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
