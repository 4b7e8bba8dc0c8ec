//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database path, log directory and log level.
//! - Wire logging and the SQLite-backed store from one place.
//!
//! # Invariants
//! - Blank environment values are ignored in favor of defaults.

use crate::logging::{default_log_level, init_logging};
use crate::repo::kv_store::StorageResult;
use crate::service::task_store::SqliteTaskStore;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TASKFLOW_DB_PATH";
pub const LOG_DIR_ENV: &str = "TASKFLOW_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "TASKFLOW_LOG_LEVEL";

const DEFAULT_DB_FILE_NAME: &str = "taskflow.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "taskflow-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let temp_dir = std::env::temp_dir();
        Self {
            db_path: temp_dir.join(DEFAULT_DB_FILE_NAME),
            log_dir: temp_dir.join(DEFAULT_LOG_DIR_NAME),
            log_level: default_log_level().to_string(),
        }
    }
}

impl CoreConfig {
    /// Reads `TASKFLOW_*` overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves overrides through `lookup`; used by tests to avoid
    /// mutating process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            log_dir: read(LOG_DIR_ENV).map_or(defaults.log_dir, PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
        }
    }

    /// Starts file logging with this configuration.
    pub fn init_logging(&self) -> Result<(), String> {
        let log_dir = self
            .log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: {}", self.log_dir.display()))?;
        init_logging(&self.log_level, log_dir)
    }

    /// Opens the SQLite-backed task store at `db_path`.
    pub fn open_store(&self) -> StorageResult<SqliteTaskStore> {
        SqliteTaskStore::open_sqlite(&self.db_path)
    }
}
