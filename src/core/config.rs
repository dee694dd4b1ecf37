//! Project configuration loaded from `.seatalloc/config.toml`.
//!
//! Every key is optional; a missing file yields the defaults.

use crate::core::db::DEFAULT_BUSY_TIMEOUT_SECS;
use crate::core::error::SeatAllocError;
use crate::core::store::{PROJECT_DIR_NAME, Store};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Overrides `[store].root` when set.
pub const STORE_ROOT_ENV: &str = "SEATALLOC_HOME";
pub const DEFAULT_LOG_FILTER: &str = "seatalloc=info";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Store directory; relative paths resolve against the project directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_secs: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: None,
            busy_timeout_secs: DEFAULT_BUSY_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_busy_timeout() -> u32 {
    DEFAULT_BUSY_TIMEOUT_SECS
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

pub fn config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Load `<project_dir>/.seatalloc/config.toml`, or defaults when absent.
pub fn load_config(project_dir: &Path) -> Result<Config, SeatAllocError> {
    let path = config_path(project_dir);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&content)
        .map_err(|e| SeatAllocError::ConfigError(format!("{}: {}", path.display(), e)))?;
    if config.store.busy_timeout_secs == 0 {
        return Err(SeatAllocError::ConfigError(format!(
            "{}: store.busy_timeout_secs must be at least 1",
            path.display()
        )));
    }
    Ok(config)
}

impl Config {
    /// Resolve the store: explicit override, then `SEATALLOC_HOME`, then the
    /// configured root, then `<project_dir>/.seatalloc/data`.
    pub fn resolve_store(&self, project_dir: &Path, root_override: Option<&Path>) -> Store {
        let from_env = std::env::var_os(STORE_ROOT_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let chosen = root_override
            .map(Path::to_path_buf)
            .or(from_env)
            .or_else(|| self.store.root.clone());
        match chosen {
            Some(root) if root.is_absolute() => Store::new(root),
            Some(root) => Store::new(project_dir.join(root)),
            None => Store::for_project(project_dir),
        }
    }
}
