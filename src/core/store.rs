//! Store abstraction for seat allotment state.
//!
//! A store is a directory holding the seat database. Every command resolves one
//! store before touching state.

use crate::core::schemas;
use std::path::{Path, PathBuf};

/// Directory name created inside a project for local state and config.
pub const PROJECT_DIR_NAME: &str = ".seatalloc";

/// Store handle representing a seat allotment workspace.
#[derive(Debug, Clone)]
pub struct Store {
    /// Absolute path to the store root directory
    pub root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default store location for a project directory: `<dir>/.seatalloc/data`.
    pub fn for_project(project_dir: &Path) -> Self {
        Self::new(project_dir.join(PROJECT_DIR_NAME).join("data"))
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(schemas::SEATS_DB_NAME)
    }
}
