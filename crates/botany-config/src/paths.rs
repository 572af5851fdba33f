//! Filesystem and database locations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn default_home_prefix() -> PathBuf {
    PathBuf::from("/home")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("/srv/botany/sqlite/garden_db.sqlite")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Root holding one directory per user, each with a `.botany/` state dir.
    #[serde(default = "default_home_prefix")]
    pub home_prefix: PathBuf,

    /// Shared garden SQLite database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl PathsConfig {
    /// Home prefix without trailing separators (`/home/` and `/home` are the same root).
    #[must_use]
    pub fn normalized_home_prefix(&self) -> PathBuf {
        self.home_prefix.components().collect()
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            home_prefix: default_home_prefix(),
            db_path: default_db_path(),
        }
    }
}
