//! Per-user file layout under the home prefix.

use std::path::{Path, PathBuf};

use botany_core::{StoreError, Username};
use globset::{Glob, GlobMatcher};

/// Name of the per-user state directory.
pub const STATE_DIR: &str = ".botany";

/// Suffix shared by all primary plant files.
pub const PLANT_SUFFIX: &str = "_plant.dat";

/// Suffix of the JSON mirror document.
pub const MIRROR_SUFFIX: &str = "_plant_data.json";

const PLANT_FILE_GLOB: &str = "*_plant.dat";

/// Resolves where each user's plant files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeLayout {
    home_prefix: PathBuf,
}

impl HomeLayout {
    pub fn new(home_prefix: impl Into<PathBuf>) -> Self {
        Self {
            home_prefix: home_prefix.into(),
        }
    }

    #[must_use]
    pub fn home_prefix(&self) -> &Path {
        &self.home_prefix
    }

    /// `<home>/<user>/.botany`
    #[must_use]
    pub fn state_dir(&self, user: &Username) -> PathBuf {
        self.home_prefix.join(user.as_str()).join(STATE_DIR)
    }

    /// `<home>/<user>/.botany/<user>_plant.dat`
    #[must_use]
    pub fn canonical_plant_path(&self, user: &Username) -> PathBuf {
        self.state_dir(user).join(format!("{user}{PLANT_SUFFIX}"))
    }

    /// `<home>/<user>/.botany/<user>_plant_data.json`
    #[must_use]
    pub fn mirror_path(&self, user: &Username) -> PathBuf {
        self.state_dir(user).join(format!("{user}{MIRROR_SUFFIX}"))
    }
}

/// Matcher for primary plant file names (`*_plant.dat`).
///
/// # Errors
///
/// Returns `StoreError::Other` if the pattern fails to compile.
pub fn plant_file_matcher() -> Result<GlobMatcher, StoreError> {
    Glob::new(PLANT_FILE_GLOB)
        .map(|glob| glob.compile_matcher())
        .map_err(|e| StoreError::Other(e.into()))
}
