//! The authoritative plant file.
//!
//! Loading is not pure: the plant's own checks run during [`PlantStore::load`]
//! and may change fields relative to what is on disk. [`LoadedPlant`] carries
//! the on-disk snapshot and the transitions applied so callers can report the
//! difference.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use botany_core::entities::{Plant, PlantSnapshot, Transition};
use botany_core::{StoreError, Username};
use globset::GlobMatcher;

use crate::atomic::write_atomic;
use crate::layout::{HomeLayout, plant_file_matcher};

/// A plant as loaded, with what its load-time checks changed.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPlant {
    pub path: PathBuf,
    pub plant: Plant,
    /// State as decoded from disk, before load-time checks.
    pub on_disk: PlantSnapshot,
    pub transitions: Vec<Transition>,
}

/// Reads and writes `*_plant.dat` files.
#[derive(Debug, Clone)]
pub struct PlantStore {
    layout: HomeLayout,
    matcher: GlobMatcher,
}

impl PlantStore {
    /// # Errors
    ///
    /// Returns `StoreError::Other` if the plant file pattern fails to compile.
    pub fn new(layout: HomeLayout) -> Result<Self, StoreError> {
        Ok(Self {
            layout,
            matcher: plant_file_matcher()?,
        })
    }

    #[must_use]
    pub const fn layout(&self) -> &HomeLayout {
        &self.layout
    }

    /// Find the user's plant file.
    ///
    /// Prefers `<user>_plant.dat`; otherwise takes the most recently modified
    /// `*_plant.dat` so renamed or legacy files still reconcile.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the state directory is missing or holds no plant file
    /// - `Unavailable` if the home prefix is missing or the state directory
    ///   cannot be listed
    pub fn locate(&self, user: &Username) -> Result<PathBuf, StoreError> {
        let home = self.layout.home_prefix();
        if !home.is_dir() {
            return Err(StoreError::Unavailable(format!(
                "home prefix {} is not a directory",
                home.display()
            )));
        }

        let dir = self.layout.state_dir(user);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound { dir });
            }
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "cannot list {}: {e}",
                    dir.display()
                )));
            }
        };

        let candidates: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter(|entry| self.matcher.is_match(entry.file_name()))
            .map(|entry| entry.path())
            .collect();

        let canonical = self.layout.canonical_plant_path(user);
        if candidates.contains(&canonical) {
            return Ok(canonical);
        }

        candidates
            .into_iter()
            .max_by_key(|path| modified_at(path))
            .ok_or(StoreError::NotFound { dir })
    }

    /// Decode a plant file and run its load-time checks as of `now`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file vanished
    /// - `Corrupt` if it is empty, not a plant, or structurally invalid
    /// - `Io` for any other read failure
    pub fn load(&self, path: &Path, now: i64) -> Result<LoadedPlant, StoreError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound {
                dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            },
            _ => StoreError::io(path, e),
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(corrupt(path, "empty file"));
        }

        let mut plant: Plant =
            serde_json::from_slice(&bytes).map_err(|e| corrupt(path, e.to_string()))?;
        plant.validate().map_err(|reason| corrupt(path, reason))?;

        let on_disk = plant.snapshot();
        let transitions = plant.apply_load_checks(now);
        if !transitions.is_empty() {
            tracing::debug!(path = %path.display(), ?transitions, "load-time checks changed plant");
        }

        Ok(LoadedPlant {
            path: path.to_path_buf(),
            plant,
            on_disk,
            transitions,
        })
    }

    /// `locate` followed by `load`.
    ///
    /// # Errors
    ///
    /// See [`PlantStore::locate`] and [`PlantStore::load`].
    pub fn locate_and_load(&self, user: &Username, now: i64) -> Result<LoadedPlant, StoreError> {
        let path = self.locate(user)?;
        self.load(&path, now)
    }

    /// Persist a plant atomically.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be written.
    pub fn save(&self, path: &Path, plant: &Plant) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(plant).map_err(|e| StoreError::Other(e.into()))?;
        write_atomic(path, &bytes).map_err(|e| StoreError::io(path, e))
    }

    /// A new seed for `user` with a random plant id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Other` if the system random source fails.
    pub fn fresh_plant(&self, user: &Username, now: i64) -> Result<Plant, StoreError> {
        let mut id = [0u8; 4];
        getrandom::fill(&mut id)
            .map_err(|e| StoreError::Other(anyhow::anyhow!("random plant id: {e}")))?;
        let plant_id = id.iter().map(|b| format!("{b:02x}")).collect::<String>();
        Ok(Plant::fresh(user.as_str(), plant_id, now))
    }
}

fn corrupt(path: &Path, reason: impl Into<String>) -> StoreError {
    StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn modified_at(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}
