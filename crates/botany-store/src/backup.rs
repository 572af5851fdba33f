//! Timestamped copies taken before a file is replaced.

use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};

use botany_core::StoreError;
use chrono::{DateTime, Local};

/// Suffix marker for backups of corrupt plant files.
pub const BACKUP_MARKER: &str = ".corrupt-";

const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Clone, Copy, Default)]
pub struct BackupService;

impl BackupService {
    /// Copy `path` to `<path>.corrupt-YYYYMMDDhhmmss` (local time of `now`),
    /// keeping the original's access and modification times.
    ///
    /// Returns `Ok(None)` if there is nothing to back up.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the copy cannot be made. Callers must not
    /// overwrite the original in that case.
    pub fn snapshot(&self, path: &Path, now: i64) -> Result<Option<PathBuf>, StoreError> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let backup = backup_path(path, now);
        fs::copy(path, &backup).map_err(|e| StoreError::io(&backup, e))?;

        let mut times = FileTimes::new();
        if let Ok(modified) = metadata.modified() {
            times = times.set_modified(modified);
        }
        if let Ok(accessed) = metadata.accessed() {
            times = times.set_accessed(accessed);
        }
        if let Err(error) = File::options()
            .write(true)
            .open(&backup)
            .and_then(|file| file.set_times(times))
        {
            tracing::debug!(backup = %backup.display(), %error, "could not preserve backup timestamps");
        }

        tracing::info!(source = %path.display(), backup = %backup.display(), "backed up plant file");
        Ok(Some(backup))
    }
}

fn backup_path(path: &Path, now: i64) -> PathBuf {
    let stamp = DateTime::from_timestamp(now, 0)
        .map(|utc| utc.with_timezone(&Local).format(STAMP_FORMAT).to_string())
        .unwrap_or_else(|| now.to_string());
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_MARKER);
    name.push(stamp);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn copies_with_stamped_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("alice_plant.dat");
        fs::write(&source, b"garbage").unwrap();

        let backup = BackupService.snapshot(&source, NOW).unwrap().unwrap();

        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("alice_plant.dat.corrupt-"), "{name}");
        assert_eq!(name.len(), "alice_plant.dat.corrupt-".len() + 14);
        assert_eq!(fs::read(&backup).unwrap(), b"garbage");
        assert_eq!(fs::read(&source).unwrap(), b"garbage");
    }

    #[test]
    fn preserves_modification_time() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("alice_plant.dat");
        fs::write(&source, b"garbage").unwrap();
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(old)
            .unwrap();

        let backup = BackupService.snapshot(&source, NOW).unwrap().unwrap();
        assert_eq!(fs::metadata(&backup).unwrap().modified().unwrap(), old);
    }

    #[test]
    fn missing_source_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("nobody_plant.dat");
        assert!(BackupService.snapshot(&source, NOW).unwrap().is_none());
    }
}
