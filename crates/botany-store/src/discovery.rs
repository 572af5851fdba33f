//! Which users to reconcile.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use botany_core::{StoreError, Username};

use crate::layout::{STATE_DIR, plant_file_matcher};

/// Every user under `home_prefix` with at least one `*_plant.dat` in their
/// state directory, sorted and de-duplicated.
///
/// Hidden directories are never users. Other names that are not safe
/// usernames are skipped with a warning. A missing home prefix yields no users.
///
/// # Errors
///
/// Returns `StoreError::Unavailable` if the home prefix exists but cannot be
/// listed.
pub fn discover_users(home_prefix: &Path) -> Result<Vec<Username>, StoreError> {
    let entries = match fs::read_dir(home_prefix) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(home = %home_prefix.display(), "home prefix does not exist");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(StoreError::Unavailable(format!(
                "cannot list {}: {e}",
                home_prefix.display()
            )));
        }
    };

    let matcher = plant_file_matcher()?;
    let mut users = BTreeSet::new();

    for entry in entries.filter_map(Result::ok) {
        if entry.file_name().as_encoded_bytes().starts_with(b".") {
            continue;
        }
        let state_dir = entry.path().join(STATE_DIR);
        let Ok(files) = fs::read_dir(&state_dir) else {
            continue;
        };
        let has_plant = files
            .filter_map(Result::ok)
            .any(|file| matcher.is_match(file.file_name()));
        if !has_plant {
            continue;
        }

        let name = entry.file_name();
        match name.to_str().map(Username::parse) {
            Some(Ok(user)) => {
                users.insert(user);
            }
            Some(Err(unsafe_name)) => {
                tracing::warn!(name = %unsafe_name.0, "skipping unsafe username");
            }
            None => {
                tracing::warn!(name = ?name, "skipping non-UTF-8 username");
            }
        }
    }

    Ok(users.into_iter().collect())
}

/// The users a run should visit: just `only` when given, otherwise every
/// discovered user.
///
/// An explicit user need not have a plant file yet, so the reinit path can
/// create one.
///
/// # Errors
///
/// Returns `StoreError::Other` if `only` is not a safe username, or the error
/// from [`discover_users`].
pub fn select_users(home_prefix: &Path, only: Option<&str>) -> Result<Vec<Username>, StoreError> {
    match only {
        Some(name) => {
            let user = Username::parse(name)
                .map_err(|e| StoreError::Other(anyhow::anyhow!("invalid --user: {e}")))?;
            Ok(vec![user])
        }
        None => discover_users(home_prefix),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn plant_file(home: &Path, user: &str, file: &str) {
        let dir = home.join(user).join(STATE_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), b"{}").unwrap();
    }

    fn names(users: &[Username]) -> Vec<&str> {
        users.iter().map(Username::as_str).collect()
    }

    #[test]
    fn finds_sorted_users_with_plant_files() {
        let home = tempfile::tempdir().unwrap();
        plant_file(home.path(), "carol", "carol_plant.dat");
        plant_file(home.path(), "alice", "alice_plant.dat");
        plant_file(home.path(), "bob", "old_plant.dat");
        plant_file(home.path(), "bob", "bob_plant.dat");
        plant_file(home.path(), "erin", "erin_plant_data.json");
        fs::create_dir_all(home.path().join("frank")).unwrap();

        let users = discover_users(home.path()).unwrap();
        assert_eq!(names(&users), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn skips_unsafe_names() {
        let home = tempfile::tempdir().unwrap();
        plant_file(home.path(), "alice", "alice_plant.dat");
        plant_file(home.path(), "bad name", "x_plant.dat");

        let users = discover_users(home.path()).unwrap();
        assert_eq!(names(&users), vec!["alice"]);
    }

    #[test]
    fn skips_hidden_directories() {
        let home = tempfile::tempdir().unwrap();
        plant_file(home.path(), "alice", "alice_plant.dat");
        plant_file(home.path(), ".cache", "x_plant.dat");
        plant_file(home.path(), ".bob", ".bob_plant.dat");

        let users = discover_users(home.path()).unwrap();
        assert_eq!(names(&users), vec!["alice"]);
    }

    #[test]
    fn missing_home_is_empty() {
        let users = discover_users(Path::new("/nonexistent/botany/home")).unwrap();
        assert!(users.is_empty());
    }

    #[test]
    fn explicit_user_needs_no_plant_file() {
        let home = tempfile::tempdir().unwrap();
        let users = select_users(home.path(), Some("dave")).unwrap();
        assert_eq!(names(&users), vec!["dave"]);
    }

    #[test]
    fn explicit_user_must_be_safe() {
        let home = tempfile::tempdir().unwrap();
        assert!(select_users(home.path(), Some("../etc")).is_err());
        assert!(select_users(home.path(), Some("..")).is_err());
    }
}
