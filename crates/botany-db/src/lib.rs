//! # botany-db
//!
//! libSQL access to the shared `garden` table.
//!
//! The table is a secondary projection of each user's plant: the reconcile
//! engine treats it as optional, so [`GardenTable`] swallows every failure at
//! its boundary and an absent database file maps to the null object
//! (`Option::<GardenTable>::None`).
//!
//! Uses the `libsql` crate (C `SQLite` fork) in local-only mode.

pub mod error;
pub mod garden;
pub mod helpers;
mod migrations;

use std::path::Path;

use error::DatabaseError;
use libsql::Builder;

pub use garden::GardenTable;

/// Handle on the garden database.
pub struct GardenDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl GardenDb {
    /// Open a local database at the given path, or `":memory:"` for tests.
    ///
    /// Does not create the schema; see [`GardenDb::ensure_schema`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        Ok(Self { db, conn })
    }

    /// Open the database only if the file already exists.
    ///
    /// Returns `Ok(None)` for a missing file so callers fall back to the null
    /// table instead of creating an empty database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file exists but cannot be opened.
    pub async fn open_existing(path: &Path) -> Result<Option<Self>, DatabaseError> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "garden database not found");
            return Ok(None);
        }
        Self::open_local(&path.to_string_lossy()).await.map(Some)
    }

    /// Create the `garden` table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Migration` if the DDL fails.
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        self.run_migrations().await
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
