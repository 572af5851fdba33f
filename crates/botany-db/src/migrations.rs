//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time. Migrations only run on the
//! write path: the garden table belongs to the game, and a read-only audit must
//! never create it.

use crate::GardenDb;
use crate::error::DatabaseError;

/// The `garden` table and its owner index.
const MIGRATION_001: &str = include_str!("../migrations/001_garden.sql");

impl GardenDb {
    /// Run all embedded migrations in sequence. Idempotent.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_garden: {e}")))?;
        Ok(())
    }
}
