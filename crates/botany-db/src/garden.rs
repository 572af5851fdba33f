//! The `garden` table as a [`TableStore`].
//!
//! Fallible inherent methods do the SQL; the trait implementation wraps them
//! and logs failures instead of propagating them.

use botany_core::entities::TableRow;
use botany_core::table::TableStore;

use crate::GardenDb;
use crate::error::DatabaseError;
use crate::helpers::{value_to_bool, value_to_i64, value_to_opt_string};

/// Shared garden table backed by libSQL.
pub struct GardenTable {
    db: GardenDb,
}

impl GardenTable {
    #[must_use]
    pub const fn new(db: GardenDb) -> Self {
        Self { db }
    }

    #[must_use]
    pub const fn db(&self) -> &GardenDb {
        &self.db
    }

    /// The owner's most recently inserted row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the table is missing or the query fails.
    pub async fn latest_row(&self, owner: &str) -> Result<Option<TableRow>, DatabaseError> {
        let mut rows = self
            .db
            .conn()
            .query(
                "SELECT plant_id, owner, description, age, score, is_dead
                 FROM garden WHERE owner = ?1
                 ORDER BY rowid DESC LIMIT 1",
                [owner],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        Ok(Some(TableRow {
            plant_id: value_to_opt_string(&row.get_value(0)?).unwrap_or_default(),
            owner: value_to_opt_string(&row.get_value(1)?).unwrap_or_default(),
            description: value_to_opt_string(&row.get_value(2)?).unwrap_or_default(),
            age: value_to_opt_string(&row.get_value(3)?),
            score: value_to_i64(&row.get_value(4)?),
            is_dead: value_to_bool(&row.get_value(5)?)?,
        }))
    }

    /// Set `is_dead` on all of the owner's rows. Returns the number of rows touched.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the table is missing or the update fails.
    pub async fn set_is_dead(&self, owner: &str, dead: bool) -> Result<u64, DatabaseError> {
        let params: Vec<libsql::Value> = vec![
            libsql::Value::Integer(i64::from(dead)),
            libsql::Value::Text(owner.to_string()),
        ];
        let changed = self
            .db
            .conn()
            .execute(
                "UPDATE garden SET is_dead = ?1 WHERE owner = ?2",
                libsql::params_from_iter(params),
            )
            .await?;
        Ok(changed)
    }

    /// Insert or replace the row keyed by `plant_id`, creating the table if needed.
    ///
    /// A replaced row is re-inserted with a new rowid, so it becomes the
    /// owner's latest row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the schema cannot be created or the insert fails.
    pub async fn upsert(&self, row: &TableRow) -> Result<(), DatabaseError> {
        self.db.ensure_schema().await?;

        let params: Vec<libsql::Value> = vec![
            libsql::Value::Text(row.plant_id.clone()),
            libsql::Value::Text(row.owner.clone()),
            libsql::Value::Text(row.description.clone()),
            row.age
                .clone()
                .map_or(libsql::Value::Null, libsql::Value::Text),
            libsql::Value::Integer(row.score),
            libsql::Value::Integer(i64::from(row.is_dead)),
        ];
        self.db
            .conn()
            .execute(
                "INSERT OR REPLACE INTO garden (plant_id, owner, description, age, score, is_dead)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params_from_iter(params),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("upsert garden row: {e}")))?;
        Ok(())
    }
}

impl TableStore for GardenTable {
    async fn read_latest(&self, owner: &str) -> Option<TableRow> {
        match self.latest_row(owner).await {
            Ok(row) => row,
            Err(error) => {
                tracing::debug!(owner, %error, "garden read failed; treating table as absent");
                None
            }
        }
    }

    async fn update_is_dead(&self, owner: &str, dead: bool, dry_run: bool) {
        if dry_run {
            return;
        }
        match self.set_is_dead(owner, dead).await {
            Ok(changed) => tracing::debug!(owner, dead, changed, "garden is_dead updated"),
            Err(error) => tracing::debug!(owner, %error, "garden is_dead update failed; ignored"),
        }
    }

    async fn record(&self, row: &TableRow, dry_run: bool) {
        if dry_run {
            return;
        }
        if let Err(error) = self.upsert(row).await {
            tracing::debug!(owner = %row.owner, %error, "garden upsert failed; ignored");
        }
    }
}
