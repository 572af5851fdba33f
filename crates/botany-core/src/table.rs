//! The relational table as a soft dependency.
//!
//! The `garden` table is a cache of the authoritative plant, not a source of
//! truth. Implementations swallow their own failures: reads answer `None` and
//! writes log and carry on. `Option<T>` is the null object used when no table
//! is available at all.

use crate::entities::TableRow;

/// Capability interface over the shared `garden` table.
#[allow(async_fn_in_trait)]
pub trait TableStore {
    /// Most recently inserted row for `owner`, or `None` if unavailable.
    async fn read_latest(&self, owner: &str) -> Option<TableRow>;

    /// Set `is_dead` on every row for `owner`. No-op under dry-run.
    async fn update_is_dead(&self, owner: &str, dead: bool, dry_run: bool);

    /// Insert or replace the row keyed by `row.plant_id`. No-op under dry-run.
    async fn record(&self, row: &TableRow, dry_run: bool);
}

impl<T: TableStore> TableStore for Option<T> {
    async fn read_latest(&self, owner: &str) -> Option<TableRow> {
        match self {
            Some(table) => table.read_latest(owner).await,
            None => None,
        }
    }

    async fn update_is_dead(&self, owner: &str, dead: bool, dry_run: bool) {
        if let Some(table) = self {
            table.update_is_dead(owner, dead, dry_run).await;
        }
    }

    async fn record(&self, row: &TableRow, dry_run: bool) {
        if let Some(table) = self {
            table.record(row, dry_run).await;
        }
    }
}

impl<T: TableStore> TableStore for &T {
    async fn read_latest(&self, owner: &str) -> Option<TableRow> {
        (**self).read_latest(owner).await
    }

    async fn update_is_dead(&self, owner: &str, dead: bool, dry_run: bool) {
        (**self).update_is_dead(owner, dead, dry_run).await;
    }

    async fn record(&self, row: &TableRow, dry_run: bool) {
        (**self).record(row, dry_run).await;
    }
}
