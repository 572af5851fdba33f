//! Read-only comparison of the page view against the live plant.

use std::sync::Arc;

use botany_core::audit::{AuditRecord, AuditReport, LiveView, PageSource, PageView};
use botany_core::entities::{MirrorDocument, TableRow};
use botany_core::outcome::Failure;
use botany_core::table::TableStore;
use botany_core::{Clock, ReconcileOptions, StoreError, Username};
use botany_store::{HomeLayout, MirrorStore, PlantStore};

/// A secondary store the page view can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageProvider {
    Mirror,
    Table,
}

/// Tried in order; the first provider with data wins.
pub const PAGE_PROVIDERS: [PageProvider; 2] = [PageProvider::Mirror, PageProvider::Table];

pub struct ConsistencyAuditor<T> {
    plants: PlantStore,
    mirror: MirrorStore,
    table: T,
    clock: Arc<dyn Clock>,
}

impl<T: TableStore> ConsistencyAuditor<T> {
    /// # Errors
    ///
    /// Returns `StoreError` if the plant store cannot be set up.
    pub fn new(layout: HomeLayout, table: T, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        Ok(Self {
            plants: PlantStore::new(layout.clone())?,
            mirror: MirrorStore::new(layout),
            table,
            clock,
        })
    }

    /// Audit every user in order.
    pub async fn audit_all(&self, users: &[Username], options: &ReconcileOptions) -> AuditReport {
        let mut records = Vec::with_capacity(users.len());
        for user in users {
            let record = self.audit(user, options).await;
            if record.mismatch {
                tracing::warn!(user = %user, "page view disagrees with plant");
            }
            records.push(record);
        }
        AuditReport {
            water_interval_hours: options.water_interval_hours,
            records,
        }
    }

    /// Build both projections for one user and compare them. Writes nothing.
    pub async fn audit(&self, user: &Username, options: &ReconcileOptions) -> AuditRecord {
        let now = self.clock.now();
        let page = self.page_view(user, options, now).await;
        let live = self.live_view(user, now);
        AuditRecord::new(user.clone(), page, live, now)
    }

    async fn page_view(&self, user: &Username, options: &ReconcileOptions, now: i64) -> PageView {
        for provider in PAGE_PROVIDERS {
            let view = match provider {
                PageProvider::Mirror => self
                    .mirror
                    .read(user)
                    .map(|doc| mirror_page(&doc, options, now)),
                PageProvider::Table => self
                    .table
                    .read_latest(user.as_str())
                    .await
                    .map(|row| table_page(&row)),
            };
            if let Some(view) = view {
                return view;
            }
        }
        PageView::default()
    }

    /// The plant as a fresh load would see it, without saving.
    fn live_view(&self, user: &Username, now: i64) -> LiveView {
        match self.plants.locate_and_load(user, now) {
            Ok(loaded) => LiveView {
                ok: true,
                dead: Some(loaded.plant.dead),
                last_watered: loaded.plant.watered_timestamp,
                error: None,
            },
            Err(error) => {
                tracing::debug!(user = %user, %error, "live load failed during audit");
                LiveView {
                    ok: false,
                    error: Some(Failure::from(&error)),
                    ..LiveView::default()
                }
            }
        }
    }
}

fn mirror_page(doc: &MirrorDocument, options: &ReconcileOptions, now: i64) -> PageView {
    let is_dead = doc.is_dead();
    let last_watered = doc.last_watered();
    PageView {
        source: PageSource::Json,
        is_dead,
        alive: is_dead.map(|dead| !dead),
        thirsty: Some(
            last_watered.is_some_and(|ts| now.saturating_sub(ts) >= options.water_interval_secs()),
        ),
        last_watered,
        age: doc.age(),
        score: doc.score(),
    }
}

// The table has no watering timestamp, so thirst is unknown.
fn table_page(row: &TableRow) -> PageView {
    PageView {
        source: PageSource::Db,
        is_dead: Some(row.is_dead),
        alive: Some(!row.is_dead),
        thirsty: None,
        last_watered: None,
        age: row.age.clone(),
        score: Some(row.score),
    }
}
