#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use botany_core::table::TableStore;
use botany_core::{FixedClock, Username};
use botany_db::{GardenDb, GardenTable};
use botany_reconcile::{ConsistencyAuditor, ReconcileEngine};
use botany_store::HomeLayout;
use serde_json::{Value, json};
use tempfile::TempDir;

pub const NOW: i64 = 1_700_000_000;
pub const HOUR: i64 = 3_600;

/// A throwaway home prefix with a pinned clock.
pub struct Garden {
    pub home: TempDir,
    pub layout: HomeLayout,
    pub clock: Arc<FixedClock>,
}

impl Garden {
    pub fn new() -> Self {
        let home = tempfile::tempdir().unwrap();
        let layout = HomeLayout::new(home.path());
        Self {
            home,
            layout,
            clock: Arc::new(FixedClock::at(NOW)),
        }
    }

    pub fn engine<T: TableStore>(&self, table: T) -> ReconcileEngine<T> {
        ReconcileEngine::new(self.layout.clone(), table, self.clock.clone()).unwrap()
    }

    pub fn auditor<T: TableStore>(&self, table: T) -> ConsistencyAuditor<T> {
        ConsistencyAuditor::new(self.layout.clone(), table, self.clock.clone()).unwrap()
    }

    pub fn state_dir(&self, user: &Username) -> PathBuf {
        let dir = self.layout.state_dir(user);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn plant_path(&self, user: &Username) -> PathBuf {
        self.layout.canonical_plant_path(user)
    }

    pub fn write_plant(&self, user: &Username, value: &Value) -> PathBuf {
        self.write_plant_bytes(user, value.to_string().as_bytes())
    }

    pub fn write_plant_bytes(&self, user: &Username, bytes: &[u8]) -> PathBuf {
        self.state_dir(user);
        let path = self.plant_path(user);
        fs::write(&path, bytes).unwrap();
        path
    }

    pub fn read_plant(&self, user: &Username) -> Value {
        serde_json::from_slice(&fs::read(self.plant_path(user)).unwrap()).unwrap()
    }

    pub fn write_mirror(&self, user: &Username, value: &Value) {
        self.state_dir(user);
        fs::write(self.layout.mirror_path(user), value.to_string()).unwrap();
    }

    pub fn read_mirror(&self, user: &Username) -> Option<Value> {
        let bytes = fs::read(self.layout.mirror_path(user)).ok()?;
        Some(serde_json::from_slice(&bytes).unwrap())
    }

    /// Every file under the home prefix with its contents.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        collect(self.home.path(), &mut files);
        files
    }

    pub fn files_in(&self, user: &Username) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.layout.state_dir(user))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn collect(dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(&path, files);
        } else {
            files.insert(path.clone(), fs::read(&path).unwrap());
        }
    }
}

pub fn user(name: &str) -> Username {
    Username::parse(name).unwrap()
}

/// A healthy plant watered an hour ago and last loaded ten minutes ago.
pub fn plant_json(owner: &str) -> Value {
    json!({
        "plant_id": format!("{owner}-01"),
        "owner": owner,
        "species": "fern",
        "stage": 0,
        "generation": 1,
        "dead": false,
        "watered_timestamp": NOW - HOUR,
        "ticks": 0.0,
        "start_time": NOW - 2 * HOUR,
        "last_time": NOW - 600,
    })
}

/// A garden table with the schema in place.
pub async fn garden_table() -> GardenTable {
    let db = GardenDb::open_local(":memory:").await.unwrap();
    db.ensure_schema().await.unwrap();
    GardenTable::new(db)
}

/// A garden database file that exists but has no table yet.
pub async fn bare_table() -> GardenTable {
    GardenTable::new(GardenDb::open_local(":memory:").await.unwrap())
}

pub async fn has_garden_schema(table: &GardenTable) -> bool {
    let mut rows = table
        .db()
        .conn()
        .query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name='garden'",
            (),
        )
        .await
        .unwrap();
    rows.next().await.unwrap().is_some()
}

pub async fn row_count(table: &GardenTable, owner: &str) -> i64 {
    let mut rows = table
        .db()
        .conn()
        .query("SELECT COUNT(*) FROM garden WHERE owner = ?1", [owner])
        .await
        .unwrap();
    let row = rows.next().await.unwrap().unwrap();
    row.get::<i64>(0).unwrap()
}
