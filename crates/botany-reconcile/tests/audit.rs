//! Auditor projections and mismatch detection.

mod common;

use botany_core::audit::PageSource;
use botany_core::entities::TableRow;
use botany_core::table::TableStore;
use botany_core::{FailureKind, ReconcileOptions};
use botany_db::GardenTable;
use common::{Garden, HOUR, NOW, garden_table, plant_json, user};
use pretty_assertions::assert_eq;
use serde_json::json;

fn options() -> ReconcileOptions {
    ReconcileOptions::default()
}

#[tokio::test]
async fn live_dead_against_alive_mirror_is_a_mismatch() {
    let garden = Garden::new();
    let alice = user("alice");
    let mut plant = plant_json("alice");
    plant["dead"] = json!(true);
    garden.write_plant(&alice, &plant);
    garden.write_mirror(&alice, &json!({"is_dead": 0, "last_watered": NOW - HOUR}));

    let record = garden
        .auditor(Option::<GardenTable>::None)
        .audit(&alice, &options())
        .await;

    assert!(record.mismatch);
    assert_eq!(record.page.alive, Some(true));
    assert_eq!(record.live.dead, Some(true));
    assert_eq!(record.note().as_deref(), Some("MISMATCH: page vs plant"));
}

#[tokio::test]
async fn live_alive_against_dead_mirror_is_a_mismatch() {
    let garden = Garden::new();
    let alice = user("alice");
    garden.write_plant(&alice, &plant_json("alice"));
    garden.write_mirror(&alice, &json!({"is_dead": 1}));

    let record = garden
        .auditor(Option::<GardenTable>::None)
        .audit(&alice, &options())
        .await;

    assert!(record.mismatch);
}

#[tokio::test]
async fn load_failure_is_not_a_mismatch() {
    let garden = Garden::new();
    let alice = user("alice");
    garden.write_mirror(&alice, &json!({"is_dead": 0, "last_watered": NOW - HOUR}));

    let record = garden
        .auditor(Option::<GardenTable>::None)
        .audit(&alice, &options())
        .await;

    assert!(!record.mismatch);
    assert!(!record.live.ok);
    assert_eq!(record.live.dead, None);
    assert_eq!(record.live.error.as_ref().unwrap().kind, FailureKind::NotFound);
    assert!(
        record
            .note()
            .unwrap()
            .starts_with("plant load error: not_found"),
    );
}

#[tokio::test]
async fn mirror_wins_over_table() {
    let garden = Garden::new();
    let bob = user("bob");
    garden.write_mirror(&bob, &json!({"is_dead": 0, "last_watered": NOW - HOUR}));
    let table = garden_table().await;
    table
        .record(
            &TableRow {
                plant_id: "b1".into(),
                owner: "bob".into(),
                description: "dead fern".into(),
                age: None,
                score: 3,
                is_dead: true,
            },
            false,
        )
        .await;

    let record = garden.auditor(&table).audit(&bob, &options()).await;

    assert_eq!(record.page.source, PageSource::Json);
    assert_eq!(record.page.alive, Some(true));
    assert_eq!(record.page.thirsty, Some(false));
}

#[tokio::test]
async fn empty_mirror_falls_through_to_table() {
    let garden = Garden::new();
    let bob = user("bob");
    garden.write_plant(&bob, &plant_json("bob"));
    garden.write_mirror(&bob, &json!({}));
    let table = garden_table().await;
    table
        .record(
            &TableRow {
                plant_id: "b1".into(),
                owner: "bob".into(),
                description: "dead fern".into(),
                age: None,
                score: 3,
                is_dead: true,
            },
            false,
        )
        .await;

    let record = garden.auditor(&table).audit(&bob, &options()).await;

    assert_eq!(record.page.source, PageSource::Db);
    assert_eq!(record.page.alive, Some(false));
    assert!(record.mismatch);
}

#[tokio::test]
async fn malformed_mirror_timestamps_read_as_absent() {
    let garden = Garden::new();
    let alice = user("alice");
    garden.write_plant(&alice, &plant_json("alice"));
    let auditor = garden.auditor(Option::<GardenTable>::None);

    for last_watered in [json!(i64::MIN), json!(-5), json!(1.7e9)] {
        garden.write_mirror(&alice, &json!({"is_dead": 0, "last_watered": last_watered}));
        let record = auditor.audit(&alice, &options()).await;

        assert_eq!(record.page.source, PageSource::Json, "{last_watered}");
        assert_eq!(record.page.last_watered, None, "{last_watered}");
        assert_eq!(record.page.thirsty, Some(false), "{last_watered}");
        assert_eq!(record.page_last_watered_ago, None, "{last_watered}");
        assert!(!record.mismatch, "{last_watered}");
    }
}

#[tokio::test]
async fn extreme_plant_timestamp_is_a_load_error() {
    let garden = Garden::new();
    let alice = user("alice");
    let mut plant = plant_json("alice");
    plant["last_time"] = json!(i64::MIN);
    garden.write_plant(&alice, &plant);
    garden.write_mirror(&alice, &json!({"is_dead": 0, "last_watered": NOW - HOUR}));

    let record = garden
        .auditor(Option::<GardenTable>::None)
        .audit(&alice, &options())
        .await;

    assert!(!record.live.ok);
    assert_eq!(
        record.live.error.as_ref().map(|failure| failure.kind),
        Some(FailureKind::Corrupt)
    );
    assert!(!record.mismatch);
}

#[tokio::test]
async fn no_source_leaves_page_undetermined() {
    let garden = Garden::new();
    let zoe = user("zoe");
    garden.write_plant(&zoe, &plant_json("zoe"));

    let record = garden.auditor(garden_table().await).audit(&zoe, &options()).await;

    assert_eq!(record.page.source, PageSource::None);
    assert_eq!(record.page.alive, None);
    assert_eq!(record.page.thirsty, None);
    assert_eq!(record.page_last_watered_ago, None);
    assert!(!record.mismatch);
    assert_eq!(record.live.dead, Some(false));
    assert_eq!(record.plant_last_watered_ago.as_deref(), Some("1h 0m ago"));
}

#[tokio::test]
async fn audit_never_writes() {
    let garden = Garden::new();
    let alice = user("alice");
    garden.write_plant(&alice, &plant_json("alice"));
    garden.write_mirror(&alice, &json!({"is_dead": 0, "last_watered": NOW - HOUR}));
    let before = garden.snapshot();

    let record = garden
        .auditor(Option::<GardenTable>::None)
        .audit(&alice, &options())
        .await;

    assert!(record.live.ok);
    assert_eq!(garden.snapshot(), before);
}

#[tokio::test]
async fn reconciled_users_audit_clean() {
    let garden = Garden::new();
    let users = vec![user("alice"), user("bob")];
    for who in &users {
        garden.write_plant(who, &plant_json(who.as_str()));
        garden.write_mirror(who, &json!({"is_dead": 1}));
    }
    let table = garden_table().await;

    let before = garden.auditor(&table).audit_all(&users, &options()).await;
    assert!(before.has_mismatch());

    garden.engine(&table).run(&users, &options()).await;

    let after = garden.auditor(&table).audit_all(&users, &options()).await;
    assert!(!after.has_mismatch());
    assert_eq!(after.water_interval_hours, 18);
    assert_eq!(after.records.len(), 2);
}
