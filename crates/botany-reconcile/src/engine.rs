//! The per-user reconciliation state machine.
//!
//! A user first goes through the normal path: load the plant, then rewrite
//! all three stores from it. Only `NotFound`, `Corrupt`, and `Unavailable`
//! failures enter recovery, which either reinitializes the plant (behind
//! `reinit_corrupt`, always after a backup) or falls back to marking the
//! mirror and table dead once the last watering is old enough. Any other
//! failure is an error and is left alone.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use botany_core::entities::{Plant, TableRow};
use botany_core::outcome::{Failure, Outcome, OutcomeStatus, RunSummary};
use botany_core::table::TableStore;
use botany_core::{Clock, ReconcileOptions, StoreError, Username};
use botany_store::{BackupService, HomeLayout, MirrorStore, PlantStore};
use serde::Serialize;

/// Everything a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub outcomes: Vec<Outcome>,
}

pub struct ReconcileEngine<T> {
    plants: PlantStore,
    mirror: MirrorStore,
    table: T,
    backup: BackupService,
    clock: Arc<dyn Clock>,
}

impl<T: TableStore> ReconcileEngine<T> {
    /// # Errors
    ///
    /// Returns `StoreError` if the plant store cannot be set up.
    pub fn new(layout: HomeLayout, table: T, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        Ok(Self {
            plants: PlantStore::new(layout.clone())?,
            mirror: MirrorStore::new(layout),
            table,
            backup: BackupService,
            clock,
        })
    }

    #[must_use]
    pub const fn table(&self) -> &T {
        &self.table
    }

    /// Reconcile every user in order and fold the outcomes into a summary.
    ///
    /// A failing user never stops the batch.
    pub async fn run(&self, users: &[Username], options: &ReconcileOptions) -> RunReport {
        if users.is_empty() {
            tracing::info!("No users with plants found.");
            return RunReport::default();
        }

        tracing::info!(
            "Reconciling {} users (dry_run={}, threshold={}h)",
            users.len(),
            options.dry_run,
            options.dead_after_hours
        );

        let mut outcomes = Vec::with_capacity(users.len());
        for user in users {
            let outcome = self.reconcile(user, options).await;
            tracing::info!(
                user = %outcome.user,
                status = outcome.status.as_str(),
                detail = %outcome.detail,
                "reconciled"
            );
            outcomes.push(outcome);
        }

        let summary = outcomes
            .iter()
            .fold(RunSummary::default(), RunSummary::record);
        tracing::info!(
            "Done. processed={} fixed={} errors={} dry_run={}",
            summary.processed,
            summary.fixed,
            summary.errors,
            options.dry_run
        );

        RunReport { summary, outcomes }
    }

    /// Bring one user's stores in line with the plant file, or recover.
    pub async fn reconcile(&self, user: &Username, options: &ReconcileOptions) -> Outcome {
        let now = self.clock.now();
        match self.reconcile_normal(user, options, now).await {
            Ok(outcome) => outcome,
            Err(error) if error.kind().is_recoverable() => {
                tracing::warn!(
                    user = %user,
                    kind = %error.kind(),
                    %error,
                    "plant unreadable; entering recovery"
                );
                let failure = Failure::from(&error);
                let outcome = if options.reinit_corrupt {
                    self.reinit(user, &error, options, now).await
                } else {
                    self.fallback(user, options, now).await
                };
                outcome.triggered_by(failure)
            }
            Err(error) => {
                tracing::error!(
                    user = %user,
                    kind = %error.kind(),
                    %error,
                    "unclassified failure; not repairing"
                );
                Outcome::new(
                    user.clone(),
                    OutcomeStatus::Error,
                    error.to_string(),
                    options.dry_run,
                )
                .triggered_by(Failure::from(&error))
            }
        }
    }

    async fn reconcile_normal(
        &self,
        user: &Username,
        options: &ReconcileOptions,
        now: i64,
    ) -> Result<Outcome, StoreError> {
        let loaded = self.plants.locate_and_load(user, now)?;

        if !options.dry_run {
            self.persist(user, &loaded.path, &loaded.plant, now).await?;
        }

        let after = loaded.plant.snapshot();
        let status = if loaded.on_disk == after {
            OutcomeStatus::Unchanged
        } else {
            OutcomeStatus::Updated
        };
        Ok(Outcome::new(
            user.clone(),
            status,
            loaded.on_disk.describe_change(&after),
            options.dry_run,
        ))
    }

    /// Write the plant file, then the mirror and table derived from it.
    ///
    /// Only the plant file write can fail; the secondary stores are best-effort.
    async fn persist(
        &self,
        user: &Username,
        path: &Path,
        plant: &Plant,
        now: i64,
    ) -> Result<(), StoreError> {
        self.plants.save(path, plant)?;

        let mut doc = self.mirror.read(user).unwrap_or_default();
        doc.apply_plant(plant, now);
        self.mirror.write(user, &doc, false);

        self.table
            .record(&TableRow::from_plant(plant, now), false)
            .await;
        Ok(())
    }

    async fn reinit(
        &self,
        user: &Username,
        trigger: &StoreError,
        options: &ReconcileOptions,
        now: i64,
    ) -> Outcome {
        let target = reinit_target(self.plants.layout(), user, trigger);

        if options.dry_run {
            return Outcome::new(
                user.clone(),
                OutcomeStatus::RepairedReinit,
                format!(
                    "dry-run: would back up and reinitialize {}",
                    target.display()
                ),
                true,
            );
        }

        match self.reinit_in_place(user, &target, now).await {
            Ok(backup) => {
                let detail = backup.map_or_else(
                    || "reinitialized (no previous file)".to_string(),
                    |path| format!("reinitialized (backup={})", path.display()),
                );
                tracing::warn!(user = %user, %detail, "plant reinitialized");
                Outcome::new(user.clone(), OutcomeStatus::RepairedReinit, detail, false)
            }
            Err(error) => {
                tracing::error!(user = %user, %error, "reinit failed");
                Outcome::new(
                    user.clone(),
                    OutcomeStatus::Error,
                    format!("reinit failed: {error}"),
                    false,
                )
            }
        }
    }

    /// Back up whatever is at `target`, then replace it with a fresh plant.
    ///
    /// Nothing is overwritten if the backup fails.
    async fn reinit_in_place(
        &self,
        user: &Username,
        target: &Path,
        now: i64,
    ) -> Result<Option<PathBuf>, StoreError> {
        let home = self.plants.layout().home_prefix();
        if !home.is_dir() {
            return Err(StoreError::Unavailable(format!(
                "home prefix {} is not a directory",
                home.display()
            )));
        }

        let backup = self.backup.snapshot(target, now)?;
        let plant = self.plants.fresh_plant(user, now)?;
        self.persist(user, target, &plant, now).await?;
        Ok(backup)
    }

    /// Mark the mirror and table dead from the mirror's watering time alone.
    ///
    /// The plant file is not consulted again here; it already failed to load.
    async fn fallback(&self, user: &Username, options: &ReconcileOptions, now: i64) -> Outcome {
        let dry_run = options.dry_run;
        let unchanged =
            |detail: String| Outcome::new(user.clone(), OutcomeStatus::Unchanged, detail, dry_run);

        let Some(mut doc) = self.mirror.read(user) else {
            return unchanged("skipped: no mirror".to_string());
        };
        let Some(last_watered) = doc.last_watered().filter(|ts| *ts > 0) else {
            return unchanged("skipped: no timestamp".to_string());
        };

        let since = now.saturating_sub(last_watered);
        #[allow(clippy::cast_precision_loss)]
        let hours_since = since as f64 / 3_600.0;
        let already_dead = doc.is_dead() == Some(true);

        if since <= options.dead_after_secs() {
            return unchanged(format!("within threshold ({hours_since:.1}h)"));
        }
        if already_dead {
            return unchanged("already dead".to_string());
        }

        doc.set_is_dead(true);
        self.mirror.write(user, &doc, dry_run);
        self.table.update_is_dead(user.as_str(), true, dry_run).await;

        tracing::warn!(
            user = %user,
            hours_since,
            dry_run,
            "marked dead from stale mirror"
        );
        Outcome::new(
            user.clone(),
            OutcomeStatus::RepairedFallback,
            format!("marked dead via mirror/table (hours_since={hours_since:.1})"),
            dry_run,
        )
    }
}

/// A corrupt file is replaced where it was found; otherwise the canonical path.
fn reinit_target(layout: &HomeLayout, user: &Username, trigger: &StoreError) -> PathBuf {
    match trigger {
        StoreError::Corrupt { path, .. } => path.clone(),
        _ => layout.canonical_plant_path(user),
    }
}
