use std::path::{Path, PathBuf};

use anyhow::Context;
use botany_config::ReconcileConfig;
use botany_core::ReconcileOptions;
use botany_db::{GardenDb, GardenTable};

use crate::cli::Cli;

/// Everything a run needs once config and flags are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub home_prefix: PathBuf,
    pub db_path: PathBuf,
    pub options: ReconcileOptions,
}

/// Load layered config (including `.env`) and apply command-line overrides.
pub fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let config = ReconcileConfig::load_with_dotenv().context("failed to load configuration")?;
    Ok(apply_flags(&config, cli))
}

/// Flags win over every config source.
pub fn apply_flags(config: &ReconcileConfig, cli: &Cli) -> Settings {
    let mut paths = config.paths.clone();
    if let Some(home) = &cli.home_prefix {
        paths.home_prefix.clone_from(home);
    }
    if let Some(db) = &cli.db_path {
        paths.db_path.clone_from(db);
    }

    Settings {
        home_prefix: paths.normalized_home_prefix(),
        db_path: paths.db_path,
        options: ReconcileOptions {
            dry_run: cli.dry_run,
            reinit_corrupt: cli.reinit_corrupt,
            dead_after_hours: cli
                .dead_after_hours
                .unwrap_or(config.thresholds.dead_after_hours),
            water_interval_hours: cli
                .water_interval_hours
                .unwrap_or(config.thresholds.water_interval_hours),
        },
    }
}

/// Open the garden table if its database file exists.
///
/// The table is optional: a missing file or a failed open both yield `None`,
/// and the run carries on with the plant file and mirror alone.
pub async fn open_table(db_path: &Path) -> Option<GardenTable> {
    match GardenDb::open_existing(db_path).await {
        Ok(db) => db.map(GardenTable::new),
        Err(error) => {
            tracing::warn!(path = %db_path.display(), %error, "garden database unavailable; continuing without it");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn config_values_apply_without_flags() {
        let mut config = ReconcileConfig::default();
        config.thresholds.dead_after_hours = 96;
        config.paths.home_prefix = PathBuf::from("/srv/homes/");

        let cli = Cli::try_parse_from(["botany-reconcile"]).unwrap();
        let settings = apply_flags(&config, &cli);

        assert_eq!(settings.home_prefix, PathBuf::from("/srv/homes"));
        assert_eq!(settings.options.dead_after_hours, 96);
        assert_eq!(settings.options.water_interval_hours, 18);
        assert!(!settings.options.dry_run);
    }

    #[test]
    fn flags_override_config() {
        let config = ReconcileConfig::default();
        let cli = Cli::try_parse_from([
            "botany-reconcile",
            "--home-prefix",
            "/tmp/homes",
            "--db-path",
            "/tmp/garden.sqlite",
            "--dead-after-hours",
            "24",
            "--water-interval-hours",
            "6",
            "--dry-run",
            "--reinit-corrupt",
        ])
        .unwrap();

        let settings = apply_flags(&config, &cli);

        assert_eq!(
            settings,
            Settings {
                home_prefix: PathBuf::from("/tmp/homes"),
                db_path: PathBuf::from("/tmp/garden.sqlite"),
                options: ReconcileOptions {
                    dry_run: true,
                    reinit_corrupt: true,
                    dead_after_hours: 24,
                    water_interval_hours: 6,
                },
            }
        );
    }

    #[tokio::test]
    async fn missing_database_means_no_table() {
        assert!(
            open_table(Path::new("/nonexistent/garden_db.sqlite"))
                .await
                .is_none()
        );
    }
}
