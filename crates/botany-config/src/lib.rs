//! # botany-config
//!
//! Layered configuration loading for botany reconcile using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`BOTANY_RECONCILE_*` prefix, `__` as separator)
//! 2. Legacy environment variables (`BOTANY_HOME_PREFIX`, `BOTANY_DB_PATH`,
//!    `DEAD_AFTER_HOURS`, `WATER_INTERVAL_HOURS`)
//! 3. Local `./botany-reconcile.toml`
//! 4. User-level `~/.config/botany/reconcile.toml`
//! 5. Built-in defaults
//!
//! Command-line flags are applied on top of the loaded config by the binary.
//!
//! # Environment Variable Mapping
//!
//! Figment maps `BOTANY_RECONCILE_PATHS__DB_PATH` -> `paths.db_path`,
//! `BOTANY_RECONCILE_THRESHOLDS__DEAD_AFTER_HOURS` -> `thresholds.dead_after_hours`.
//!
//! # Usage
//!
//! ```no_run
//! use botany_config::ReconcileConfig;
//!
//! let config = ReconcileConfig::load_with_dotenv().expect("config");
//! println!("home prefix: {}", config.paths.home_prefix.display());
//! ```

mod error;
mod paths;
mod thresholds;

pub use error::ConfigError;
pub use paths::PathsConfig;
pub use thresholds::ThresholdsConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Legacy variable names and the config keys they feed.
const LEGACY_ENV: [(&str, &str); 4] = [
    ("BOTANY_HOME_PREFIX", "paths.home_prefix"),
    ("BOTANY_DB_PATH", "paths.db_path"),
    ("DEAD_AFTER_HOURS", "thresholds.dead_after_hours"),
    ("WATER_INTERVAL_HOURS", "thresholds.water_interval_hours"),
];

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = "botany-reconcile.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReconcileConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

impl ReconcileConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Local config
        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Legacy variable names shared with the game's own tooling
        figment = figment.merge(Self::legacy_env());

        // Layer 4: Prefixed environment variables (highest priority)
        figment.merge(Env::prefixed("BOTANY_RECONCILE_").split("__"))
    }

    /// Legacy variables map onto config keys. A blank value counts as unset,
    /// so cron environments that export empty names keep the defaults.
    fn legacy_env() -> Env {
        let names: Vec<&str> = LEGACY_ENV
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| std::env::var(name).is_ok_and(|value| !value.trim().is_empty()))
            .collect();
        Env::raw().only(&names).map(|key| {
            LEGACY_ENV
                .iter()
                .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                .map_or_else(|| key.as_str().to_string(), |(_, path)| (*path).to_string())
                .into()
        })
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("botany").join("reconcile.toml"))
    }

    /// Reject values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paths.home_prefix.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "paths.home_prefix".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.paths.db_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "paths.db_path".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}
