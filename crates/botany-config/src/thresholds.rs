//! Time thresholds for the fallback path and the page view.

use botany_core::options::{DEFAULT_DEAD_AFTER_HOURS, DEFAULT_WATER_INTERVAL_HOURS};
use serde::{Deserialize, Serialize};

const fn default_dead_after_hours() -> u32 {
    DEFAULT_DEAD_AFTER_HOURS
}

const fn default_water_interval_hours() -> u32 {
    DEFAULT_WATER_INTERVAL_HOURS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThresholdsConfig {
    /// Hours after `last_watered` before the fallback path marks a plant dead.
    #[serde(default = "default_dead_after_hours")]
    pub dead_after_hours: u32,

    /// Hours after `last_watered` before the page shows a plant as thirsty.
    #[serde(default = "default_water_interval_hours")]
    pub water_interval_hours: u32,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            dead_after_hours: default_dead_after_hours(),
            water_interval_hours: default_water_interval_hours(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ThresholdsConfig::default();
        assert_eq!(config.dead_after_hours, 72);
        assert_eq!(config.water_interval_hours, 18);
    }
}
