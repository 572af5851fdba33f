use serde::{Deserialize, Serialize};

/// Default hours after `last_watered` before the fallback path marks a plant dead.
pub const DEFAULT_DEAD_AFTER_HOURS: u32 = 72;

/// Default watering interval used by the page view's "thirsty" flag.
pub const DEFAULT_WATER_INTERVAL_HOURS: u32 = 18;

/// Per-run knobs passed to `reconcile` and `audit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOptions {
    /// Never write to any store.
    pub dry_run: bool,
    /// Back up and recreate unreadable or missing plants instead of the fallback path.
    pub reinit_corrupt: bool,
    pub dead_after_hours: u32,
    pub water_interval_hours: u32,
}

impl ReconcileOptions {
    #[must_use]
    pub const fn dead_after_secs(&self) -> i64 {
        self.dead_after_hours as i64 * 3_600
    }

    #[must_use]
    pub const fn water_interval_secs(&self) -> i64 {
        self.water_interval_hours as i64 * 3_600
    }
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            reinit_corrupt: false,
            dead_after_hours: DEFAULT_DEAD_AFTER_HOURS,
            water_interval_hours: DEFAULT_WATER_INTERVAL_HOURS,
        }
    }
}
