//! Audit projections and the consistency report.
//!
//! The page view is what a read path would show from the mirror or table; the
//! live view is what the plant file says once its own checks have run. A
//! mismatch is only reported when both sides give a definite answer.

use serde::Serialize;

use crate::entities::SECONDS_PER_DAY;
use crate::outcome::Failure;
use crate::username::Username;

/// Which secondary store the page view was built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSource {
    Json,
    Db,
    #[default]
    None,
}

impl PageSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Db => "db",
            Self::None => "none",
        }
    }
}

/// What the read-facing page would render for a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub source: PageSource,
    pub is_dead: Option<bool>,
    pub alive: Option<bool>,
    pub thirsty: Option<bool>,
    pub last_watered: Option<i64>,
    pub age: Option<String>,
    pub score: Option<i64>,
}

/// What the authoritative plant says after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LiveView {
    pub ok: bool,
    pub dead: Option<bool>,
    pub last_watered: Option<i64>,
    pub error: Option<Failure>,
}

impl LiveView {
    #[must_use]
    pub const fn alive(&self) -> Option<bool> {
        match self.dead {
            Some(dead) => Some(!dead),
            None => None,
        }
    }
}

/// `true` only when both projections are determinate and disagree on liveness.
#[must_use]
pub fn detect_mismatch(page: &PageView, live: &LiveView) -> bool {
    match (page.alive, live.alive()) {
        (Some(page_alive), Some(plant_alive)) => page_alive != plant_alive,
        _ => false,
    }
}

/// One user's audit result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub user: Username,
    pub page: PageView,
    pub live: LiveView,
    pub page_last_watered_ago: Option<String>,
    pub plant_last_watered_ago: Option<String>,
    pub mismatch: bool,
}

impl AuditRecord {
    #[must_use]
    pub fn new(user: Username, page: PageView, live: LiveView, now: i64) -> Self {
        let mismatch = detect_mismatch(&page, &live);
        let page_last_watered_ago = page
            .last_watered
            .filter(|ts| *ts != 0)
            .map(|ts| format_time_ago(Some(ts), now));
        let plant_last_watered_ago = live
            .last_watered
            .filter(|ts| *ts != 0)
            .map(|ts| format_time_ago(Some(ts), now));
        Self {
            user,
            page,
            live,
            page_last_watered_ago,
            plant_last_watered_ago,
            mismatch,
        }
    }

    /// Report note: the mismatch wins over a load error.
    #[must_use]
    pub fn note(&self) -> Option<String> {
        if self.mismatch {
            Some("MISMATCH: page vs plant".to_string())
        } else if self.live.ok {
            None
        } else {
            let error = self
                .live
                .error
                .as_ref()
                .map_or_else(|| "unknown".to_string(), ToString::to_string);
            Some(format!("plant load error: {error}"))
        }
    }
}

/// All audit records from a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub water_interval_hours: u32,
    pub records: Vec<AuditRecord>,
}

impl AuditReport {
    /// Whether any user's page view disagrees with the live plant.
    #[must_use]
    pub fn has_mismatch(&self) -> bool {
        self.records.iter().any(|record| record.mismatch)
    }
}

/// Render a timestamp as `"{d}d {h}h {m}m ago"`; the day part is omitted when zero.
#[must_use]
pub fn format_time_ago(ts: Option<i64>, now: i64) -> String {
    let Some(ts) = ts.filter(|ts| *ts != 0) else {
        return "unknown".to_string();
    };
    let delta = now.saturating_sub(ts).max(0);
    let (days, rest) = (delta / SECONDS_PER_DAY, delta % SECONDS_PER_DAY);
    let (hours, rest) = (rest / 3_600, rest % 3_600);
    let minutes = rest / 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m ago")
    } else {
        format!("{hours}h {minutes}m ago")
    }
}
