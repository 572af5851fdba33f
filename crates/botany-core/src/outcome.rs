//! Per-user reconciliation outcomes and the run-wide summary.

use serde::Serialize;

use crate::errors::{FailureKind, StoreError};
use crate::username::Username;

/// How a user's reconciliation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeStatus {
    Updated,
    Unchanged,
    RepairedFallback,
    RepairedReinit,
    Error,
}

impl OutcomeStatus {
    /// Statuses that count towards the run's `fixed` total.
    #[must_use]
    pub const fn is_fix(self) -> bool {
        matches!(
            self,
            Self::Updated | Self::RepairedFallback | Self::RepairedReinit
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::RepairedFallback => "repaired-fallback",
            Self::RepairedReinit => "repaired-reinit",
            Self::Error => "error",
        }
    }
}

/// A classified failure captured for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&StoreError> for Failure {
    fn from(error: &StoreError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Result of reconciling one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub user: Username,
    pub status: OutcomeStatus,
    pub detail: String,
    /// The primary-store failure behind a recovery or error outcome.
    pub trigger: Option<Failure>,
    pub dry_run: bool,
}

impl Outcome {
    pub fn new(
        user: Username,
        status: OutcomeStatus,
        detail: impl Into<String>,
        dry_run: bool,
    ) -> Self {
        Self {
            user,
            status,
            detail: detail.into(),
            trigger: None,
            dry_run,
        }
    }

    #[must_use]
    pub fn triggered_by(mut self, failure: Failure) -> Self {
        self.trigger = Some(failure);
        self
    }
}

/// Aggregate counts for a reconciliation run.
///
/// Built by folding outcomes rather than mutating shared counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub processed: usize,
    pub fixed: usize,
    pub errors: usize,
}

impl RunSummary {
    #[must_use]
    pub const fn record(self, outcome: &Outcome) -> Self {
        Self {
            processed: self.processed + 1,
            fixed: self.fixed + outcome.status.is_fix() as usize,
            errors: self.errors + matches!(outcome.status, OutcomeStatus::Error) as usize,
        }
    }
}
