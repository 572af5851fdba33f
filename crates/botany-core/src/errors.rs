//! Failure taxonomy for the plant stores.
//!
//! Only three failure kinds are eligible for automatic recovery: the plant file
//! is absent, the plant file is unreadable as a plant, or the state directory
//! itself cannot be reached. Everything else is `Unclassified` and surfaces as
//! a hard error.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a primary-store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    Corrupt,
    Unavailable,
    Unclassified,
}

impl FailureKind {
    /// Whether the reconciliation engine may route this failure into recovery.
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        matches!(self, Self::NotFound | Self::Corrupt | Self::Unavailable)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Corrupt => "corrupt",
            Self::Unavailable => "unavailable",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the primary plant store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No `*_plant.dat` candidate exists in the user's state directory.
    #[error("no *_plant.dat under {}", .dir.display())]
    NotFound { dir: PathBuf },

    /// The plant file exists but cannot be decoded or fails structural checks.
    #[error("corrupt plant file {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// The state directory or home prefix cannot be reached.
    #[error("plant store unavailable: {0}")]
    Unavailable(String),

    /// Filesystem failure outside the classified cases.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// Build an `Io` error bound to the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::Corrupt { .. } => FailureKind::Corrupt,
            Self::Unavailable(_) => FailureKind::Unavailable,
            Self::Io { .. } | Self::Other(_) => FailureKind::Unclassified,
        }
    }
}

/// A username outside the safe character class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsafe username '{0}': must match [A-Za-z0-9._-]+")]
pub struct UnsafeUsername(pub String);
