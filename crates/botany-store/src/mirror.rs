//! The per-user JSON mirror.
//!
//! Best-effort in both directions: a missing or unreadable mirror reads as
//! `None` and a failed write is logged and reported as `false`.

use std::fs;
use std::io::ErrorKind;

use botany_core::Username;
use botany_core::entities::MirrorDocument;
use serde_json::Value;

use crate::atomic::write_atomic;
use crate::layout::HomeLayout;

#[derive(Debug, Clone)]
pub struct MirrorStore {
    layout: HomeLayout,
}

impl MirrorStore {
    #[must_use]
    pub const fn new(layout: HomeLayout) -> Self {
        Self { layout }
    }

    /// The user's mirror, or `None` if it is missing, malformed, empty, or not
    /// a JSON object.
    #[must_use]
    pub fn read(&self, user: &Username) -> Option<MirrorDocument> {
        let path = self.layout.mirror_path(user);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(error) => {
                tracing::debug!(path = %path.display(), %error, "mirror unreadable");
                return None;
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) if map.is_empty() => {
                tracing::debug!(path = %path.display(), "mirror is an empty object");
                None
            }
            Ok(Value::Object(map)) => Some(MirrorDocument::from_map(map)),
            Ok(_) => {
                tracing::debug!(path = %path.display(), "mirror is not a JSON object");
                None
            }
            Err(error) => {
                tracing::debug!(path = %path.display(), %error, "mirror is malformed");
                None
            }
        }
    }

    /// Replace the user's mirror atomically. Does nothing under dry-run.
    ///
    /// Returns whether the document is on disk afterwards.
    pub fn write(&self, user: &Username, doc: &MirrorDocument, dry_run: bool) -> bool {
        if dry_run {
            return false;
        }
        let path = self.layout.mirror_path(user);
        let result = serde_json::to_vec_pretty(doc)
            .map_err(std::io::Error::other)
            .and_then(|bytes| write_atomic(&path, &bytes));
        match result {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(user = %user, path = %path.display(), %error, "failed to write mirror");
                false
            }
        }
    }
}
