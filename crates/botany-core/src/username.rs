use std::fmt;

use serde::Serialize;

use crate::errors::UnsafeUsername;

/// A username restricted to `[A-Za-z0-9._-]+`.
///
/// Usernames become path components under the home prefix, so `.` and `..`
/// are rejected as well.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Validate a raw username.
    ///
    /// # Errors
    ///
    /// Returns `UnsafeUsername` if the name is empty, contains characters
    /// outside the safe class, or is a relative path component.
    pub fn parse(raw: &str) -> Result<Self, UnsafeUsername> {
        let safe = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
            && raw != "."
            && raw != "..";
        if safe {
            Ok(Self(raw.to_string()))
        } else {
            Err(UnsafeUsername(raw.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
