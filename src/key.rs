//! Object keys accepted for signing.

use std::{fmt, ops::Deref};

use crate::error::ServerError;

/// A validated object key.
///
/// The key is non-empty, does not contain `..` and does not start with `/`.
/// These are substring and prefix checks only, the key is not normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Validate `raw` as an object key.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ServerError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ServerError::missing_key("the `key` parameter is empty"));
        }
        if raw.contains("..") {
            return Err(ServerError::invalid_key(format!(
                "key `{raw}` contains a parent directory sequence"
            )));
        }
        if raw.starts_with('/') {
            return Err(ServerError::invalid_key(format!(
                "key `{raw}` is an absolute path"
            )));
        }
        Ok(Self(raw))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for ObjectKey {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
