//! Authentication middleware.

use std::{fmt, sync::Arc};

pub mod api_key;

/// Name of the header carrying the shared api key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The shared secret callers must present.
#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    /// Create a new api key.
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    /// Check whether `candidate` equals this key.
    ///
    /// The comparison time does not depend on where the values differ.
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0, |acc, (x, y)| acc | (x ^ y)) == 0
}
