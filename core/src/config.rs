//! Client configuration.

use std::time::Duration;

/// Endpoint of the values service the desktop harness was written against.
pub const DEFAULT_BASE_URL: &str = "http://localhost:56925/api/values/";

/// Fixed settings for an `EntityClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host, port and path prefix of the collection.
    pub base_url: String,
    /// Upper bound on a whole exchange. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
