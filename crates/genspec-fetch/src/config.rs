use std::time::Duration;

use genspec_core::constants::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_SPEC_HOST};

/// Configuration for fetching base specs over HTTP.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Host serving `spec/<name>.json` (e.g. "https://specs.example.org").
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SPEC_HOST.into(),
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}
