use std::path::PathBuf;
use std::time::Duration;

use crate::error::AdminError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Process-wide settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL. Blank counts as unset.
    pub api_base: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Where the token slot lives; the platform data dir when unset.
    pub data_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(api_base: Option<String>) -> Self {
        Self {
            api_base,
            timeout: DEFAULT_TIMEOUT,
            data_dir: None,
        }
    }

    /// The base URL with any trailing slash stripped.
    ///
    /// Fails with [`AdminError::MissingBaseUrl`] when unset or blank, which
    /// callers must check before building any request.
    pub fn api_base(&self) -> Result<&str, AdminError> {
        self.api_base
            .as_deref()
            .map(|s| s.trim().trim_end_matches('/'))
            .filter(|s| !s.is_empty())
            .ok_or(AdminError::MissingBaseUrl)
    }

    /// Label for display: the base URL or `(missing env)`.
    pub fn api_base_label(&self) -> &str {
        self.api_base().unwrap_or("(missing env)")
    }
}
