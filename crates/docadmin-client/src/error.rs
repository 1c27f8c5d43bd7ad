use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The user-triggered operations a status message can be about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Upload,
    Reindex,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Upload => "Upload",
            Self::Reindex => "Reindex",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-side precondition failures. Checked before any request is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please login first.")]
    NotAuthenticated,

    #[error("Title is required.")]
    MissingTitle,

    #[error("Please choose a PDF file.")]
    MissingFile,
}

/// Every way a workflow can end without a success payload.
///
/// The `Display` text of each variant is exactly what the operator sees.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The backend base URL is not configured; nothing was sent.
    #[error("API base URL is missing. Set DOCADMIN_API_BASE (or add it to .env.local) and retry.")]
    MissingBaseUrl,

    /// Any other configuration problem detected before a request.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Login rejected by the backend, or no usable answer from it.
    #[error("Login failed ({}): {message}", status_label(.status))]
    Auth { status: Option<u16>, message: String },

    /// Non-2xx from upload or reindex. `body` is opaque diagnostic text.
    #[error("{operation} failed ({status}): {body}")]
    Remote {
        operation: Operation,
        status: u16,
        body: String,
    },

    /// No response received at all.
    #[error("{operation} error: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    /// The same workflow is already validating or requesting.
    #[error("{0} already in progress.")]
    Busy(Operation),

    /// The selected PDF could not be read from disk.
    #[error("Cannot read PDF file {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "no response".to_owned(),
    }
}
