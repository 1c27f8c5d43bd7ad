//! The single "last outcome" message shown to the operator.
//!
//! Every report replaces the previous message. There is no history.

use std::fmt;

use tracing::debug;

use crate::error::AdminError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    #[default]
    Empty,
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StatusKind::Success => write!(f, "✓ {}", self.text),
            StatusKind::Error => write!(f, "✗ {}", self.text),
            StatusKind::Empty => f.write_str(&self.text),
        }
    }
}

/// What an operation ended with.
#[derive(Debug)]
pub enum Outcome {
    Success(String),
    Failure(AdminError),
    /// The operation did not run; not a failure.
    Skipped(String),
}

impl From<AdminError> for Outcome {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::Busy(_) => Outcome::Skipped(err.to_string()),
            other => Outcome::Failure(other),
        }
    }
}

impl From<Result<String, AdminError>> for Outcome {
    fn from(result: Result<String, AdminError>) -> Self {
        match result {
            Ok(text) => Outcome::Success(text),
            Err(e) => e.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct StatusReporter {
    current: StatusMessage,
}

impl StatusReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &StatusMessage {
        &self.current
    }

    /// Blank the message, as happens when a new operation starts.
    pub fn clear(&mut self) {
        self.current = StatusMessage::default();
    }

    pub fn report(&mut self, outcome: impl Into<Outcome>) -> &StatusMessage {
        self.current = match outcome.into() {
            Outcome::Success(text) => StatusMessage {
                text,
                kind: StatusKind::Success,
            },
            Outcome::Failure(err) => StatusMessage {
                text: err.to_string(),
                kind: StatusKind::Error,
            },
            Outcome::Skipped(text) => StatusMessage {
                text,
                kind: StatusKind::Empty,
            },
        };
        debug!(kind = ?self.current.kind, "status updated");
        &self.current
    }
}
