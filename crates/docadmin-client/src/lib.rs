//! Client side of the docadmin content backend: log in, upload PDF
//! documents with metadata, and trigger a reindex.

pub mod api;
pub mod config;
pub mod console;
pub mod dirs;
pub mod error;
pub mod reindex;
pub mod session;
pub mod status;
pub mod upload;
pub mod workflow;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use console::AdminConsole;
pub use error::{AdminError, Operation, ValidationError};
pub use reindex::ReindexTrigger;
pub use session::{FileSlot, MemorySlot, Session, SessionStore, TokenSlot};
pub use status::{Outcome, StatusKind, StatusMessage, StatusReporter};
pub use upload::{PdfFile, PdfSource, UploadForm, UploadWorkflow};
