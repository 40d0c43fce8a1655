//! Collaborator seams of the reporting job.
//!
//! The job reaches the outside world only through these traits: a source of
//! named result sets, a spreadsheet exporter and a mail transport. Adapters
//! live in `openitems-io`; tests substitute in-memory fakes.

use crate::error::{ExportError, QueryError, SendError};
use crate::value::ResultSets;
use std::path::{Path, PathBuf};

/// Runs the configured named queries.
pub trait QuerySource {
    /// Returns a short name for log output.
    fn name(&self) -> &str;

    /// Execute every query and return the result sets keyed by query name.
    fn run_named_queries(&self) -> Result<ResultSets, QueryError>;
}

/// Persists raw result sets as a spreadsheet.
pub trait Exporter {
    /// Write one table per result set and return the written file.
    fn export(&self, sets: &ResultSets) -> Result<PathBuf, ExportError>;
}

/// Delivers the rendered report.
pub trait Mailer {
    /// Send a message.
    ///
    /// Implementations attach [`Message::attachment`] only when
    /// [`Message::existing_attachment`] finds the file; a missing file is not
    /// an error.
    fn send(&self, message: &Message) -> Result<(), SendError>;
}

/// An outgoing report email.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
    /// File to attach, if any.
    pub attachment: Option<PathBuf>,
}

impl Message {
    /// The attachment path if it names an existing file right now.
    pub fn existing_attachment(&self) -> Option<&Path> {
        self.attachment.as_deref().filter(|p| p.is_file())
    }
}
