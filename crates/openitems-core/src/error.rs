//! Error types for report building and the collaborator seams.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error carried by collaborator failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned when building the report document fails.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A section the headline depends on has no groups.
    #[error("section '{section}' has no rows to report")]
    EmptySection {
        /// Section id.
        section: String,
    },
    /// A section names a result set that was not produced.
    #[error("section '{section}' refers to missing result set '{result_set}'")]
    MissingResultSet {
        /// Section id.
        section: String,
        /// Query name.
        result_set: String,
    },
    /// The headline refers to a section that is not in the layout.
    #[error("unknown section '{section}'")]
    UnknownSection {
        /// Section id.
        section: String,
    },
    /// A summary, column or headline fact reads a column the section does not sum.
    #[error("section '{section}' does not sum field '{field}'")]
    UntrackedField {
        /// Section id.
        section: String,
        /// Column name.
        field: String,
    },
    /// Presentation failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Error returned when turning a document into markup fails.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template compilation or evaluation failed.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    /// Writing the output failed.
    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Error returned when running the named queries fails.
#[derive(Debug, Error)]
#[error("query '{query}' failed")]
pub struct QueryError {
    /// Name of the failing query.
    pub query: String,
    /// Underlying cause.
    #[source]
    pub source: BoxError,
}

impl QueryError {
    /// Create a new query error.
    pub fn new(query: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            query: query.into(),
            source: source.into(),
        }
    }
}

/// Error returned when exporting the result sets fails.
#[derive(Debug, Error)]
#[error("export to {} failed", .path.display())]
pub struct ExportError {
    /// Target file.
    pub path: PathBuf,
    /// Underlying cause.
    #[source]
    pub source: BoxError,
}

impl ExportError {
    /// Create a new export error.
    pub fn new(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Error returned when sending the report fails.
#[derive(Debug, Error)]
#[error("sending '{subject}' failed")]
pub struct SendError {
    /// Subject of the message that could not be sent.
    pub subject: String,
    /// Underlying cause.
    #[source]
    pub source: BoxError,
}

impl SendError {
    /// Create a new send error.
    pub fn new(subject: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            subject: subject.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ReportError::EmptySection {
            section: "open".to_string(),
        };
        assert_eq!(err.to_string(), "section 'open' has no rows to report");

        let err = QueryError::new("faculdade", "connection refused");
        assert_eq!(err.to_string(), "query 'faculdade' failed");
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string),
            Some("connection refused".to_string())
        );

        let err = ExportError::new("/tmp/out.zip", "disk full");
        assert_eq!(err.to_string(), "export to /tmp/out.zip failed");
    }
}
