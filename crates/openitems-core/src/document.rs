//! The rendered report as a tree of plain data.
//!
//! A [`Document`] holds fully formatted text only; turning it into markup is
//! the job of a [`DocumentRenderer`](crate::DocumentRenderer).

use serde::Serialize;

/// A complete report: fixed header, ordered sections, fixed footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Document title.
    pub title: String,
    /// Report date, already formatted.
    pub date: String,
    /// Paragraphs shown before the sections.
    pub header: Vec<Paragraph>,
    /// Report sections in display order.
    pub sections: Vec<Section>,
    /// Closing note.
    pub footer: String,
}

/// A paragraph made of plain and emphasised runs of text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Paragraph {
    /// Text runs in order.
    pub spans: Vec<Span>,
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append plain text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.spans.push(Span::Text(text.into()));
        self
    }

    /// Append emphasised text.
    pub fn strong(mut self, text: impl Into<String>) -> Self {
        self.spans.push(Span::Strong(text.into()));
        self
    }

    /// The paragraph with emphasis dropped.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(Span::as_str).collect()
    }
}

/// A run of text inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Span {
    /// Plain text.
    Text(String),
    /// Emphasised text.
    Strong(String),
}

impl Span {
    /// The text of this run.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Strong(s) => s,
        }
    }
}

/// One titled block of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Section heading.
    pub title: String,
    /// Summary lines shown above the table.
    pub summary: Vec<SummaryLine>,
    /// Optional table of per-group figures.
    pub table: Option<Table>,
}

/// A labelled, pre-formatted figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    /// Label, without trailing colon.
    pub label: String,
    /// Formatted value.
    pub value: String,
}

/// Column headers plus rows of formatted cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Table {
    /// Column headers.
    pub headers: Vec<String>,
    /// Rows; each has one cell per header.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_plain_text() {
        let p = Paragraph::new().text("Total: ").strong("R$ 1,00").text(".");
        assert_eq!(p.plain_text(), "Total: R$ 1,00.");
        assert_eq!(p.spans.len(), 3);
    }

    #[test]
    fn test_span_as_str() {
        assert_eq!(Span::Strong("x".to_string()).as_str(), "x");
        assert_eq!(Span::Text("y".to_string()).as_str(), "y");
    }
}
