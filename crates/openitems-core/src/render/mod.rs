//! Presentation of a [`Document`].
//!
//! Renderers only decide markup. Every figure in the document is already
//! formatted, so swapping renderers never changes what the report says.

mod html;
mod text;

pub use html::HtmlRenderer;
pub use text::TextRenderer;

use crate::document::Document;
use crate::error::RenderError;

/// Turns a document into a string of markup.
pub trait DocumentRenderer {
    /// Render the document.
    fn render(&self, document: &Document) -> Result<String, RenderError>;
}
