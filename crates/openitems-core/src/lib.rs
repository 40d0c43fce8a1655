//! Core types for openitems
//!
//! This crate provides the pure part of the open-items reporting job:
//!
//! - [`Value`], [`Row`], [`ResultSet`] - In-memory tables produced by named queries
//! - [`aggregate`] - Groups rows by a category column and sums numeric columns
//! - [`CurrencyFormat`] - Brazilian real formatting (`R$ 1.234,50`)
//! - [`ReportRenderer`] - Turns a [`ReportLayout`] and result sets into a [`Document`]
//! - [`HtmlRenderer`] / [`TextRenderer`] - Swappable presentation of a [`Document`]
//! - [`QuerySource`], [`Exporter`], [`Mailer`], [`Clock`] - Collaborator seams
//!
//! # Example
//!
//! ```
//! use openitems_core::{aggregate, format_currency, Row, Value};
//! use rust_decimal_macros::dec;
//!
//! let rows = vec![
//!     Row::new().with("TYPE", "PIX").with("AMOUNT", dec!(100)),
//!     Row::new().with("TYPE", "PIX").with("AMOUNT", dec!(50)),
//!     Row::new().with("TYPE", "BOLETO").with("AMOUNT", dec!(200)),
//! ];
//!
//! let groups = aggregate(&rows, "TYPE", &["AMOUNT"], None);
//! let keys: Vec<_> = groups.keys().collect();
//! assert_eq!(keys, ["PIX", "BOLETO"]);
//! assert_eq!(format_currency(groups.total("AMOUNT")), "R$ 350,00");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
pub mod clock;
pub mod collaborator;
pub mod currency;
pub mod document;
pub mod error;
pub mod render;
pub mod report;
pub mod value;

pub use aggregate::{aggregate, AggregateGroup, Aggregation, UNKNOWN_GROUP};
pub use clock::{Clock, FixedClock, SystemClock};
pub use collaborator::{Exporter, Mailer, Message, QuerySource};
pub use currency::{format_currency, CurrencyFormat};
pub use document::{Document, Paragraph, Section, Span, SummaryLine, Table};
pub use error::{BoxError, ExportError, QueryError, RenderError, ReportError, SendError};
pub use render::{DocumentRenderer, HtmlRenderer, TextRenderer};
pub use report::{
    ColumnSource, ColumnSpec, HeadlineFact, HeadlineSpec, Measure, ReportLayout, ReportRenderer,
    SectionSpec, SummarySpec, DATE_FORMAT,
};
pub use value::{ResultSet, ResultSets, Row, Value};
