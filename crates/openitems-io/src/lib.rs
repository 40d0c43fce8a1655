//! Adapters for openitems
//!
//! Implementations of the collaborator traits from `openitems-core`:
//!
//! - [`CsvQuerySource`] - Reads each named query from a CSV extract
//! - [`WorkbookExporter`] - Writes all result sets into one dated workbook archive
//! - [`SmtpMailer`] / [`PickupMailer`] - Deliver the report through `lettre`
//!
//! # Example
//!
//! ```rust,no_run
//! use openitems_core::QuerySource;
//! use openitems_io::CsvQuerySource;
//!
//! let source = CsvQuerySource::new("/var/lib/openitems/extracts")
//!     .query("lancamentos", "lancamentos.csv")
//!     .query("faculdade", "faculdade.csv")
//!     .delimiter(b';');
//!
//! let sets = source.run_named_queries()?;
//! println!("{} rows", sets.total_rows());
//! # Ok::<(), openitems_core::QueryError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod export;
pub mod mail;
pub mod query;

pub use export::{sheet_name, WorkbookExporter, SHEET_NAME_LIMIT};
pub use mail::{parse_address_list, MailError, PickupMailer, SmtpMailer};
pub use query::{read_result_set, CsvQuerySource};
