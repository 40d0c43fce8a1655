//! Open-items report job.
//!
//! Runs the configured named queries, aggregates them into the open-items
//! report, exports the raw results as a workbook and emails the report with
//! the workbook attached.
//!
//! - [`config`]: TOML configuration
//! - [`job`]: step orchestration over the collaborator traits
//! - [`cmd`]: the `openitems` command line
//!
//! # Example Usage
//!
//! ```bash
//! openitems run --config /etc/openitems/openitems.toml
//! openitems run --dry-run
//! openitems preview --format text
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod config;
pub mod job;

pub use config::{load_config, Config, ConfigError};
pub use job::{
    render_report, JobError, Recipients, RenderedReport, ReportJob, RunMode, RunOutcome,
};
