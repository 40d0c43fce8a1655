//! The report job: query, render, export, send.
//!
//! Steps run strictly in that order and the first failure stops the run.
//! Nothing is retried.

use openitems_core::{
    Clock, DocumentRenderer, ExportError, Exporter, Mailer, Message, QueryError, QuerySource,
    RenderError, ReportError, ReportLayout, ReportRenderer, ResultSets, SendError,
};
use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

/// Error from one step of the job.
#[derive(Debug, Error)]
pub enum JobError {
    /// Running the named queries failed.
    #[error("query step failed")]
    Query(#[from] QueryError),
    /// Building the report document failed.
    #[error("report step failed")]
    Report(#[from] ReportError),
    /// Rendering the document failed.
    #[error("render step failed")]
    Render(#[from] RenderError),
    /// Writing the workbook failed.
    #[error("export step failed")]
    Export(#[from] ExportError),
    /// Sending the email failed.
    #[error("send step failed")]
    Send(#[from] SendError),
}

/// Who receives the report and how it is titled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipients {
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// Subject text before the date.
    pub subject_prefix: String,
}

/// Whether the run ends by sending the email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Query, render, export and send.
    Send,
    /// Query, render and export; skip sending.
    DryRun,
}

/// A rendered report and the result sets it was built from.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    /// Raw query results.
    pub sets: ResultSets,
    /// Rendered body.
    pub body: String,
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Total rows across all result sets.
    pub rows: usize,
    /// Exported workbook.
    pub workbook: PathBuf,
    /// The message handed (or, on a dry run, not handed) to the mailer.
    pub message: Message,
    /// Whether the message was sent.
    pub sent: bool,
}

fn logged<T, E: Display>(step: &str, result: Result<T, E>) -> Result<T, E> {
    if let Err(e) = &result {
        error!(step, error = %e, "Step failed");
    }
    result
}

/// Run the queries and render the report body.
pub fn render_report(
    source: &dyn QuerySource,
    clock: &dyn Clock,
    layout: &ReportLayout,
    renderer: &dyn DocumentRenderer,
) -> Result<RenderedReport, JobError> {
    info!(source = source.name(), "Running named queries");
    let sets = logged("query", source.run_named_queries())?;
    info!(result_sets = sets.len(), rows = sets.total_rows(), "Queries complete");

    info!(sections = layout.sections.len(), "Building report");
    let document = logged("report", ReportRenderer::new(clock).render(layout, &sets))?;
    let body = logged("render", renderer.render(&document))?;

    Ok(RenderedReport { sets, body })
}

/// The scheduled job with all of its collaborators.
pub struct ReportJob {
    /// Named query runner.
    pub source: Box<dyn QuerySource>,
    /// Workbook writer.
    pub exporter: Box<dyn Exporter>,
    /// Mail transport.
    pub mailer: Box<dyn Mailer>,
    /// Report date.
    pub clock: Box<dyn Clock>,
    /// Body presentation.
    pub renderer: Box<dyn DocumentRenderer>,
    /// Report sections and headline.
    pub layout: ReportLayout,
    /// Message addressing.
    pub recipients: Recipients,
}

impl ReportJob {
    /// Subject line for today's report.
    pub fn subject(&self) -> String {
        format!(
            "{} - {}",
            self.recipients.subject_prefix,
            self.clock.today().format(openitems_core::DATE_FORMAT)
        )
    }

    /// Query and render without exporting or sending.
    pub fn preview(&self) -> Result<RenderedReport, JobError> {
        render_report(
            self.source.as_ref(),
            self.clock.as_ref(),
            &self.layout,
            self.renderer.as_ref(),
        )
    }

    /// Run every step.
    pub fn run(&self, mode: RunMode) -> Result<RunOutcome, JobError> {
        let RenderedReport { sets, body } = self.preview()?;

        info!("Exporting result sets");
        let workbook = logged("export", self.exporter.export(&sets))?;

        let message = Message {
            to: self.recipients.to.clone(),
            cc: self.recipients.cc.clone(),
            subject: self.subject(),
            html_body: body,
            attachment: Some(workbook.clone()),
        };

        let sent = match mode {
            RunMode::Send => {
                info!(to = ?message.to, cc = message.cc.len(), "Sending report");
                logged("send", self.mailer.send(&message))?;
                true
            }
            RunMode::DryRun => {
                info!(subject = %message.subject, "Dry run, not sending");
                false
            }
        };

        info!("Run complete");
        Ok(RunOutcome {
            rows: sets.total_rows(),
            workbook,
            message,
            sent,
        })
    }
}
