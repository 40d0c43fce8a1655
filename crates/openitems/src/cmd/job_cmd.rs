//! openitems - Query, report, export and email open items.
//!
//! # Usage
//!
//! ```bash
//! openitems run --config openitems.toml
//! openitems run --dry-run --verbose
//! openitems preview --format text
//! ```
//!
//! # Commands
//!
//! - `run` - Run the whole job; `--dry-run` stops after the export
//! - `preview` - Print the rendered report to stdout

use crate::config::{load_config, Config, MailTransport, DEFAULT_CONFIG_FILE};
use crate::job::{render_report, Recipients, ReportJob, RunMode};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use openitems_core::{
    Clock, DocumentRenderer, FixedClock, HtmlRenderer, Mailer, SystemClock, TextRenderer,
};
use openitems_io::{CsvQuerySource, PickupMailer, SmtpMailer, WorkbookExporter};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Send the open-items report.
#[derive(Parser, Debug)]
#[command(name = "openitems")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run queries, export the workbook and send the report
    Run {
        /// Export but do not send
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the rendered report
    Preview {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = PreviewFormat::Html)]
        format: PreviewFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PreviewFormat {
    Html,
    Text,
}

/// Main entry point for the openitems command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    super::init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    match args.command {
        Command::Run { dry_run } => run_job(&config, dry_run),
        Command::Preview { format } => preview(&config, format),
    }
}

fn query_source(config: &Config) -> Result<CsvQuerySource> {
    let mut source = CsvQuerySource::new(&config.source.directory)
        .delimiter(config.source.delimiter_byte()?);
    for (name, file) in &config.source.queries {
        source = source.query(name, file);
    }
    Ok(source)
}

fn mailer(config: &Config) -> Result<Box<dyn Mailer>> {
    let mail = &config.mail;
    let mailer: Box<dyn Mailer> = match mail.transport {
        MailTransport::Smtp => Box::new(
            SmtpMailer::new(&mail.host, mail.port, &mail.from)
                .context("failed to set up SMTP transport")?,
        ),
        MailTransport::Pickup => {
            let dir = mail
                .pickup_dir
                .as_ref()
                .context("mail.pickup_dir is required for the pickup transport")?;
            Box::new(
                PickupMailer::new(dir, &mail.from)
                    .with_context(|| format!("failed to set up pickup in {}", dir.display()))?,
            )
        }
    };
    Ok(mailer)
}

fn build_job(config: &Config, clock: FixedClock) -> Result<ReportJob> {
    Ok(ReportJob {
        source: Box::new(query_source(config)?),
        exporter: Box::new(WorkbookExporter::new(
            &config.export.directory,
            &config.export.prefix,
            Box::new(clock),
        )),
        mailer: mailer(config)?,
        clock: Box::new(clock),
        renderer: Box::new(HtmlRenderer::new().context("failed to compile report template")?),
        layout: config.layout(),
        recipients: Recipients {
            to: config.mail.to.addresses(),
            cc: config.mail.cc.addresses(),
            subject_prefix: config.mail.subject_prefix.clone(),
        },
    })
}

fn run_job(config: &Config, dry_run: bool) -> Result<()> {
    // One date for the whole run, even if it crosses midnight.
    let job = build_job(config, FixedClock(SystemClock.today()))?;

    let mode = if dry_run { RunMode::DryRun } else { RunMode::Send };
    let outcome = job.run(mode)?;

    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "{} rows exported to {}",
        outcome.rows,
        outcome.workbook.display()
    )?;
    if outcome.sent {
        writeln!(
            stdout,
            "sent '{}' to {} recipient(s)",
            outcome.message.subject,
            outcome.message.to.len() + outcome.message.cc.len()
        )?;
    } else {
        writeln!(stdout, "dry run: '{}' not sent", outcome.message.subject)?;
    }
    Ok(())
}

fn preview(config: &Config, format: PreviewFormat) -> Result<()> {
    let renderer: Box<dyn DocumentRenderer> = match format {
        PreviewFormat::Html => {
            Box::new(HtmlRenderer::new().context("failed to compile report template")?)
        }
        PreviewFormat::Text => Box::new(TextRenderer),
    };
    let report = render_report(
        &query_source(config)?,
        &SystemClock,
        &config.layout(),
        renderer.as_ref(),
    )?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(report.body.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
