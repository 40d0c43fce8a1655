//! Workbook export.
//!
//! All result sets of a run go into one archive named after the run date,
//! one CSV sheet per result set in query order.

use openitems_core::{BoxError, Clock, ExportError, Exporter, ResultSet, ResultSets};
use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Longest sheet name kept, in characters.
pub const SHEET_NAME_LIMIT: usize = 30;

/// Sheet name for a query: its first [`SHEET_NAME_LIMIT`] characters.
pub fn sheet_name(query: &str) -> String {
    query.chars().take(SHEET_NAME_LIMIT).collect()
}

/// Writes `<prefix>_<dd-mm-YYYY>.zip` into a directory.
pub struct WorkbookExporter {
    directory: PathBuf,
    prefix: String,
    clock: Box<dyn Clock>,
}

impl WorkbookExporter {
    /// Create an exporter dated by `clock`.
    pub fn new(
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
            clock,
        }
    }

    /// Path of the workbook the next export writes.
    pub fn target_path(&self) -> PathBuf {
        let date = self.clock.today().format("%d-%m-%Y");
        self.directory.join(format!("{}_{date}.zip", self.prefix))
    }

    /// Builds the archive in a temporary file next to `path` and renames it
    /// into place only once it is complete, so a failed export leaves no
    /// workbook behind.
    fn write_workbook(&self, path: &Path, sets: &ResultSets) -> Result<(), BoxError> {
        fs::create_dir_all(&self.directory)?;
        let mut archive = ZipWriter::new(NamedTempFile::new_in(&self.directory)?);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for set in sets.iter() {
            let name = format!("{}.csv", sheet_name(&set.name));
            archive.start_file(name.as_str(), options)?;
            write_sheet(&mut archive, set)?;
            debug!(sheet = %name, rows = set.len(), "Sheet written");
        }

        archive.finish()?.persist(path)?;
        Ok(())
    }
}

impl Exporter for WorkbookExporter {
    fn export(&self, sets: &ResultSets) -> Result<PathBuf, ExportError> {
        let path = self.target_path();
        self.write_workbook(&path, sets)
            .map_err(|e| ExportError::new(path.clone(), e))?;
        info!(path = %path.display(), sheets = sets.len(), "Workbook exported");
        Ok(path)
    }
}

fn write_sheet<W: Write + Seek>(
    archive: &mut ZipWriter<W>,
    set: &ResultSet,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(archive);
    writer.write_record(&set.columns)?;
    for row in &set.rows {
        writer.write_record(
            set.columns
                .iter()
                .map(|c| row.get(c).map(ToString::to_string).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(())
}
