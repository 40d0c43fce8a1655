//! Named queries backed by CSV extracts.
//!
//! The database exports each report query to a CSV file on a schedule. The
//! header row names the columns and every cell is typed on read with
//! [`Value::parse_cell`].

use indexmap::IndexMap;
use openitems_core::{QueryError, QuerySource, ResultSet, ResultSets, Row, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Query source reading one CSV file per named query.
#[derive(Debug, Clone)]
pub struct CsvQuerySource {
    directory: PathBuf,
    queries: IndexMap<String, PathBuf>,
    delimiter: u8,
}

impl CsvQuerySource {
    /// Create a source resolving relative file names against `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            queries: IndexMap::new(),
            delimiter: b',',
        }
    }

    /// Register a query and the file holding its extract.
    pub fn query(mut self, name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        self.queries.insert(name.into(), file.into());
        self
    }

    /// Set the field delimiter (default `,`).
    pub const fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn run_query(&self, name: &str, path: &Path) -> Result<ResultSet, QueryError> {
        debug!(query = name, path = %path.display(), "Reading extract");
        let file = File::open(path).map_err(|e| {
            QueryError::new(name, format!("failed to open {}: {e}", path.display()))
        })?;
        read_result_set(name, BufReader::new(file), self.delimiter)
            .map_err(|e| QueryError::new(name, e))
    }
}

impl QuerySource for CsvQuerySource {
    fn name(&self) -> &str {
        "csv"
    }

    fn run_named_queries(&self) -> Result<ResultSets, QueryError> {
        let mut sets = ResultSets::new();
        for (name, file) in &self.queries {
            let set = self.run_query(name, &self.directory.join(file))?;
            info!(query = %name, rows = set.len(), "Query complete");
            sets.insert(set);
        }
        Ok(sets)
    }
}

/// Read a CSV document with a header row into a result set.
///
/// Header names are trimmed. Short records leave the trailing columns unset.
pub fn read_result_set<R: Read>(
    name: &str,
    reader: R,
    delimiter: u8,
) -> Result<ResultSet, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut set = ResultSet::new(name, columns);
    for record in reader.records() {
        let record = record?;
        let row: Row = set
            .columns
            .iter()
            .zip(record.iter())
            .map(|(column, cell)| (column.as_str(), Value::parse_cell(cell)))
            .collect();
        set.push(row);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_read_typed_cells() {
        let csv = "TIPO PAGAMENTO,QUANTIDADE,VALOR ORIGINAL TOTAL\n\
                   PIX,2,100.50\n\
                   BOLETO,,200\n";
        let set = read_result_set("lancamentos", csv.as_bytes(), b',').unwrap();

        assert_eq!(set.name, "lancamentos");
        assert_eq!(
            set.columns,
            ["TIPO PAGAMENTO", "QUANTIDADE", "VALOR ORIGINAL TOTAL"]
        );
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.rows[0].get("TIPO PAGAMENTO"),
            Some(&Value::String("PIX".to_string()))
        );
        assert_eq!(set.rows[0].get("QUANTIDADE"), Some(&Value::Integer(2)));
        assert_eq!(
            set.rows[0].get("VALOR ORIGINAL TOTAL"),
            Some(&Value::Number(dec!(100.50)))
        );
        assert_eq!(set.rows[1].get("QUANTIDADE"), None);
    }

    #[test]
    fn test_semicolon_delimiter_and_trimmed_headers() {
        let csv = " TIPO ; ORIGINAL \nMENSALIDADE;10\n";
        let set = read_result_set("faculdade", csv.as_bytes(), b';').unwrap();
        assert_eq!(set.columns, ["TIPO", "ORIGINAL"]);
        assert_eq!(set.rows[0].get("ORIGINAL"), Some(&Value::Integer(10)));
    }

    #[test]
    fn test_short_record_leaves_columns_unset() {
        let csv = "A,B,C\n1\n";
        let set = read_result_set("q", csv.as_bytes(), b',').unwrap();
        assert_eq!(set.rows[0].get("A"), Some(&Value::Integer(1)));
        assert_eq!(set.rows[0].get("C"), None);
    }

    #[test]
    fn test_header_only_is_empty_set() {
        let set = read_result_set("q", "A,B\n".as_bytes(), b',').unwrap();
        assert!(set.is_empty());
        assert_eq!(set.columns, ["A", "B"]);
    }
}
