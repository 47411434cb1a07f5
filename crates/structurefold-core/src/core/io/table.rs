//! Comma-separated report tables.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Row {row} has {found} columns, header has {expected}")]
    Width {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A rectangular report: one header row and any number of data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.header)?;
        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != self.header.len() {
                return Err(TableError::Width {
                    row: index + 1,
                    expected: self.header.len(),
                    found: row.len(),
                });
            }
            csv_writer.write_record(row)?;
        }
        csv_writer.flush().map_err(|e| TableError::Csv(e.into()))
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), TableError> {
        let file = File::create(path).map_err(|e| TableError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        self.write_to(std::io::BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_then_rows() {
        let mut table = Table::new(vec!["sam_file".into(), "bitflag".into()]);
        table.push(vec!["a.sam".into(), "3".into()]);
        let mut buffer = Vec::new();
        table.write_to(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "sam_file,bitflag\na.sam,3\n");
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        table.push(vec!["only-one".into()]);
        assert!(matches!(
            table.write_to(Vec::new()),
            Err(TableError::Width { row: 1, expected: 2, found: 1 })
        ));
    }
}
