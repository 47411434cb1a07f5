//! Persisted normalization scales: a `transcript,value` CSV table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaleFileError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
struct ScaleRow {
    transcript: String,
    value: f64,
}

/// Reads every `transcript,value` row. Later duplicates replace earlier ones.
pub fn read_scale<R: Read>(reader: R, origin: &str) -> Result<BTreeMap<String, f64>, ScaleFileError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut table = BTreeMap::new();
    for result in csv_reader.deserialize::<ScaleRow>() {
        let row = result.map_err(|e| ScaleFileError::Csv {
            path: origin.to_string(),
            source: e,
        })?;
        table.insert(row.transcript, row.value);
    }
    Ok(table)
}

pub fn read_scale_from_path(path: &Path) -> Result<BTreeMap<String, f64>, ScaleFileError> {
    let file = std::fs::File::open(path).map_err(|e| ScaleFileError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    read_scale(file, &path.to_string_lossy())
}

/// Writes the table sorted by transcript under a `transcript,value` header.
pub fn write_scale<W: Write>(
    table: &BTreeMap<String, f64>,
    writer: W,
    origin: &str,
) -> Result<(), ScaleFileError> {
    let csv_err = |e: csv::Error| ScaleFileError::Csv {
        path: origin.to_string(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (transcript, value) in table {
        csv_writer
            .serialize(ScaleRow {
                transcript: transcript.clone(),
                value: *value,
            })
            .map_err(csv_err)?;
    }
    if table.is_empty() {
        csv_writer.write_record(["transcript", "value"]).map_err(csv_err)?;
    }
    csv_writer.flush().map_err(|e| ScaleFileError::Io {
        path: origin.to_string(),
        source: e,
    })
}

pub fn write_scale_to_path(table: &BTreeMap<String, f64>, path: &Path) -> Result<(), ScaleFileError> {
    let file = std::fs::File::create(path).map_err(|e| ScaleFileError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    write_scale(table, std::io::BufWriter::new(file), &path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn writes_header_and_sorted_rows() {
        let table = BTreeMap::from([("T2".to_string(), 0.5), ("T1".to_string(), 2.0)]);
        let mut buffer = Vec::new();
        write_scale(&table, &mut buffer, "memory").unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "transcript,value\nT1,2.0\nT2,0.5\n"
        );
    }

    #[test]
    fn written_scale_reads_back_exactly() {
        let table = BTreeMap::from([
            ("T1".to_string(), 1.0 / 3.0),
            ("T2".to_string(), 123.456789),
        ]);
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.scale");
        write_scale_to_path(&table, &path).unwrap();
        assert_eq!(read_scale_from_path(&path).unwrap(), table);
    }

    #[test]
    fn empty_table_still_has_header() {
        let mut buffer = Vec::new();
        write_scale(&BTreeMap::new(), &mut buffer, "memory").unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "transcript,value\n");
        assert!(read_scale(&b"transcript,value\n"[..], "memory").unwrap().is_empty());
    }

    #[test]
    fn malformed_value_is_csv_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.scale");
        fs::write(&path, "transcript,value\nT1,abc\n").unwrap();
        assert!(matches!(
            read_scale_from_path(&path),
            Err(ScaleFileError::Csv { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            read_scale_from_path(&dir.path().join("none.scale")),
            Err(ScaleFileError::Io { .. })
        ));
    }
}
