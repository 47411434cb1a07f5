use crate::core::models::reference::ReferenceSet;
use needletail::parse_fastx_reader;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse FASTA: {0}")]
    Parse(String),
    #[error("FASTA record has an empty identifier")]
    EmptyIdentifier,
    #[error("Duplicate FASTA identifier '{0}'")]
    DuplicateIdentifier(String),
}

/// Loads reference transcripts keyed by the first word of each header.
pub fn read_reference<R: Read + Send>(reader: R) -> Result<ReferenceSet, FastaError> {
    let mut fastx = parse_fastx_reader(reader).map_err(|e| FastaError::Parse(e.to_string()))?;
    let mut reference = ReferenceSet::new();

    while let Some(result) = fastx.next() {
        let record = result.map_err(|e| FastaError::Parse(e.to_string()))?;
        let header = String::from_utf8_lossy(record.id());
        let name = header
            .split_whitespace()
            .next()
            .ok_or(FastaError::EmptyIdentifier)?
            .to_string();
        if reference.contains(&name) {
            return Err(FastaError::DuplicateIdentifier(name));
        }
        reference.insert(name, record.seq().into_owned());
    }

    Ok(reference)
}

pub fn read_reference_from_path<P: AsRef<Path>>(path: P) -> Result<ReferenceSet, FastaError> {
    let file = File::open(path)?;
    read_reference(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_multiline_records_by_first_header_word() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ref.fa");
        fs::write(&path, ">T1 some description\nacgt\nAC\n>T2\nGGG\n").unwrap();

        let reference = read_reference_from_path(&path).unwrap();
        assert_eq!(reference.len(), 2);
        assert_eq!(reference.get("T1"), Some(&b"ACGTAC"[..]));
        assert_eq!(reference.length("T2"), Some(3));
    }

    #[test]
    fn duplicate_identifiers_fail() {
        let content: &[u8] = b">T1\nA\n>T1 again\nC\n";
        let err = read_reference(content).unwrap_err();
        assert!(matches!(err, FastaError::DuplicateIdentifier(ref name) if name == "T1"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = read_reference_from_path(dir.path().join("absent.fa")).unwrap_err();
        assert!(matches!(err, FastaError::Io(_)));
    }
}
