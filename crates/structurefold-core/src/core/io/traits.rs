use crate::core::models::profile::Profile;
use std::error::Error as StdError;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Defines the interface for reading and writing per-transcript profile files.
///
/// Implementors handle the record layout of one format; path-based helpers
/// are provided on top of the reader/writer methods.
pub trait ProfileFile {
    /// Per-position value stored by the format.
    type Value;

    /// The error type for I/O and parse failures.
    type Error: StdError + From<io::Error>;

    /// Reads every record from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if a record is malformed or truncated, or if reading fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Profile<Self::Value>, Self::Error>;

    /// Writes every transcript of `profile`, in name order.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(profile: &Profile<Self::Value>, writer: &mut impl Write)
    -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Profile<Self::Value>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(
        profile: &Profile<Self::Value>,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(profile, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ProfileFormatError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: invalid value '{value}'")]
    InvalidValue { line: usize, value: String },
    #[error("Truncated record for transcript '{transcript}' at end of input (expected {expected} lines)")]
    Truncated {
        transcript: String,
        expected: usize,
    },
    #[error("Line {line} should separate records but is not blank")]
    MissingSeparator { line: usize },
    #[error("Empty transcript name on line {line}")]
    EmptyName { line: usize },
    #[error("Duplicate transcript '{transcript}' on line {line}")]
    DuplicateTranscript { transcript: String, line: usize },
}

/// Pulls fixed-size groups of lines from a reader, tracking line numbers.
pub(crate) struct RecordLines<'r, R> {
    lines: io::Lines<&'r mut R>,
    line_num: usize,
}

impl<'r, R: BufRead> RecordLines<'r, R> {
    pub(crate) fn new(reader: &'r mut R) -> Self {
        Self {
            lines: reader.lines(),
            line_num: 0,
        }
    }

    /// Next line with its 1-based number, or `None` at end of input.
    pub(crate) fn next_line(&mut self) -> Result<Option<(usize, String)>, io::Error> {
        match self.lines.next() {
            Some(line) => {
                self.line_num += 1;
                Ok(Some((self.line_num, line?)))
            }
            None => Ok(None),
        }
    }

    /// Reads the transcript-name line that opens the next record.
    pub(crate) fn next_name(&mut self) -> Result<Option<(usize, String)>, ProfileFormatError> {
        let Some((line, raw)) = self.next_line()? else {
            return Ok(None);
        };
        let name = raw.trim();
        if name.is_empty() {
            return Err(ProfileFormatError::EmptyName { line });
        }
        Ok(Some((line, name.to_string())))
    }

    /// Reads a line that must exist because a record has started.
    pub(crate) fn required_line(
        &mut self,
        transcript: &str,
        expected: usize,
    ) -> Result<(usize, String), ProfileFormatError> {
        self.next_line()?.ok_or_else(|| ProfileFormatError::Truncated {
            transcript: transcript.to_string(),
            expected,
        })
    }
}
