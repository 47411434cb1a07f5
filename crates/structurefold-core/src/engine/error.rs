use thiserror::Error;

use super::aggregation::AggregationError;
use super::config::ConfigError;
use crate::core::io::fasta::FastaError;
use crate::core::io::scale::ScaleFileError;
use crate::core::io::table::TableError;
use crate::core::io::traits::ProfileFormatError;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read reference sequences from '{path}': {source}", path = path.display())]
    Reference { path: PathBuf, source: FastaError },

    #[error("Failed to process profile file '{path}': {source}", path = path.display())]
    ProfileFile {
        path: PathBuf,
        source: ProfileFormatError,
    },

    #[error("Failed to process alignments in '{path}': {source}", path = path.display())]
    Alignment {
        path: PathBuf,
        source: AggregationError,
    },

    #[error("I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    ScaleFile(#[from] ScaleFileError),

    #[error(transparent)]
    Report(#[from] TableError),

    #[error(
        "Input '{input}' would overwrite output '{output}' of an earlier input",
        input = input.display(),
        output = output.display()
    )]
    DuplicateOutput { input: PathBuf, output: PathBuf },

    #[error("Transcript '{transcript}' is not present in the reference sequences")]
    MissingReference { transcript: String },

    #[error(
        "Length mismatch for transcript '{transcript}': expected {expected} positions, found {found}"
    )]
    LengthMismatch {
        transcript: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "Control and treatment cover different transcripts ({only_control} only in control, {only_treatment} only in treatment, e.g. '{example}')"
    )]
    TranscriptSetMismatch {
        only_control: usize,
        only_treatment: usize,
        example: String,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
