pub mod combine;
pub mod coverage;
pub mod react_stats;
pub mod rtsc_to_react;
pub mod sam_to_rtsc;
pub mod specificity;

use crate::error::{CliError, Result};
use std::path::Path;
use structurefold::core::io::fasta::read_reference_from_path;
use structurefold::core::io::rtsc::RtscFile;
use structurefold::core::io::traits::ProfileFile;
use structurefold::core::models::profile::StopProfile;
use structurefold::core::models::reference::ReferenceSet;

pub(crate) fn load_reference(path: &Path) -> Result<ReferenceSet> {
    read_reference_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

pub(crate) fn load_rtsc(path: &Path) -> Result<StopProfile> {
    RtscFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}
