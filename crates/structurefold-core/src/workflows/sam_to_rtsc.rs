use crate::core::io::fasta::read_reference_from_path;
use crate::core::io::rtsc::RtscFile;
use crate::core::io::traits::ProfileFile;
use crate::core::models::reference::ReferenceSet;
use crate::engine::aggregation::{self, ReadFilter, RejectionReport, RejectionTally};
use crate::engine::config::SamToRtscConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub const RTSC_EXTENSION: &str = "rtsc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamToRtscResult {
    pub report: RejectionReport,
    /// Written `.rtsc` files, in input order.
    pub outputs: Vec<PathBuf>,
}

/// `dir/x.sam` becomes `<output_dir or dir>/x.rtsc`.
pub fn rtsc_output_path(sam_path: &Path, output_dir: Option<&Path>) -> PathBuf {
    let mut file_name = sam_path.file_stem().unwrap_or_default().to_os_string();
    file_name.push(".");
    file_name.push(RTSC_EXTENSION);
    let file_name = PathBuf::from(file_name);
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => sam_path
            .parent()
            .map_or_else(|| file_name.clone(), |parent| parent.join(&file_name)),
    }
}

/// Output paths for every input, failing if two inputs would write the same
/// `.rtsc` file.
fn planned_outputs(
    sam_paths: &[PathBuf],
    output_dir: Option<&Path>,
) -> Result<Vec<PathBuf>, EngineError> {
    let mut seen = HashSet::with_capacity(sam_paths.len());
    sam_paths
        .iter()
        .map(|sam_path| {
            let output = rtsc_output_path(sam_path, output_dir);
            if seen.insert(output.clone()) {
                Ok(output)
            } else {
                Err(EngineError::DuplicateOutput {
                    input: sam_path.clone(),
                    output,
                })
            }
        })
        .collect()
}

fn process_sample(
    sam_path: &Path,
    reference: &ReferenceSet,
    filter: ReadFilter,
    output_path: &Path,
) -> Result<RejectionTally, EngineError> {
    let file = File::open(sam_path).map_err(|e| EngineError::io(sam_path, e))?;
    let (profile, tally) = aggregation::aggregate(BufReader::new(file), reference, filter)
        .map_err(|source| EngineError::Alignment {
            path: sam_path.to_path_buf(),
            source,
        })?;

    RtscFile::write_to_path(&profile, output_path).map_err(|source| {
        EngineError::ProfileFile {
            path: output_path.to_path_buf(),
            source,
        }
    })?;
    info!(
        sample = %sam_path.display(),
        output = %output_path.display(),
        passing = tally.get(aggregation::PASSING_KEY).copied().unwrap_or(0),
        "Wrote stop profile."
    );
    Ok(tally)
}

/// Counts RT stops for every SAM file independently and writes one `.rtsc`
/// per input. Files are processed concurrently when the `parallel` feature is
/// enabled; the report is keyed by each input path as given and therefore
/// independent of completion order.
#[instrument(skip_all, name = "sam_to_rtsc_workflow")]
pub fn run(
    config: &SamToRtscConfig,
    reporter: &ProgressReporter,
) -> Result<SamToRtscResult, EngineError> {
    let reference = reporter.phase("Loading Reference", || {
        read_reference_from_path(&config.reference_path).map_err(|source| EngineError::Reference {
            path: config.reference_path.clone(),
            source,
        })
    })?;
    info!(transcripts = reference.len(), "Reference sequences loaded.");

    let outputs = planned_outputs(&config.sam_paths, config.output_dir.as_deref())?;
    if let Some(dir) = &config.output_dir {
        std::fs::create_dir_all(dir).map_err(|e| EngineError::io(dir, e))?;
    }

    let filter = ReadFilter::from(&config.filter);

    reporter.report(Progress::PhaseStart {
        name: "Counting RT Stops",
    });
    reporter.report(Progress::TaskStart {
        total_steps: config.sam_paths.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = config.sam_paths.iter().zip(outputs.iter());

    #[cfg(feature = "parallel")]
    let iterator = config.sam_paths.par_iter().zip(outputs.par_iter());

    let tallies: Vec<RejectionTally> = iterator
        .map(|(sam_path, output)| -> Result<_, EngineError> {
            let tally = process_sample(sam_path, &reference, filter, output)?;
            reporter.report(Progress::TaskIncrement);
            Ok(tally)
        })
        .collect::<Result<_, EngineError>>()?;

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let mut report = RejectionReport::new();
    for (sam_path, tally) in config.sam_paths.iter().zip(tallies) {
        report.insert(sam_path.display().to_string(), tally);
    }
    let result = SamToRtscResult { report, outputs };

    if let Some(report_path) = &config.report_path {
        result.report.to_table().write_to_path(report_path)?;
        info!(path = %report_path.display(), "Wrote filter report.");
    }

    info!(samples = result.outputs.len(), "Alignment processing complete.");
    Ok(result)
}
