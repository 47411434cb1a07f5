use crate::cli::ReactStatsArgs;
use crate::error::{CliError, Result};
use crate::utils::naming::{CSV_EXTENSION, REACT_EXTENSION, check_extension, joined_name, sample_name};
use structurefold::core::io::react::ReactFile;
use structurefold::core::io::traits::ProfileFile;
use structurefold::core::io::transcripts::read_transcript_list_from_path;
use structurefold::engine::tasks::statistics::StatisticsReport;
use structurefold::engine::error::EngineError;
use tracing::info;

pub fn run(args: ReactStatsArgs) -> Result<()> {
    let restrict = args
        .restrict
        .as_deref()
        .map(read_transcript_list_from_path)
        .transpose()?;

    let mut report = StatisticsReport::new(args.trim, args.minlen);
    for path in &args.react {
        let mut profile = ReactFile::read_from_path(path).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        })?;
        if let Some(keep) = &restrict {
            profile.retain(|name| keep.contains(name));
        }
        info!(file = %path.display(), transcripts = profile.len(), "Loaded reactivities.");
        report.add_sample(sample_name(path, REACT_EXTENSION), &profile);
    }

    let output_path = match &args.name {
        Some(name) => check_extension(name, CSV_EXTENSION),
        None => {
            let trim = format!("{}trim", args.trim);
            let minlen = format!("{}minlen", args.minlen);
            joined_name(
                &args.react,
                REACT_EXTENSION,
                &[trim.as_str(), minlen.as_str(), "statistics"],
                CSV_EXTENSION,
            )
        }
    };
    report
        .to_table()
        .write_to_path(&output_path)
        .map_err(EngineError::Report)?;
    println!("Wrote {}", output_path.display());
    Ok(())
}
