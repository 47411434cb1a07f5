use super::{load_reference, load_rtsc};
use crate::cli::CoverageArgs;
use crate::error::{CliError, Result};
use crate::utils::naming::{
    CSV_EXTENSION, RTSC_EXTENSION, TXT_EXTENSION, check_extension, joined_name, sample_name,
};
use structurefold::core::io::transcripts::write_transcript_list_to_path;
use structurefold::core::models::bases::TargetBases;
use structurefold::engine::tasks::coverage::{self, CoverageReport};
use structurefold::engine::error::EngineError;
use tracing::info;

pub fn run(args: CoverageArgs) -> Result<()> {
    let targets: TargetBases = args
        .bases
        .parse()
        .map_err(|e| CliError::Argument(format!("--bases '{}': {}", args.bases, e)))?;
    let reference = load_reference(&args.fasta)?;

    let mut report = CoverageReport::new();
    for path in &args.rtsc {
        let profile = load_rtsc(path)?;
        let values = coverage::run(&profile, &reference, &targets)?;
        info!(file = %path.display(), transcripts = values.len(), "Coverage calculated.");
        report.insert(sample_name(path, RTSC_EXTENSION), values);
    }

    let output_path = match &args.name {
        Some(name) => check_extension(name, CSV_EXTENSION),
        None => joined_name(&args.rtsc, RTSC_EXTENSION, &["coverage"], CSV_EXTENSION),
    };
    report
        .to_table()
        .write_to_path(&output_path)
        .map_err(EngineError::Report)?;
    println!("Wrote {}", output_path.display());

    if args.overlap {
        let threshold = format!("{:?}", args.overlap_threshold);
        let overlap_path = match &args.overlap_name {
            Some(name) => check_extension(name, TXT_EXTENSION),
            None => joined_name(
                &args.rtsc,
                RTSC_EXTENSION,
                &["overlap", threshold.as_str()],
                TXT_EXTENSION,
            ),
        };
        let shared = report.overlap(args.overlap_threshold);
        write_transcript_list_to_path(shared.iter().map(String::as_str), &overlap_path)?;
        println!(
            "Wrote {} transcript(s) passing coverage {} to {}",
            shared.len(),
            threshold,
            overlap_path.display()
        );
    }
    Ok(())
}
