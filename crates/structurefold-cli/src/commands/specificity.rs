use super::{load_reference, load_rtsc};
use crate::cli::SpecificityArgs;
use crate::error::{CliError, Result};
use crate::utils::naming::{CSV_EXTENSION, RTSC_EXTENSION, check_extension, joined_name, sample_name};
use structurefold::core::models::bases::TargetBases;
use structurefold::engine::tasks::specificity::{self, SpecificityReport};
use structurefold::engine::error::EngineError;
use tracing::info;

pub fn run(args: SpecificityArgs) -> Result<()> {
    let report_bases: TargetBases = args
        .report
        .parse()
        .map_err(|e| CliError::Argument(format!("--report '{}': {}", args.report, e)))?;
    let reference = load_reference(&args.fasta)?;

    let mut report = SpecificityReport::new();
    for path in &args.rtsc {
        let profile = load_rtsc(path)?;
        let counts = specificity::run(&profile, &reference)?;
        info!(file = %path.display(), stops = counts.values().sum::<u64>(), "Specificity tallied.");
        report.insert(sample_name(path, RTSC_EXTENSION), counts);
    }

    let output_path = match &args.name {
        Some(name) => check_extension(name, CSV_EXTENSION),
        None => joined_name(
            &args.rtsc,
            RTSC_EXTENSION,
            &[args.report.as_str(), "specificity"],
            CSV_EXTENSION,
        ),
    };
    report
        .to_table(&report_bases, args.digits)
        .write_to_path(&output_path)
        .map_err(EngineError::Report)?;
    println!("Wrote {}", output_path.display());
    Ok(())
}
