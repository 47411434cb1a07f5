use crate::cli::SamToRtscArgs;
use crate::config::build_sam_to_rtsc_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use structurefold::engine::aggregation::PASSING_KEY;
use structurefold::engine::progress::ProgressReporter;
use structurefold::workflows;
use tracing::info;

pub fn run(args: SamToRtscArgs, quiet: bool) -> Result<()> {
    let config = build_sam_to_rtsc_config(&args)?;
    info!(
        samples = config.sam_paths.len(),
        reject_mask = config.filter.reject_mask(),
        max_mismatches = config.filter.max_mismatches,
        "Resolved alignment filter."
    );

    let progress_handler = CliProgressHandler::new(quiet);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let result = workflows::sam_to_rtsc::run(&config, &reporter)?;

    for (sample, tally) in result.report.iter() {
        let total: u64 = tally.values().sum();
        let passing = tally.get(PASSING_KEY).copied().unwrap_or(0);
        println!("{sample}: {passing} of {total} alignments passed the filter");
    }
    for output in &result.outputs {
        println!("Wrote {}", output.display());
    }
    if let Some(report_path) = &config.report_path {
        println!("Filter log written to {}", report_path.display());
    }
    Ok(())
}
