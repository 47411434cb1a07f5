use crate::cli::RtscToReactArgs;
use crate::config::build_rtsc_to_react_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use structurefold::engine::config::ScaleSource;
use structurefold::engine::progress::ProgressReporter;
use structurefold::workflows;
use tracing::{info, warn};

pub fn run(args: RtscToReactArgs, quiet: bool) -> Result<()> {
    let config = build_rtsc_to_react_config(&args)?;
    info!(
        log_transform = config.reactivity.log_transform,
        normalize = config.reactivity.normalize,
        threshold = config.reactivity.threshold,
        bases = %config.reactivity.target_bases,
        "Resolved reactivity settings."
    );

    let progress_handler = CliProgressHandler::new(quiet);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let result = workflows::rtsc_to_react::run(&config, &reporter)?;
    let reactivity = &result.reactivity;

    if reactivity.profile.is_empty() {
        warn!("No transcript could be resolved against the normalization scale.");
    }
    println!(
        "Wrote {} transcript(s) to {}",
        reactivity.profile.len(),
        config.output_path.display()
    );
    if let ScaleSource::Compute { output_path } = &config.scale {
        println!(
            "Normalization scale ({} transcript(s)) written to {}",
            result.scale.len(),
            output_path.display()
        );
    }
    if !reactivity.unresolved.is_empty() {
        match &config.unresolved_path {
            Some(path) => println!(
                "{} unresolved transcript(s) listed in {}",
                reactivity.unresolved.len(),
                path.display()
            ),
            None => println!(
                "{} transcript(s) were unresolved (use --save-fails to list them)",
                reactivity.unresolved.len()
            ),
        }
    }
    Ok(())
}
