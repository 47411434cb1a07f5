use super::load_rtsc;
use crate::cli::CombineArgs;
use crate::error::Result;
use crate::utils::naming::{RTSC_EXTENSION, check_extension, joined_name};
use structurefold::core::io::rtsc::RtscFile;
use structurefold::core::io::traits::ProfileFile;
use structurefold::engine::tasks;
use structurefold::engine::error::EngineError;
use tracing::info;

pub fn run(args: CombineArgs) -> Result<()> {
    let output_path = match &args.name {
        Some(name) => check_extension(name, RTSC_EXTENSION),
        None => joined_name(&args.rtsc, RTSC_EXTENSION, &[], RTSC_EXTENSION),
    };

    let mut inputs = args.rtsc.clone();
    inputs.sort();
    let profiles = inputs
        .iter()
        .map(|path| load_rtsc(path))
        .collect::<Result<Vec<_>>>()?;

    let combined = tasks::combine::run(&profiles)?;
    info!(
        inputs = profiles.len(),
        transcripts = combined.len(),
        "Combined stop profiles."
    );

    RtscFile::write_to_path(&combined, &output_path).map_err(|source| {
        EngineError::ProfileFile {
            path: output_path.clone(),
            source,
        }
    })?;
    println!("Wrote {}", output_path.display());
    Ok(())
}
