use crate::core::io::fasta::read_reference_from_path;
use crate::core::io::react::ReactFile;
use crate::core::io::rtsc::RtscFile;
use crate::core::io::traits::ProfileFile;
use crate::core::io::transcripts::{read_transcript_list_from_path, write_transcript_list_to_path};
use crate::core::models::profile::StopProfile;
use crate::engine::config::{RtscToReactConfig, ScaleSource};
use crate::engine::error::EngineError;
use crate::engine::final_reactivity::{FinalReactivity, calculate_final_reactivity};
use crate::engine::progress::ProgressReporter;
use crate::engine::reactivity::derive_raw_reactivity;
use crate::engine::scale::NormalizationScale;
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct RtscToReactResult {
    pub reactivity: FinalReactivity,
    pub scale: NormalizationScale,
}

fn load_stops(path: &Path) -> Result<StopProfile, EngineError> {
    RtscFile::read_from_path(path).map_err(|source| EngineError::ProfileFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Fails unless both profiles cover exactly the same transcripts.
fn ensure_same_transcripts(control: &StopProfile, treatment: &StopProfile) -> Result<(), EngineError> {
    let only_control: Vec<&str> = control
        .transcripts()
        .filter(|name| !treatment.contains(name))
        .collect();
    let only_treatment: Vec<&str> = treatment
        .transcripts()
        .filter(|name| !control.contains(name))
        .collect();
    match only_control.first().or(only_treatment.first()) {
        None => Ok(()),
        Some(example) => Err(EngineError::TranscriptSetMismatch {
            only_control: only_control.len(),
            only_treatment: only_treatment.len(),
            example: example.to_string(),
        }),
    }
}

/// Derives final reactivities from a control/treatment pair. Outputs (the
/// `.react` file, a newly computed scale, the unresolved list) are written
/// only after every step has succeeded.
#[instrument(skip_all, name = "rtsc_to_react_workflow")]
pub fn run(
    config: &RtscToReactConfig,
    reporter: &ProgressReporter,
) -> Result<RtscToReactResult, EngineError> {
    let settings = &config.reactivity;

    let (reference, mut control, mut treatment) = reporter.phase("Loading Inputs", || {
        let reference =
            read_reference_from_path(&config.reference_path).map_err(|source| {
                EngineError::Reference {
                    path: config.reference_path.clone(),
                    source,
                }
            })?;
        let control = load_stops(&config.control_path)?;
        let treatment = load_stops(&config.treatment_path)?;
        Ok::<_, EngineError>((reference, control, treatment))
    })?;

    if let Some(restrict_path) = &config.restrict_path {
        let keep = read_transcript_list_from_path(restrict_path)
            .map_err(|e| EngineError::io(restrict_path, e))?;
        control.retain(|name| keep.contains(name));
        treatment.retain(|name| keep.contains(name));
        info!(
            restrict = keep.len(),
            remaining = control.len(),
            "Restricted profiles to transcript list."
        );
    }
    ensure_same_transcripts(&control, &treatment)?;

    let raw = reporter.phase("Deriving Reactivity", || {
        derive_raw_reactivity(&control, &treatment, settings.log_transform)
    })?;
    info!(
        transcripts = raw.len(),
        log_transform = settings.log_transform,
        "Raw reactivity derived."
    );

    let scale = reporter.phase("Normalizing", || match &config.scale {
        ScaleSource::Compute { .. } => {
            NormalizationScale::compute(&raw, &reference, &settings.target_bases)
        }
        ScaleSource::Load(path) => NormalizationScale::load(path),
    })?;

    let reactivity = calculate_final_reactivity(
        &raw,
        &reference,
        &settings.target_bases,
        settings.threshold,
        &scale,
        settings.normalize,
    )?;

    reporter.phase("Writing Outputs", || -> Result<(), EngineError> {
        if let ScaleSource::Compute { output_path } = &config.scale {
            scale.save(output_path)?;
            info!(path = %output_path.display(), entries = scale.len(), "Wrote normalization scale.");
        }
        ReactFile::write_to_path(&reactivity.profile, &config.output_path).map_err(|source| {
            EngineError::ProfileFile {
                path: config.output_path.clone(),
                source,
            }
        })?;
        info!(path = %config.output_path.display(), "Wrote reactivity profile.");
        if let Some(unresolved_path) = &config.unresolved_path {
            write_transcript_list_to_path(
                reactivity.unresolved.iter().map(String::as_str),
                unresolved_path,
            )
            .map_err(|e| EngineError::io(unresolved_path, e))?;
        }
        Ok(())
    })?;

    if !reactivity.unresolved.is_empty() {
        reporter.message(format!(
            "{} transcript(s) had no usable normalization scale",
            reactivity.unresolved.len()
        ));
    }

    Ok(RtscToReactResult { reactivity, scale })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{ReactivityConfig, RtscToReactConfigBuilder};
    use crate::engine::progress::Progress;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::{TempDir, tempdir};

    struct Fixture {
        dir: TempDir,
        fasta: PathBuf,
        control: PathBuf,
        treatment: PathBuf,
    }

    fn fixture(control: &str, treatment: &str) -> Fixture {
        let dir = tempdir().unwrap();
        let fasta = dir.path().join("ref.fa");
        fs::write(&fasta, ">T1\nAGCA\n>T2\nCCCC\n").unwrap();
        let control_path = dir.path().join("control.rtsc");
        fs::write(&control_path, control).unwrap();
        let treatment_path = dir.path().join("treatment.rtsc");
        fs::write(&treatment_path, treatment).unwrap();
        Fixture {
            dir,
            fasta,
            control: control_path,
            treatment: treatment_path,
        }
    }

    fn builder(fx: &Fixture) -> RtscToReactConfigBuilder {
        RtscToReactConfigBuilder::new()
            .control_path(fx.control.clone())
            .treatment_path(fx.treatment.clone())
            .reference_path(fx.fasta.clone())
            .output_path(fx.dir.path().join("out.react"))
            .reactivity(ReactivityConfig {
                log_transform: false,
                ..Default::default()
            })
    }

    #[test]
    fn loaded_scale_drives_final_values_and_unresolved_list() {
        let fx = fixture(
            "T1\n1\t1\t1\t1\n\nT2\n1\t1\t1\t1\n\n",
            "T1\n0\t3\t0\t1\n\nT2\n1\t1\t1\t1\n\n",
        );
        let scale_path = fx.dir.path().join("baseline.scale");
        fs::write(&scale_path, "transcript,value\nT1,0.25\n").unwrap();
        let unresolved_path = fx.dir.path().join("out_unresolvable_transcripts.txt");
        let config = builder(&fx)
            .scale(ScaleSource::Load(scale_path))
            .unresolved_path(Some(unresolved_path.clone()))
            .build()
            .unwrap();

        let messages = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Message(text) = event {
                messages.lock().unwrap().push(text);
            }
        }));
        let result = run(&config, &reporter).unwrap();
        drop(reporter);
        assert_eq!(
            messages.into_inner().unwrap(),
            vec!["1 transcript(s) had no usable normalization scale"]
        );
        // treatment [0,3,0,1] and control [1,1,1,1] give raw [0,2,0,0]
        // seq AGCA: A -> min(raw[1]/0.25, 7), G -> NA, C -> raw[3]/0.25, terminal NA
        assert_eq!(
            result.reactivity.profile.get("T1").unwrap(),
            &[Some(7.0), None, Some(0.0), None]
        );
        assert_eq!(
            fs::read_to_string(fx.dir.path().join("out.react")).unwrap(),
            "T1\n7.0\tNA\t0.0\tNA\n"
        );
        assert_eq!(fs::read_to_string(unresolved_path).unwrap(), "T2\n");
    }

    #[test]
    fn computed_scale_is_persisted_and_reusable() {
        let control = "T1\n1\t1\t1\t1\n\n";
        let treatment = "T1\n0\t5\t1\t2\n\n";
        let fx = fixture(control, treatment);
        let scale_path = fx.dir.path().join("run.scale");
        let config = builder(&fx)
            .scale(ScaleSource::Compute {
                output_path: scale_path.clone(),
            })
            .build()
            .unwrap();
        let computed = run(&config, &ProgressReporter::new()).unwrap();
        assert!(scale_path.exists());

        let reuse = builder(&fx)
            .scale(ScaleSource::Load(scale_path))
            .build()
            .unwrap();
        let first = run(&reuse, &ProgressReporter::new()).unwrap();
        let second = run(&reuse, &ProgressReporter::new()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.reactivity, computed.reactivity);
    }

    #[test]
    fn mismatched_transcript_sets_halt_before_output() {
        let fx = fixture("T1\n1\t1\t1\t1\n\n", "T2\n1\t1\t1\t1\n\n");
        let scale_path = fx.dir.path().join("run.scale");
        let config = builder(&fx)
            .scale(ScaleSource::Compute {
                output_path: scale_path.clone(),
            })
            .build()
            .unwrap();
        let err = run(&config, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::TranscriptSetMismatch {
                only_control: 1,
                only_treatment: 1,
                ..
            }
        ));
        assert!(!scale_path.exists());
        assert!(!fx.dir.path().join("out.react").exists());
    }

    #[test]
    fn restrict_list_resolves_set_mismatch() {
        let fx = fixture(
            "T1\n1\t1\t1\t1\n\nT2\n1\t1\t1\t1\n\n",
            "T1\n1\t2\t1\t1\n\n",
        );
        let restrict = fx.dir.path().join("keep.txt");
        fs::write(&restrict, "T1\n").unwrap();
        let scale_path = fx.dir.path().join("baseline.scale");
        fs::write(&scale_path, "transcript,value\nT1,1.0\n").unwrap();
        let config = builder(&fx)
            .restrict_path(Some(restrict))
            .scale(ScaleSource::Load(scale_path))
            .build()
            .unwrap();
        let result = run(&config, &ProgressReporter::new()).unwrap();
        assert_eq!(
            result.reactivity.profile.transcripts().collect::<Vec<_>>(),
            vec!["T1"]
        );
    }
}
