use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::{RtscToReactArgs, SamToRtscArgs};
use crate::error::{CliError, Result};
use crate::utils::naming::{
    CSV_EXTENSION, REACT_EXTENSION, check_extension, react_output_name, scale_path_for,
    unresolved_path_for,
};
use std::path::PathBuf;
use std::str::FromStr;
use structurefold::core::flags::FlagProperty;
use structurefold::core::models::bases::TargetBases;
use structurefold::engine::config::{
    self as core_config, ReactivityConfig, ReadFilterConfig, ScaleSource,
};

pub fn build_sam_to_rtsc_config(args: &SamToRtscArgs) -> Result<core_config::SamToRtscConfig> {
    let defaults = DefaultsConfig::default();
    let file = FileConfig::load(args.config.as_deref())?
        .filter
        .unwrap_or_default();
    let overrides = apply_set_values(FileConfig::default(), &args.set_values)?
        .filter
        .unwrap_or_default();

    let extra_reject = file
        .extra_reject
        .unwrap_or_default()
        .iter()
        .map(|name| {
            FlagProperty::from_str(name).map_err(|e| CliError::Config(e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    let filter = ReadFilterConfig {
        max_mismatches: overrides
            .max_mismatches
            .or(args.mismatches)
            .or(file.max_mismatches)
            .unwrap_or(defaults.max_mismatches),
        accept_first_mismatch: overrides
            .accept_first_mismatch
            .or(args.first_mismatch.then_some(true))
            .or(file.accept_first_mismatch)
            .unwrap_or(defaults.accept_first_mismatch),
        accept_reverse: overrides
            .accept_reverse
            .or(args.reverse.then_some(true))
            .or(file.accept_reverse)
            .unwrap_or(defaults.accept_reverse),
        reject_secondary: overrides
            .reject_secondary
            .or(args.keep_secondary.then_some(false))
            .or(file.reject_secondary)
            .unwrap_or(defaults.reject_secondary),
        extra_reject,
    };

    let report_path = args
        .log_name
        .as_deref()
        .map(|name| check_extension(name, CSV_EXTENSION))
        .unwrap_or_else(|| PathBuf::from(&defaults.filter_log_name));

    core_config::SamToRtscConfigBuilder::new()
        .reference_path(args.fasta.clone())
        .sam_paths(args.sam.clone())
        .output_dir(args.out_dir.clone())
        .report_path(Some(report_path))
        .filter(filter)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

pub fn build_rtsc_to_react_config(
    args: &RtscToReactArgs,
) -> Result<core_config::RtscToReactConfig> {
    let defaults = DefaultsConfig::default();
    let file = FileConfig::load(args.config.as_deref())?
        .reactivity
        .unwrap_or_default();
    let overrides = apply_set_values(FileConfig::default(), &args.set_values)?
        .reactivity
        .unwrap_or_default();

    let bases = overrides
        .target_bases
        .or(args.bases.clone())
        .or(file.target_bases)
        .unwrap_or(defaults.target_bases);
    let target_bases: TargetBases = bases
        .parse()
        .map_err(|e| CliError::Config(format!("Invalid target bases '{}': {}", bases, e)))?;

    let reactivity = ReactivityConfig {
        log_transform: overrides
            .log_transform
            .or(args.ln_off.then_some(false))
            .or(file.log_transform)
            .unwrap_or(defaults.log_transform),
        normalize: overrides
            .normalize
            .or(args.nrm_off.then_some(false))
            .or(file.normalize)
            .unwrap_or(defaults.normalize),
        threshold: overrides
            .threshold
            .or(args.threshold)
            .or(file.threshold)
            .unwrap_or(defaults.threshold),
        target_bases,
    };

    let output_path = match &args.name {
        Some(name) => check_extension(name, REACT_EXTENSION),
        None => react_output_name(
            &args.control,
            &args.treatment,
            reactivity.log_transform,
            reactivity.normalize,
        ),
    };
    let scale = match &args.scale {
        Some(path) => ScaleSource::Load(path.clone()),
        None => ScaleSource::Compute {
            output_path: scale_path_for(&output_path),
        },
    };
    let unresolved_path = args.save_fails.then(|| unresolved_path_for(&output_path));

    core_config::RtscToReactConfigBuilder::new()
        .control_path(args.control.clone())
        .treatment_path(args.treatment.clone())
        .reference_path(args.fasta.clone())
        .restrict_path(args.restrict.clone())
        .scale(scale)
        .reactivity(reactivity)
        .output_path(output_path)
        .unresolved_path(unresolved_path)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "filter.max-mismatches" => {
                config.filter.get_or_insert_with(Default::default).max_mismatches =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "filter.accept-first-mismatch" => {
                config
                    .filter
                    .get_or_insert_with(Default::default)
                    .accept_first_mismatch = Some(parse_value(key, value_str, "boolean")?);
            }
            "filter.accept-reverse" => {
                config.filter.get_or_insert_with(Default::default).accept_reverse =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "filter.reject-secondary" => {
                config.filter.get_or_insert_with(Default::default).reject_secondary =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "reactivity.threshold" => {
                config.reactivity.get_or_insert_with(Default::default).threshold =
                    Some(parse_value(key, value_str, "float")?);
            }
            "reactivity.target-bases" => {
                config.reactivity.get_or_insert_with(Default::default).target_bases =
                    Some(value_str.to_string());
            }
            "reactivity.log-transform" => {
                config.reactivity.get_or_insert_with(Default::default).log_transform =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "reactivity.normalize" => {
                config.reactivity.get_or_insert_with(Default::default).normalize =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
