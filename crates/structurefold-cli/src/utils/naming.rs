//! Default output names derived from input file names.

use std::path::{Path, PathBuf};

pub const RTSC_EXTENSION: &str = ".rtsc";
pub const REACT_EXTENSION: &str = ".react";
pub const CSV_EXTENSION: &str = ".csv";
pub const TXT_EXTENSION: &str = ".txt";

/// Appends `extension` unless `name` already ends with it.
pub fn check_extension(name: &str, extension: &str) -> PathBuf {
    if name.ends_with(extension) {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{name}{extension}"))
    }
}

/// File name of `path` with a trailing `extension` removed.
pub fn sample_name(path: &Path, extension: &str) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    match file_name.strip_suffix(extension) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name,
    }
}

/// Sorted sample names of `inputs` followed by `suffixes`, joined with `_`.
pub fn joined_name(inputs: &[PathBuf], input_extension: &str, suffixes: &[&str], extension: &str) -> PathBuf {
    let mut parts: Vec<String> = inputs
        .iter()
        .map(|path| sample_name(path, input_extension))
        .collect();
    parts.sort();
    parts.extend(suffixes.iter().map(|s| s.to_string()));
    PathBuf::from(format!("{}{}", parts.join("_"), extension))
}

/// `<control>_<treatment>[_ln][_nrm].react`
pub fn react_output_name(control: &Path, treatment: &Path, log_transform: bool, normalize: bool) -> PathBuf {
    let mut parts = vec![
        sample_name(control, RTSC_EXTENSION),
        sample_name(treatment, RTSC_EXTENSION),
    ];
    if log_transform {
        parts.push("ln".to_string());
    }
    if normalize {
        parts.push("nrm".to_string());
    }
    PathBuf::from(format!("{}{}", parts.join("_"), REACT_EXTENSION))
}

pub fn scale_path_for(react_path: &Path) -> PathBuf {
    react_path.with_extension("scale")
}

pub fn unresolved_path_for(react_path: &Path) -> PathBuf {
    let stem = sample_name(react_path, REACT_EXTENSION);
    react_path.with_file_name(format!("{stem}_unresolvable_transcripts{TXT_EXTENSION}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_added_once() {
        assert_eq!(check_extension("out", ".react"), PathBuf::from("out.react"));
        assert_eq!(check_extension("out.react", ".react"), PathBuf::from("out.react"));
    }

    #[test]
    fn sample_names_drop_directory_and_extension() {
        assert_eq!(sample_name(Path::new("data/ctrl.rtsc"), RTSC_EXTENSION), "ctrl");
        assert_eq!(sample_name(Path::new("data/ctrl.txt"), RTSC_EXTENSION), "ctrl.txt");
    }

    #[test]
    fn react_name_reflects_processing() {
        let control = Path::new("runs/minus.rtsc");
        let treatment = Path::new("runs/plus.rtsc");
        assert_eq!(
            react_output_name(control, treatment, true, true),
            PathBuf::from("minus_plus_ln_nrm.react")
        );
        assert_eq!(
            react_output_name(control, treatment, false, true),
            PathBuf::from("minus_plus_nrm.react")
        );
        assert_eq!(
            react_output_name(control, treatment, true, false),
            PathBuf::from("minus_plus_ln.react")
        );
    }

    #[test]
    fn companion_files_follow_react_name() {
        let react = Path::new("out/minus_plus_ln_nrm.react");
        assert_eq!(scale_path_for(react), PathBuf::from("out/minus_plus_ln_nrm.scale"));
        assert_eq!(
            unresolved_path_for(react),
            PathBuf::from("out/minus_plus_ln_nrm_unresolvable_transcripts.txt")
        );
    }

    #[test]
    fn joined_names_sort_inputs() {
        let inputs = vec![PathBuf::from("b.rtsc"), PathBuf::from("x/a.rtsc")];
        assert_eq!(
            joined_name(&inputs, RTSC_EXTENSION, &["coverage"], CSV_EXTENSION),
            PathBuf::from("a_b_coverage.csv")
        );
        assert_eq!(
            joined_name(&inputs, RTSC_EXTENSION, &[], RTSC_EXTENSION),
            PathBuf::from("a_b.rtsc")
        );
    }
}
