use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileFilterConfig {
    pub max_mismatches: Option<u32>,
    pub accept_first_mismatch: Option<bool>,
    pub accept_reverse: Option<bool>,
    pub reject_secondary: Option<bool>,
    /// Additional flag property names, e.g. `["pcr_duplicate"]`.
    pub extra_reject: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileReactivityConfig {
    pub threshold: Option<f64>,
    pub target_bases: Option<String>,
    pub log_transform: Option<bool>,
    pub normalize: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub filter: Option<FileFilterConfig>,
    pub reactivity: Option<FileReactivityConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn kebab_case_sections_are_parsed() {
        let config: FileConfig = toml::from_str(
            r#"
            [filter]
            max-mismatches = 1
            extra-reject = ["pcr_duplicate"]

            [reactivity]
            target-bases = "ACGT"
            log-transform = false
            "#,
        )
        .unwrap();
        let filter = config.filter.unwrap();
        assert_eq!(filter.max_mismatches, Some(1));
        assert_eq!(filter.extra_reject, Some(vec!["pcr_duplicate".to_string()]));
        let reactivity = config.reactivity.unwrap();
        assert_eq!(reactivity.target_bases.as_deref(), Some("ACGT"));
        assert_eq!(reactivity.log_transform, Some(false));
        assert_eq!(reactivity.threshold, None);
    }

    #[test]
    fn unknown_keys_are_rejected_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[filter]\nmax_mismatches = 2\n").unwrap();
        let err = FileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { path: p, .. } if p == path));
    }

    #[test]
    fn missing_path_gives_empty_config() {
        assert_eq!(FileConfig::load(None).unwrap(), FileConfig::default());
    }
}
