use crate::core::flags::{self, FlagProperty};
use crate::core::models::bases::TargetBases;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_MAX_MISMATCHES: u32 = 3;
pub const DEFAULT_REACTIVITY_CAP: f64 = 7.0;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {parameter}: {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// Which alignments contribute RT stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFilterConfig {
    pub max_mismatches: u32,
    pub accept_first_mismatch: bool,
    pub accept_reverse: bool,
    pub reject_secondary: bool,
    /// Additional flag properties that disqualify a read.
    pub extra_reject: Vec<FlagProperty>,
}

impl Default for ReadFilterConfig {
    fn default() -> Self {
        Self {
            max_mismatches: DEFAULT_MAX_MISMATCHES,
            accept_first_mismatch: false,
            accept_reverse: false,
            reject_secondary: true,
            extra_reject: Vec::new(),
        }
    }
}

impl ReadFilterConfig {
    /// Flag mask of every property that rejects a read. Unmapped reads are
    /// always rejected.
    pub fn reject_mask(&self) -> u16 {
        let mut properties = vec![FlagProperty::R1Unmap];
        if !self.accept_reverse {
            properties.push(FlagProperty::R1Reverse);
        }
        if self.reject_secondary {
            properties.push(FlagProperty::Secondary);
        }
        properties.extend(self.extra_reject.iter().copied());
        flags::encode(properties)
    }
}

/// How reactivities are derived and finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactivityConfig {
    pub log_transform: bool,
    pub normalize: bool,
    pub threshold: f64,
    pub target_bases: TargetBases,
}

impl Default for ReactivityConfig {
    fn default() -> Self {
        Self {
            log_transform: true,
            normalize: true,
            threshold: DEFAULT_REACTIVITY_CAP,
            target_bases: TargetBases::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleSource {
    /// Estimate the scale from this run and persist it to the given path.
    Compute { output_path: PathBuf },
    /// Reuse a previously persisted scale verbatim.
    Load(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamToRtscConfig {
    pub reference_path: PathBuf,
    pub sam_paths: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub filter: ReadFilterConfig,
}

#[derive(Default)]
pub struct SamToRtscConfigBuilder {
    reference_path: Option<PathBuf>,
    sam_paths: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    report_path: Option<PathBuf>,
    filter: Option<ReadFilterConfig>,
}

impl SamToRtscConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference_path(mut self, path: PathBuf) -> Self {
        self.reference_path = Some(path);
        self
    }
    pub fn sam_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.sam_paths = paths;
        self
    }
    pub fn output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }
    pub fn report_path(mut self, path: Option<PathBuf>) -> Self {
        self.report_path = path;
        self
    }
    pub fn filter(mut self, filter: ReadFilterConfig) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn build(self) -> Result<SamToRtscConfig, ConfigError> {
        if self.sam_paths.is_empty() {
            return Err(ConfigError::MissingParameter("sam_paths"));
        }
        Ok(SamToRtscConfig {
            reference_path: self
                .reference_path
                .ok_or(ConfigError::MissingParameter("reference_path"))?,
            sam_paths: self.sam_paths,
            output_dir: self.output_dir,
            report_path: self.report_path,
            filter: self.filter.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RtscToReactConfig {
    pub control_path: PathBuf,
    pub treatment_path: PathBuf,
    pub reference_path: PathBuf,
    pub restrict_path: Option<PathBuf>,
    pub scale: ScaleSource,
    pub reactivity: ReactivityConfig,
    pub output_path: PathBuf,
    pub unresolved_path: Option<PathBuf>,
}

#[derive(Default)]
pub struct RtscToReactConfigBuilder {
    control_path: Option<PathBuf>,
    treatment_path: Option<PathBuf>,
    reference_path: Option<PathBuf>,
    restrict_path: Option<PathBuf>,
    scale: Option<ScaleSource>,
    reactivity: Option<ReactivityConfig>,
    output_path: Option<PathBuf>,
    unresolved_path: Option<PathBuf>,
}

impl RtscToReactConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn control_path(mut self, path: PathBuf) -> Self {
        self.control_path = Some(path);
        self
    }
    pub fn treatment_path(mut self, path: PathBuf) -> Self {
        self.treatment_path = Some(path);
        self
    }
    pub fn reference_path(mut self, path: PathBuf) -> Self {
        self.reference_path = Some(path);
        self
    }
    pub fn restrict_path(mut self, path: Option<PathBuf>) -> Self {
        self.restrict_path = path;
        self
    }
    pub fn scale(mut self, source: ScaleSource) -> Self {
        self.scale = Some(source);
        self
    }
    pub fn reactivity(mut self, config: ReactivityConfig) -> Self {
        self.reactivity = Some(config);
        self
    }
    pub fn output_path(mut self, path: PathBuf) -> Self {
        self.output_path = Some(path);
        self
    }
    pub fn unresolved_path(mut self, path: Option<PathBuf>) -> Self {
        self.unresolved_path = path;
        self
    }

    pub fn build(self) -> Result<RtscToReactConfig, ConfigError> {
        let reactivity = self.reactivity.unwrap_or_default();
        if !(reactivity.threshold.is_finite() && reactivity.threshold > 0.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "threshold",
                reason: format!("must be a positive number, got {}", reactivity.threshold),
            });
        }
        Ok(RtscToReactConfig {
            control_path: self
                .control_path
                .ok_or(ConfigError::MissingParameter("control_path"))?,
            treatment_path: self
                .treatment_path
                .ok_or(ConfigError::MissingParameter("treatment_path"))?,
            reference_path: self
                .reference_path
                .ok_or(ConfigError::MissingParameter("reference_path"))?,
            restrict_path: self.restrict_path,
            scale: self.scale.ok_or(ConfigError::MissingParameter("scale"))?,
            reactivity,
            output_path: self
                .output_path
                .ok_or(ConfigError::MissingParameter("output_path"))?,
            unresolved_path: self.unresolved_path,
        })
    }
}
