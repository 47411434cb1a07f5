use structurefold::core::models::bases::DEFAULT_TARGET_BASES;
use structurefold::engine::config::{DEFAULT_MAX_MISMATCHES, DEFAULT_REACTIVITY_CAP};

pub struct DefaultsConfig {
    pub max_mismatches: u32,
    pub accept_first_mismatch: bool,
    pub accept_reverse: bool,
    pub reject_secondary: bool,
    pub threshold: f64,
    pub target_bases: String,
    pub log_transform: bool,
    pub normalize: bool,
    pub filter_log_name: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_mismatches: DEFAULT_MAX_MISMATCHES,
            accept_first_mismatch: false,
            accept_reverse: false,
            reject_secondary: true,
            threshold: DEFAULT_REACTIVITY_CAP,
            target_bases: DEFAULT_TARGET_BASES.to_string(),
            log_transform: true,
            normalize: true,
            filter_log_name: "filter_log.csv".to_string(),
        }
    }
}
