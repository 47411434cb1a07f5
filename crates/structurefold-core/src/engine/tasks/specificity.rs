use crate::core::io::table::Table;
use crate::core::models::bases::TargetBases;
use crate::core::models::profile::StopProfile;
use crate::core::models::reference::ReferenceSet;
use crate::engine::error::EngineError;
use std::collections::BTreeMap;
use tracing::instrument;

pub const DEFAULT_REPORT_BASES: &str = "ACGT";
pub const DEFAULT_DIGITS: u32 = 5;

/// Stops attributed to each preceding base, keyed by upper-case base.
pub type BaseCounts = BTreeMap<char, u64>;

#[instrument(skip_all, name = "specificity_task")]
pub fn run(profile: &StopProfile, reference: &ReferenceSet) -> Result<BaseCounts, EngineError> {
    let mut counts = BaseCounts::new();
    for (transcript, stops) in profile.iter() {
        let sequence = reference
            .get(transcript)
            .ok_or_else(|| EngineError::MissingReference {
                transcript: transcript.to_string(),
            })?;
        let preceding = &sequence[..sequence.len().saturating_sub(1)];
        for (&base, &count) in preceding.iter().zip(stops.iter().skip(1)) {
            *counts.entry(base.to_ascii_uppercase() as char).or_insert(0) += count;
        }
    }
    Ok(counts)
}

fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecificityReport {
    samples: BTreeMap<String, BaseCounts>,
}

impl SpecificityReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sample: impl Into<String>, counts: BaseCounts) {
        self.samples.insert(sample.into(), counts);
    }

    /// Rows `file,base,count,specificity` for observed bases in `report`.
    /// Specificity is relative to all stops of the sample, including bases
    /// outside `report`.
    pub fn to_table(&self, report: &TargetBases, digits: u32) -> Table {
        let mut table = Table::new(
            ["file", "base", "count", "specificity"]
                .map(String::from)
                .to_vec(),
        );
        for (sample, counts) in &self.samples {
            let total: u64 = counts.values().sum();
            for (&base, &count) in counts {
                if !base.is_ascii() || !report.contains(base as u8) {
                    continue;
                }
                let specificity = if total == 0 {
                    0.0
                } else {
                    round_to(count as f64 / total as f64, digits)
                };
                table.push(vec![
                    sample.clone(),
                    base.to_string(),
                    count.to_string(),
                    specificity.to_string(),
                ]);
            }
        }
        table
    }
}
