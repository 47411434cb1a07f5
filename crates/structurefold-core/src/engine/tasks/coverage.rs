use crate::core::io::table::Table;
use crate::core::models::bases::TargetBases;
use crate::core::models::profile::StopProfile;
use crate::core::models::reference::ReferenceSet;
use crate::engine::error::EngineError;
use std::collections::{BTreeMap, BTreeSet};
use tracing::instrument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 1.0;

/// Stops per target base, counting a stop at `i` against `sequence[i - 1]`.
/// Zero when the transcript has no target bases.
pub fn transcript_coverage(stops: &[u64], sequence: &[u8], targets: &TargetBases) -> f64 {
    let eligible = sequence
        .iter()
        .take(sequence.len().saturating_sub(1))
        .filter(|&&base| targets.contains(base))
        .count();
    if eligible == 0 {
        return 0.0;
    }
    let covered: u64 = sequence
        .iter()
        .zip(stops.iter().skip(1))
        .filter(|(base, _)| targets.contains(**base))
        .map(|(_, &count)| count)
        .sum();
    covered as f64 / eligible as f64
}

#[instrument(skip_all, name = "coverage_task")]
pub fn run(
    profile: &StopProfile,
    reference: &ReferenceSet,
    targets: &TargetBases,
) -> Result<BTreeMap<String, f64>, EngineError> {
    let entries: Vec<(&str, &[u64])> = profile.iter().collect();

    #[cfg(not(feature = "parallel"))]
    let iterator = entries.into_iter();

    #[cfg(feature = "parallel")]
    let iterator = entries.into_par_iter();

    iterator
        .map(|(transcript, stops)| {
            let sequence =
                reference
                    .get(transcript)
                    .ok_or_else(|| EngineError::MissingReference {
                        transcript: transcript.to_string(),
                    })?;
            if sequence.len() != stops.len() {
                return Err(EngineError::LengthMismatch {
                    transcript: transcript.to_string(),
                    expected: sequence.len(),
                    found: stops.len(),
                });
            }
            Ok((
                transcript.to_string(),
                transcript_coverage(stops, sequence, targets),
            ))
        })
        .collect()
}

/// Coverage of every transcript in every sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageReport {
    samples: BTreeMap<String, BTreeMap<String, f64>>,
}

impl CoverageReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sample: impl Into<String>, coverage: BTreeMap<String, f64>) {
        self.samples.insert(sample.into(), coverage);
    }

    /// Columns `<sample>_coverage` per sample; rows for the union of
    /// transcripts, `NA` where a sample lacks one.
    pub fn to_table(&self) -> Table {
        let mut header = vec!["transcript".to_string()];
        header.extend(self.samples.keys().map(|s| format!("{s}_coverage")));
        let mut table = Table::new(header);

        let transcripts: BTreeSet<&str> = self
            .samples
            .values()
            .flat_map(|c| c.keys().map(String::as_str))
            .collect();
        for transcript in transcripts {
            let mut row = vec![transcript.to_string()];
            row.extend(self.samples.values().map(|coverage| {
                coverage
                    .get(transcript)
                    .map_or_else(|| "NA".to_string(), |v| format!("{v:?}"))
            }));
            table.push(row);
        }
        table
    }

    /// Transcripts present in every sample with coverage at least `threshold`
    /// in each.
    pub fn overlap(&self, threshold: f64) -> BTreeSet<String> {
        let mut samples = self.samples.values();
        let Some(first) = samples.next() else {
            return BTreeSet::new();
        };
        let rest: Vec<_> = samples.collect();
        first
            .iter()
            .filter(|(transcript, value)| {
                **value >= threshold
                    && rest
                        .iter()
                        .all(|c| c.get(*transcript).is_some_and(|v| *v >= threshold))
            })
            .map(|(transcript, _)| transcript.clone())
            .collect()
    }
}
