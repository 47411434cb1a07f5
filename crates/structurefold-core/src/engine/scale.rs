use super::error::EngineError;
use crate::core::io::scale::{read_scale_from_path, write_scale_to_path};
use crate::core::models::bases::TargetBases;
use crate::core::models::profile::RawReactivity;
use crate::core::models::reference::ReferenceSet;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Lower edge of the descending-rank window used for the scale, as a fraction
/// of eligible positions.
pub const SCALE_WINDOW_START: f64 = 0.02;
/// Upper edge (exclusive) of the descending-rank window. Historically described
/// as 8%, scale files in circulation were produced with 10%.
pub const SCALE_WINDOW_END: f64 = 0.10;

/// Index range `[floor(0.02 n), floor(0.10 n))` into `n` values sorted descending.
pub fn window_bounds(n: usize) -> (usize, usize) {
    let start = (n as f64 * SCALE_WINDOW_START) as usize;
    let end = (n as f64 * SCALE_WINDOW_END) as usize;
    (start, end)
}

/// Per-transcript divisor applied to raw reactivities. Every value is finite
/// and strictly positive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationScale {
    values: BTreeMap<String, f64>,
}

impl NormalizationScale {
    /// Estimates the scale from the high-reactivity band of every transcript.
    #[instrument(skip_all, name = "compute_scale")]
    pub fn compute(
        raw: &RawReactivity,
        reference: &ReferenceSet,
        targets: &TargetBases,
    ) -> Result<Self, EngineError> {
        let mut values = BTreeMap::new();
        for (transcript, reactivity) in raw.iter() {
            let sequence = reference
                .get(transcript)
                .ok_or_else(|| EngineError::MissingReference {
                    transcript: transcript.to_string(),
                })?;
            if sequence.len() != reactivity.len() {
                return Err(EngineError::LengthMismatch {
                    transcript: transcript.to_string(),
                    expected: sequence.len(),
                    found: reactivity.len(),
                });
            }

            let mut eligible: Vec<f64> = (1..reactivity.len())
                .filter(|&k| targets.contains(sequence[k - 1]))
                .map(|k| reactivity[k])
                .collect();
            eligible.sort_by(|a, b| b.total_cmp(a));

            let (start, end) = window_bounds(eligible.len());
            if start >= end {
                continue;
            }
            let window = &eligible[start..end];
            let mean = window.iter().sum::<f64>() / window.len() as f64;
            if mean > 0.0 {
                values.insert(transcript.to_string(), mean);
            }
        }
        debug!(
            resolved = values.len(),
            total = raw.len(),
            "Computed normalization scale."
        );
        Ok(Self { values })
    }

    /// Builds a scale from persisted values, skipping any that cannot divide.
    pub fn from_table(table: BTreeMap<String, f64>) -> Self {
        let values = table
            .into_iter()
            .filter(|(transcript, value)| {
                let usable = value.is_finite() && *value > 0.0;
                if !usable {
                    warn!(transcript = %transcript, value, "Ignoring unusable scale value.");
                }
                usable
            })
            .collect();
        Self { values }
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        Ok(Self::from_table(read_scale_from_path(path)?))
    }

    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        write_scale_to_path(&self.values, path)?;
        Ok(())
    }

    pub fn get(&self, transcript: &str) -> Option<f64> {
        self.values.get(transcript).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn as_table(&self) -> &BTreeMap<String, f64> {
        &self.values
    }
}
