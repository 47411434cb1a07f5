use super::error::EngineError;
use super::scale::NormalizationScale;
use crate::core::models::bases::TargetBases;
use crate::core::models::profile::{RawReactivity, ReactivityProfile};
use crate::core::models::reference::ReferenceSet;
use std::collections::BTreeSet;
use tracing::{info, instrument};

/// Scaled, capped reactivities plus the transcripts the scale could not cover.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalReactivity {
    pub profile: ReactivityProfile,
    pub unresolved: BTreeSet<String>,
}

fn round_to_thousandths(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Output position `i` carries `raw[i + 1]`, reported only when `sequence[i]`
/// is a target base. The last position is always not-applicable.
fn finalize_transcript(
    raw: &[f64],
    sequence: &[u8],
    targets: &TargetBases,
    divisor: f64,
    threshold: f64,
) -> Vec<Option<f64>> {
    if raw.is_empty() {
        return Vec::new();
    }
    let mut values: Vec<Option<f64>> = (1..raw.len())
        .map(|x| {
            targets
                .contains(sequence[x - 1])
                .then(|| round_to_thousandths((raw[x] / divisor).min(threshold)))
        })
        .collect();
    values.push(None);
    values
}

#[instrument(skip_all, name = "final_reactivity")]
pub fn calculate_final_reactivity(
    raw: &RawReactivity,
    reference: &ReferenceSet,
    targets: &TargetBases,
    threshold: f64,
    scale: &NormalizationScale,
    normalize: bool,
) -> Result<FinalReactivity, EngineError> {
    let mut result = FinalReactivity::default();

    for (transcript, values) in raw.iter() {
        let Some(scale_value) = scale.get(transcript) else {
            result.unresolved.insert(transcript.to_string());
            continue;
        };
        let sequence = reference
            .get(transcript)
            .ok_or_else(|| EngineError::MissingReference {
                transcript: transcript.to_string(),
            })?;
        if sequence.len() != values.len() {
            return Err(EngineError::LengthMismatch {
                transcript: transcript.to_string(),
                expected: sequence.len(),
                found: values.len(),
            });
        }
        let divisor = if normalize { scale_value } else { 1.0 };
        result.profile.insert(
            transcript,
            finalize_transcript(values, sequence, targets, divisor, threshold),
        );
    }

    info!(
        resolved = result.profile.len(),
        unresolved = result.unresolved.len(),
        "Final reactivity calculated."
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn setup(
        name: &str,
        sequence: &[u8],
        values: Vec<f64>,
    ) -> (RawReactivity, ReferenceSet) {
        let raw: RawReactivity = [(name.to_string(), values)].into_iter().collect();
        let reference: ReferenceSet = [(name, sequence.to_vec())].into_iter().collect();
        (raw, reference)
    }

    fn scale(entries: &[(&str, f64)]) -> NormalizationScale {
        NormalizationScale::from_table(
            entries
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn values_are_scaled_capped_and_masked() {
        let (raw, reference) = setup("T1", b"AGCA", vec![0.0, 4.0, 8.0, 20.0]);
        let result = calculate_final_reactivity(
            &raw,
            &reference,
            &TargetBases::default(),
            7.0,
            &scale(&[("T1", 2.0)]),
            true,
        )
        .unwrap();
        // seq[0]='A' -> raw[1]/2, seq[1]='G' -> NA, seq[2]='C' -> min(20/2, 7), last NA
        assert_eq!(
            result.profile.get("T1").unwrap(),
            &[Some(2.0), None, Some(7.0), None]
        );
        assert!(result.unresolved.is_empty());
    }

    #[test]
    fn disabled_normalization_divides_by_one() {
        let (raw, reference) = setup("T1", b"CCC", vec![0.0, 1.23456, 9.0]);
        let result = calculate_final_reactivity(
            &raw,
            &reference,
            &TargetBases::default(),
            7.0,
            &scale(&[("T1", 100.0)]),
            false,
        )
        .unwrap();
        assert_eq!(
            result.profile.get("T1").unwrap(),
            &[Some(1.235), Some(7.0), None]
        );
    }

    #[test]
    fn transcripts_missing_from_scale_are_unresolved() {
        let (raw, reference) = setup("T1", b"AC", vec![0.0, 1.0]);
        let result = calculate_final_reactivity(
            &raw,
            &reference,
            &TargetBases::default(),
            7.0,
            &NormalizationScale::default(),
            true,
        )
        .unwrap();
        assert!(result.profile.is_empty());
        assert_eq!(result.unresolved, BTreeSet::from(["T1".to_string()]));
    }

    #[test]
    fn output_stays_within_zero_and_threshold() {
        let values: Vec<f64> = (0..40).map(|i| (i * i) as f64 / 3.0).collect();
        let (raw, reference) = setup("T1", &[b'A'; 40], values);
        let result = calculate_final_reactivity(
            &raw,
            &reference,
            &TargetBases::default(),
            2.5,
            &scale(&[("T1", 0.7)]),
            true,
        )
        .unwrap();
        let profile = result.profile.get("T1").unwrap();
        assert_eq!(profile.len(), 40);
        assert_eq!(profile[39], None);
        assert!(profile[..39].iter().flatten().all(|&v| (0.0..=2.5).contains(&v)));
    }

    #[test]
    fn empty_transcript_yields_empty_vector() {
        let (raw, reference) = setup("T1", b"", Vec::new());
        let result = calculate_final_reactivity(
            &raw,
            &reference,
            &TargetBases::default(),
            7.0,
            &scale(&[("T1", 1.0)]),
            true,
        )
        .unwrap();
        assert_eq!(result.profile.get("T1").unwrap(), &[] as &[Option<f64>]);
    }

    #[test]
    fn recomputing_from_the_same_scale_is_idempotent() {
        let (raw, reference) = setup("T1", b"ACGTAC", vec![0.1, 0.5, 3.3, 0.0, 1.7, 0.2]);
        let scale = scale(&[("T1", 0.9)]);
        let run = || {
            calculate_final_reactivity(&raw, &reference, &TargetBases::default(), 7.0, &scale, true)
                .unwrap()
        };
        assert_eq!(run(), run());
    }
}
