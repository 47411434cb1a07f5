use super::error::EngineError;
use crate::core::models::profile::{RawReactivity, StopProfile};
use tracing::{debug, instrument};

/// Length-normalized signal of one stop vector, or `None` when it sums to zero.
fn normalized_signal(stops: &[u64], log_transform: bool) -> Option<Vec<f64>> {
    let values: Vec<f64> = stops
        .iter()
        .map(|&count| {
            let count = count as f64;
            if log_transform { count.ln_1p() } else { count }
        })
        .collect();
    let sum: f64 = values.iter().sum();
    if sum == 0.0 {
        return None;
    }
    let length = values.len() as f64;
    Some(values.into_iter().map(|v| v / sum * length).collect())
}

/// Derives non-negative raw reactivity for every transcript shared by both
/// profiles. Transcripts whose control or treatment signal sums to zero are
/// left out.
#[instrument(skip_all, name = "derive_raw_reactivity")]
pub fn derive_raw_reactivity(
    control: &StopProfile,
    treatment: &StopProfile,
    log_transform: bool,
) -> Result<RawReactivity, EngineError> {
    let mut raw = RawReactivity::new();
    let mut dropped = 0usize;

    for (transcript, control_stops) in control.iter() {
        let Some(treatment_stops) = treatment.get(transcript) else {
            continue;
        };
        if control_stops.len() != treatment_stops.len() {
            return Err(EngineError::LengthMismatch {
                transcript: transcript.to_string(),
                expected: control_stops.len(),
                found: treatment_stops.len(),
            });
        }

        let (Some(control_signal), Some(treatment_signal)) = (
            normalized_signal(control_stops, log_transform),
            normalized_signal(treatment_stops, log_transform),
        ) else {
            dropped += 1;
            continue;
        };

        let values = treatment_signal
            .iter()
            .zip(&control_signal)
            .map(|(t, c)| (t - c).max(0.0))
            .collect();
        raw.insert(transcript, values);
    }

    if dropped > 0 {
        debug!(dropped, "Transcripts with zero stop signal were excluded.");
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(entries: &[(&str, &[u64])]) -> StopProfile {
        entries
            .iter()
            .map(|(name, stops)| (name.to_string(), stops.to_vec()))
            .collect()
    }

    #[test]
    fn proportional_profiles_cancel_without_log() {
        let control = profile(&[("T1", &[2, 0, 4])]);
        let treatment = profile(&[("T1", &[4, 0, 8])]);
        let raw = derive_raw_reactivity(&control, &treatment, false).unwrap();
        assert_eq!(raw.get("T1").unwrap(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn enriched_treatment_positions_become_positive() {
        let control = profile(&[("T1", &[1, 1, 1, 1])]);
        let treatment = profile(&[("T1", &[0, 0, 4, 0])]);
        let raw = derive_raw_reactivity(&control, &treatment, false).unwrap();
        assert_eq!(raw.get("T1").unwrap(), &[0.0, 0.0, 3.0, 0.0]);
    }

    #[test]
    fn log_transform_uses_natural_log_of_count_plus_one() {
        let control = profile(&[("T1", &[1, 1])]);
        let treatment = profile(&[("T1", &[0, 3])]);
        let raw = derive_raw_reactivity(&control, &treatment, true).unwrap();
        let values = raw.get("T1").unwrap();
        // treatment: [0, ln 4] -> [0, 2]; control: [ln 2, ln 2] -> [1, 1]
        assert_eq!(values[0], 0.0);
        assert!((values[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn output_is_never_negative() {
        let control = profile(&[("T1", &[9, 1, 0, 7, 3]), ("T2", &[5, 5, 5])]);
        let treatment = profile(&[("T1", &[0, 2, 6, 1, 3]), ("T2", &[1, 20, 0])]);
        for log in [false, true] {
            let raw = derive_raw_reactivity(&control, &treatment, log).unwrap();
            assert!(raw.iter().all(|(_, v)| v.iter().all(|&x| x >= 0.0)));
        }
    }

    #[test]
    fn zero_sum_transcripts_are_dropped() {
        let control = profile(&[("T1", &[0, 0, 0]), ("T2", &[1, 2, 3])]);
        let treatment = profile(&[("T1", &[1, 2, 3]), ("T2", &[0, 0, 0])]);
        let raw = derive_raw_reactivity(&control, &treatment, true).unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn only_shared_transcripts_are_derived() {
        let control = profile(&[("T1", &[1, 2]), ("T2", &[1, 1])]);
        let treatment = profile(&[("T1", &[2, 1]), ("T3", &[1, 1])]);
        let raw = derive_raw_reactivity(&control, &treatment, false).unwrap();
        assert_eq!(raw.transcripts().collect::<Vec<_>>(), vec!["T1"]);
    }

    #[test]
    fn unequal_lengths_are_an_error() {
        let control = profile(&[("T1", &[1, 2, 3])]);
        let treatment = profile(&[("T1", &[1, 2])]);
        let err = derive_raw_reactivity(&control, &treatment, false).unwrap_err();
        assert!(matches!(
            err,
            EngineError::LengthMismatch { expected: 3, found: 2, .. }
        ));
    }
}
