use crate::core::io::table::Table;
use crate::core::models::profile::ReactivityProfile;
use std::collections::BTreeMap;

pub const DEFAULT_TRIM: usize = 20;
pub const DEFAULT_MIN_LENGTH: usize = 10;

const STAT_SUFFIXES: [&str; 4] = ["_max", "_average", "_std", "_gini"];
const NOT_APPLICABLE: &str = "NA";

/// Summary of one transcript's numeric reactivities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactStats {
    pub max: f64,
    pub average: f64,
    /// Population standard deviation.
    pub std: f64,
    /// `None` when the values sum to zero.
    pub gini: Option<f64>,
}

impl ReactStats {
    /// Drops the last `trim` positions and any not-applicable values; returns
    /// `None` when fewer than `min_length` (or zero) values remain.
    pub fn compute(values: &[Option<f64>], trim: usize, min_length: usize) -> Option<Self> {
        let kept = &values[..values.len().saturating_sub(trim)];
        let numeric: Vec<f64> = kept.iter().flatten().copied().collect();
        if numeric.is_empty() || numeric.len() < min_length {
            return None;
        }
        let n = numeric.len() as f64;
        let max = numeric.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let average = numeric.iter().sum::<f64>() / n;
        let variance = numeric.iter().map(|v| (v - average).powi(2)).sum::<f64>() / n;
        Some(Self {
            max,
            average,
            std: variance.sqrt(),
            gini: gini(&numeric),
        })
    }

    fn cells(stats: Option<&Self>) -> [String; 4] {
        match stats {
            Some(s) => [
                s.max.to_string(),
                s.average.to_string(),
                s.std.to_string(),
                s.gini.map_or_else(|| NOT_APPLICABLE.to_string(), |g| g.to_string()),
            ],
            None => std::array::from_fn(|_| NOT_APPLICABLE.to_string()),
        }
    }
}

/// Area-based Gini coefficient over ascending values.
pub fn gini(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mut height = 0.0;
    let mut area = 0.0;
    for value in &sorted {
        height += value;
        area += height - value / 2.0;
    }
    let fair_area = height * sorted.len() as f64 / 2.0;
    if fair_area == 0.0 {
        return None;
    }
    Some((fair_area - area) / fair_area)
}

/// Per-transcript statistics across several reactivity samples.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsReport {
    trim: usize,
    min_length: usize,
    samples: Vec<String>,
    transcripts: BTreeMap<String, BTreeMap<String, Option<ReactStats>>>,
}

impl StatisticsReport {
    pub fn new(trim: usize, min_length: usize) -> Self {
        Self {
            trim,
            min_length,
            samples: Vec::new(),
            transcripts: BTreeMap::new(),
        }
    }

    pub fn add_sample(&mut self, sample: impl Into<String>, profile: &ReactivityProfile) {
        let sample = sample.into();
        for (transcript, values) in profile.iter() {
            self.transcripts
                .entry(transcript.to_string())
                .or_default()
                .insert(
                    sample.clone(),
                    ReactStats::compute(values, self.trim, self.min_length),
                );
        }
        if let Err(pos) = self.samples.binary_search(&sample) {
            self.samples.insert(pos, sample);
        }
    }

    pub fn get(&self, transcript: &str, sample: &str) -> Option<&ReactStats> {
        self.transcripts.get(transcript)?.get(sample)?.as_ref()
    }

    /// Four columns per sample (sorted); `NA` where a sample lacks the
    /// transcript or has too few values.
    pub fn to_table(&self) -> Table {
        let mut header = vec!["transcript".to_string()];
        for sample in &self.samples {
            header.extend(STAT_SUFFIXES.iter().map(|suffix| format!("{sample}{suffix}")));
        }
        let mut table = Table::new(header);
        for (transcript, per_sample) in &self.transcripts {
            let mut row = vec![transcript.clone()];
            for sample in &self.samples {
                let stats = per_sample.get(sample).and_then(Option::as_ref);
                row.extend(ReactStats::cells(stats));
            }
            table.push(row);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gini_of_uniform_values_is_zero() {
        assert_eq!(gini(&[2.0, 2.0, 2.0, 2.0]), Some(0.0));
    }

    #[test]
    fn gini_of_single_spike() {
        // sorted [0, 0, 0, 4]: area = 0 + 0 + 0 + 2 = 2, fair = 8
        assert_eq!(gini(&[0.0, 4.0, 0.0, 0.0]), Some(0.75));
        assert_eq!(gini(&[0.0, 0.0]), None);
    }

    #[test]
    fn compute_trims_tail_and_skips_na() {
        let values = [Some(1.0), None, Some(3.0), Some(100.0), None];
        let stats = ReactStats::compute(&values, 2, 2).unwrap();
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.average, 2.0);
        assert_eq!(stats.std, 1.0);
        assert_eq!(stats.gini, Some(0.25));
    }

    #[test]
    fn compute_requires_min_length() {
        let values = [Some(1.0), Some(2.0), None];
        assert!(ReactStats::compute(&values, 0, 3).is_none());
        assert!(ReactStats::compute(&values, 0, 2).is_some());
        assert!(ReactStats::compute(&values, 10, 0).is_none());
    }

    #[test]
    fn table_has_four_columns_per_sample() {
        let a: ReactivityProfile = [("T1".to_string(), vec![Some(1.0), Some(3.0)])]
            .into_iter()
            .collect();
        let b: ReactivityProfile = [("T2".to_string(), vec![Some(2.0), Some(2.0)])]
            .into_iter()
            .collect();
        let mut report = StatisticsReport::new(0, 1);
        report.add_sample("b", &b);
        report.add_sample("a", &a);

        let table = report.to_table();
        assert_eq!(
            table.header,
            vec![
                "transcript", "a_max", "a_average", "a_std", "a_gini", "b_max", "b_average",
                "b_std", "b_gini"
            ]
        );
        assert_eq!(
            table.rows,
            vec![
                vec!["T1", "3", "2", "1", "0.25", "NA", "NA", "NA", "NA"],
                vec!["T2", "NA", "NA", "NA", "NA", "2", "2", "0", "0"],
            ]
        );
        assert_eq!(report.get("T1", "a").map(|s| s.max), Some(3.0));
    }
}
