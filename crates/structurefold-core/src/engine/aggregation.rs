//! Streams alignment lines for one sample into an RT-stop profile and a
//! tally of why reads were rejected.

use crate::core::alignment::{AlignmentError, AlignmentRecord};
use crate::core::io::table::Table;
use crate::core::models::profile::StopProfile;
use crate::core::models::reference::ReferenceSet;
use crate::engine::config::ReadFilterConfig;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

pub const PASSING_KEY: &str = "passing";
pub const BITFLAG_KEY: &str = "bitflag";
pub const MISMATCH_KEY: &str = "mismatches";
pub const FIRST_BASE_KEY: &str = "firstbase";
const REASON_SEPARATOR: &str = "_and_";

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {source}")]
    Malformed {
        line: usize,
        source: AlignmentError,
    },
}

/// Reason -> number of records, ordered by reason.
pub type RejectionTally = BTreeMap<String, u64>;

/// Outcome of testing one record against the read filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Reject(String),
}

/// Precomputed predicates applied to every alignment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFilter {
    pub reject_mask: u16,
    pub max_mismatches: u32,
    pub accept_first_mismatch: bool,
}

impl From<&ReadFilterConfig> for ReadFilter {
    fn from(config: &ReadFilterConfig) -> Self {
        Self {
            reject_mask: config.reject_mask(),
            max_mismatches: config.max_mismatches,
            accept_first_mismatch: config.accept_first_mismatch,
        }
    }
}

impl ReadFilter {
    pub fn evaluate(&self, record: &AlignmentRecord<'_>) -> Verdict {
        if !record.passes_flag_filter(self.reject_mask) {
            return Verdict::Reject(BITFLAG_KEY.to_string());
        }
        let mut failed: Vec<&str> = Vec::with_capacity(2);
        if !record.passes_mismatch_filter(self.max_mismatches) {
            failed.push(MISMATCH_KEY);
        }
        if !record.passes_first_base_filter(self.accept_first_mismatch) {
            failed.push(FIRST_BASE_KEY);
        }
        if failed.is_empty() {
            return Verdict::Pass;
        }
        failed.sort_unstable();
        Verdict::Reject(failed.join(REASON_SEPARATOR))
    }
}

/// Accumulates RT stops for a single sample.
pub struct StopAggregator<'a> {
    reference: &'a ReferenceSet,
    filter: ReadFilter,
    stops: HashMap<String, Vec<u64>>,
    tally: RejectionTally,
    off_reference: u64,
}

impl<'a> StopAggregator<'a> {
    pub fn new(reference: &'a ReferenceSet, filter: ReadFilter) -> Self {
        Self {
            reference,
            filter,
            stops: HashMap::new(),
            tally: RejectionTally::new(),
            off_reference: 0,
        }
    }

    /// Parses and counts one alignment line. Header (`@`) and blank lines are skipped.
    pub fn push_line(&mut self, line: &str) -> Result<(), AlignmentError> {
        if line.starts_with('@') || line.trim().is_empty() {
            return Ok(());
        }
        let record = AlignmentRecord::parse(line)?;
        self.push_record(&record);
        Ok(())
    }

    pub fn push_record(&mut self, record: &AlignmentRecord<'_>) {
        match self.filter.evaluate(record) {
            Verdict::Pass => {
                *self.tally.entry(PASSING_KEY.to_string()).or_insert(0) += 1;
                self.record_stop(record);
            }
            Verdict::Reject(reason) => *self.tally.entry(reason).or_insert(0) += 1,
        }
    }

    fn record_stop(&mut self, record: &AlignmentRecord<'_>) {
        let Some(position) = record.stop_position() else {
            self.off_reference += 1;
            return;
        };
        let Some(length) = self.reference.length(record.reference_name) else {
            self.off_reference += 1;
            return;
        };
        if position >= length {
            self.off_reference += 1;
            return;
        }
        let counts = match self.stops.get_mut(record.reference_name) {
            Some(counts) => counts,
            None => self
                .stops
                .entry(record.reference_name.to_string())
                .or_insert_with(|| vec![0; length]),
        };
        counts[position] += 1;
    }

    /// Emits a count vector for every reference transcript, zero-filled where
    /// no stops were recorded.
    pub fn finish(mut self) -> (StopProfile, RejectionTally) {
        if self.off_reference > 0 {
            debug!(
                count = self.off_reference,
                "Passing records fell outside the reference transcripts."
            );
        }
        let profile = self
            .reference
            .iter()
            .map(|(name, sequence)| {
                let counts = self
                    .stops
                    .remove(name)
                    .unwrap_or_else(|| vec![0; sequence.len()]);
                (name.to_string(), counts)
            })
            .collect();
        (profile, self.tally)
    }
}

/// Aggregates every line of `reader`. A malformed line aborts the sample.
pub fn aggregate<R: BufRead>(
    mut reader: R,
    reference: &ReferenceSet,
    filter: ReadFilter,
) -> Result<(StopProfile, RejectionTally), AggregationError> {
    let mut aggregator = StopAggregator::new(reference, filter);
    let mut buffer = String::new();
    let mut line_num = 0;
    loop {
        buffer.clear();
        if reader.read_line(&mut buffer)? == 0 {
            break;
        }
        line_num += 1;
        aggregator
            .push_line(&buffer)
            .map_err(|source| AggregationError::Malformed {
                line: line_num,
                source,
            })?;
    }
    Ok(aggregator.finish())
}

/// Rejection tallies for every processed sample, keyed by sample name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectionReport {
    samples: BTreeMap<String, RejectionTally>,
}

impl RejectionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sample: impl Into<String>, tally: RejectionTally) {
        self.samples.insert(sample.into(), tally);
    }

    pub fn get(&self, sample: &str) -> Option<&RejectionTally> {
        self.samples.get(sample)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RejectionTally)> {
        self.samples.iter().map(|(name, tally)| (name.as_str(), tally))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Union of reasons seen in any sample, sorted.
    pub fn reasons(&self) -> BTreeSet<&str> {
        self.samples
            .values()
            .flat_map(|tally| tally.keys().map(String::as_str))
            .collect()
    }

    /// One row per sample (sorted), one column per reason (sorted); absent counts are 0.
    pub fn to_table(&self) -> Table {
        let reasons = self.reasons();
        let mut header = vec!["sam_file".to_string()];
        header.extend(reasons.iter().map(|r| r.to_string()));
        let mut table = Table::new(header);
        for (sample, tally) in &self.samples {
            let mut row = vec![sample.clone()];
            row.extend(
                reasons
                    .iter()
                    .map(|reason| tally.get(*reason).copied().unwrap_or(0).to_string()),
            );
            table.push(row);
        }
        table
    }
}
