//! The `.react` reactivity format: transcript name, then whitespace-separated
//! values where `NA` marks a not-applicable position.

use super::traits::{ProfileFile, ProfileFormatError, RecordLines};
use crate::core::models::profile::ReactivityProfile;
use std::io::{BufRead, Write};

pub const NOT_APPLICABLE: &str = "NA";

const RECORD_LINES: usize = 2;

pub struct ReactFile;

/// Formats a value with the shortest representation that parses back to the
/// same float, always keeping a decimal point (`2.0`, `0.125`).
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:?}", v),
        None => NOT_APPLICABLE.to_string(),
    }
}

fn parse_value(token: &str, line: usize) -> Result<Option<f64>, ProfileFormatError> {
    if token == NOT_APPLICABLE {
        return Ok(None);
    }
    token
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ProfileFormatError::InvalidValue {
            line,
            value: token.to_string(),
        })
}

impl ProfileFile for ReactFile {
    type Value = Option<f64>;
    type Error = ProfileFormatError;

    fn read_from(reader: &mut impl BufRead) -> Result<ReactivityProfile, Self::Error> {
        let mut profile = ReactivityProfile::new();
        let mut lines = RecordLines::new(reader);

        while let Some((name_line, transcript)) = lines.next_name()? {
            let (values_line, values) = lines.required_line(&transcript, RECORD_LINES)?;
            let reactivities = values
                .split_whitespace()
                .map(|token| parse_value(token, values_line))
                .collect::<Result<Vec<_>, _>>()?;

            if profile.contains(&transcript) {
                return Err(ProfileFormatError::DuplicateTranscript {
                    transcript,
                    line: name_line,
                });
            }
            profile.insert(transcript, reactivities);
        }

        Ok(profile)
    }

    fn write_to(profile: &ReactivityProfile, writer: &mut impl Write) -> Result<(), Self::Error> {
        for (transcript, values) in profile.iter() {
            writeln!(writer, "{}", transcript)?;
            let line = values
                .iter()
                .map(|v| format_value(*v))
                .collect::<Vec<_>>()
                .join("\t");
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }
}
