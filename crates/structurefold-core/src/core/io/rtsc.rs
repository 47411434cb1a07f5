//! The `.rtsc` stop-count format: transcript name, tab-separated counts, blank line.

use super::traits::{ProfileFile, ProfileFormatError, RecordLines};
use crate::core::models::profile::StopProfile;
use std::io::{BufRead, Write};

const RECORD_LINES: usize = 3;

pub struct RtscFile;

impl ProfileFile for RtscFile {
    type Value = u64;
    type Error = ProfileFormatError;

    fn read_from(reader: &mut impl BufRead) -> Result<StopProfile, Self::Error> {
        let mut profile = StopProfile::new();
        let mut lines = RecordLines::new(reader);

        while let Some((name_line, transcript)) = lines.next_name()? {
            let (values_line, values) = lines.required_line(&transcript, RECORD_LINES)?;
            let (separator_line, separator) = lines.required_line(&transcript, RECORD_LINES)?;
            if !separator.trim().is_empty() {
                return Err(ProfileFormatError::MissingSeparator {
                    line: separator_line,
                });
            }

            let stops = values
                .split('\t')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token.parse::<u64>().map_err(|_| ProfileFormatError::InvalidValue {
                        line: values_line,
                        value: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if profile.contains(&transcript) {
                return Err(ProfileFormatError::DuplicateTranscript {
                    transcript,
                    line: name_line,
                });
            }
            profile.insert(transcript, stops);
        }

        Ok(profile)
    }

    fn write_to(profile: &StopProfile, writer: &mut impl Write) -> Result<(), Self::Error> {
        for (transcript, stops) in profile.iter() {
            writeln!(writer, "{}", transcript)?;
            let mut first = true;
            for count in stops {
                if !first {
                    write!(writer, "\t")?;
                }
                write!(writer, "{}", count)?;
                first = false;
            }
            writeln!(writer)?;
            writeln!(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn read_str(content: &str) -> Result<StopProfile, ProfileFormatError> {
        RtscFile::read_from(&mut Cursor::new(content.as_bytes()))
    }

    #[test]
    fn reads_three_line_records() {
        let profile = read_str("T1\n0\t3\t1\n\nT2\n5\n\n").unwrap();
        assert_eq!(profile.get("T1"), Some(&[0, 3, 1][..]));
        assert_eq!(profile.get("T2"), Some(&[5][..]));
    }

    #[test]
    fn written_file_reads_back_identically() {
        let mut profile = StopProfile::new();
        profile.insert("B", vec![4, 0, 0, 12]);
        profile.insert("A", vec![1]);
        profile.insert("empty", vec![]);

        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.rtsc");
        RtscFile::write_to_path(&profile, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("A\n1\n\nB\n4\t0\t0\t12\n\n"));

        let reread = RtscFile::read_from_path(&path).unwrap();
        assert_eq!(reread, profile);
    }

    #[test]
    fn truncated_trailing_record_fails() {
        let err = read_str("T1\n1\t2\n\nT2\n3\t4\n").unwrap_err();
        assert!(matches!(
            err,
            ProfileFormatError::Truncated { ref transcript, expected: 3 } if transcript == "T2"
        ));

        let err = read_str("T1\n").unwrap_err();
        assert!(matches!(err, ProfileFormatError::Truncated { .. }));
    }

    #[test]
    fn non_integer_count_reports_line() {
        let err = read_str("T1\n1\tx\n\n").unwrap_err();
        assert!(matches!(
            err,
            ProfileFormatError::InvalidValue { line: 2, ref value } if value == "x"
        ));
    }

    #[test]
    fn record_without_blank_separator_fails() {
        let err = read_str("T1\n1\nT2\n2\n\n").unwrap_err();
        assert!(matches!(err, ProfileFormatError::MissingSeparator { line: 3 }));
    }

    #[test]
    fn duplicate_transcript_fails() {
        let err = read_str("T1\n1\n\nT1\n2\n\n").unwrap_err();
        assert!(matches!(err, ProfileFormatError::DuplicateTranscript { line: 4, .. }));
    }
}
