use crate::core::flags;
use thiserror::Error;

/// Number of mandatory whitespace-delimited fields in an alignment line.
pub const MANDATORY_FIELDS: usize = 11;

/// Value reported for the edit-distance string when no `MD` tag is present.
pub const NO_MD_DATA: &str = "no-data";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("Alignment line has {found} fields, at least 11 are required")]
    TooFewFields { found: usize },
    #[error("Invalid {field} value '{value}'")]
    InvalidField { field: &'static str, value: String },
}

/// One parsed alignment line. Borrows from the line it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord<'a> {
    pub query_name: &'a str,
    pub flag: u16,
    pub reference_name: &'a str,
    /// 1-based leftmost mapping position; 0 for unplaced reads.
    pub position: u64,
    pub mapping_quality: u8,
    pub cigar: &'a str,
    pub mate_reference_name: &'a str,
    pub mate_position: u64,
    pub template_length: i64,
    pub sequence: &'a str,
    pub quality: &'a str,
    pub edit_distance: u32,
    pub mismatch_string: &'a str,
}

fn parse_field<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, AlignmentError> {
    value.parse().map_err(|_| AlignmentError::InvalidField {
        field,
        value: value.to_string(),
    })
}

impl<'a> AlignmentRecord<'a> {
    pub fn parse(line: &'a str) -> Result<Self, AlignmentError> {
        let fields: Vec<&'a str> = line.split_whitespace().collect();
        if fields.len() < MANDATORY_FIELDS {
            return Err(AlignmentError::TooFewFields {
                found: fields.len(),
            });
        }

        let mut edit_distance = 0;
        let mut mismatch_string = NO_MD_DATA;
        for optional in &fields[MANDATORY_FIELDS..] {
            let mut parts = optional.splitn(3, ':');
            let (Some(tag), Some(_), Some(value)) = (parts.next(), parts.next(), parts.next())
            else {
                continue;
            };
            match tag {
                "NM" => edit_distance = parse_field("NM", value)?,
                "MD" => mismatch_string = value,
                _ => {}
            }
        }

        Ok(Self {
            query_name: fields[0],
            flag: parse_field("FLAG", fields[1])?,
            reference_name: fields[2],
            position: parse_field("POS", fields[3])?,
            mapping_quality: parse_field("MAPQ", fields[4])?,
            cigar: fields[5],
            mate_reference_name: fields[6],
            mate_position: parse_field("PNEXT", fields[7])?,
            template_length: parse_field("TLEN", fields[8])?,
            sequence: fields[9],
            quality: fields[10],
            edit_distance,
            mismatch_string,
        })
    }

    pub fn mismatch_count(&self) -> u32 {
        self.edit_distance
    }

    /// True when the `MD` string opens with a zero-length match run, i.e. the
    /// first aligned base is a mismatch or deletion. Records without `MD` are
    /// never considered mismatched.
    pub fn first_base_mismatched(&self) -> bool {
        if self.mismatch_string == NO_MD_DATA {
            return false;
        }
        let digits_end = self
            .mismatch_string
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.mismatch_string.len());
        matches!(self.mismatch_string[..digits_end].parse::<u64>(), Ok(0))
    }

    pub fn passes_flag_filter(&self, reject_mask: u16) -> bool {
        flags::passes(self.flag, reject_mask)
    }

    pub fn passes_mismatch_filter(&self, max_allowed: u32) -> bool {
        self.mismatch_count() <= max_allowed
    }

    pub fn passes_first_base_filter(&self, accept_first_mismatch: bool) -> bool {
        accept_first_mismatch || !self.first_base_mismatched()
    }

    /// Zero-based coordinate of the RT stop, `None` for unplaced records.
    pub fn stop_position(&self) -> Option<usize> {
        usize::try_from(self.position).ok()?.checked_sub(1)
    }
}
