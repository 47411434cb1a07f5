use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_TARGET_BASES: &str = "AC";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetBasesError {
    #[error("Target base set cannot be empty")]
    Empty,
    #[error("Invalid nucleotide '{0}' in target base set")]
    InvalidBase(char),
}

/// Set of nucleotides a probing reagent reacts with. Matching is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetBases {
    members: [bool; 26],
}

impl TargetBases {
    #[inline]
    pub fn contains(&self, base: u8) -> bool {
        let upper = base.to_ascii_uppercase();
        upper.is_ascii_uppercase() && self.members[(upper - b'A') as usize]
    }

    pub fn bases(&self) -> impl Iterator<Item = u8> + '_ {
        (b'A'..=b'Z').filter(|b| self.members[(b - b'A') as usize])
    }
}

impl FromStr for TargetBases {
    type Err = TargetBasesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut members = [false; 26];
        for c in s.trim().chars() {
            if !c.is_ascii_alphabetic() {
                return Err(TargetBasesError::InvalidBase(c));
            }
            members[(c.to_ascii_uppercase() as u8 - b'A') as usize] = true;
        }
        if !members.iter().any(|m| *m) {
            return Err(TargetBasesError::Empty);
        }
        Ok(Self { members })
    }
}

impl Default for TargetBases {
    fn default() -> Self {
        let mut members = [false; 26];
        members[0] = true;
        members[2] = true;
        Self { members }
    }
}

impl fmt::Display for TargetBases {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in self.bases() {
            write!(f, "{}", base as char)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_adenine_and_cytosine() {
        let bases = TargetBases::default();
        assert_eq!(bases, DEFAULT_TARGET_BASES.parse().unwrap());
        assert!(bases.contains(b'A'));
        assert!(bases.contains(b'c'));
        assert!(!bases.contains(b'G'));
        assert!(!bases.contains(b'-'));
        assert_eq!(bases.to_string(), "AC");
    }

    #[test]
    fn parsing_rejects_empty_and_non_alphabetic_sets() {
        assert_eq!("".parse::<TargetBases>(), Err(TargetBasesError::Empty));
        assert_eq!(
            "A1".parse::<TargetBases>(),
            Err(TargetBasesError::InvalidBase('1'))
        );
    }

    #[test]
    fn display_is_sorted_and_deduplicated() {
        let bases: TargetBases = "tgca".parse().unwrap();
        assert_eq!(bases.to_string(), "ACGT");
    }
}
