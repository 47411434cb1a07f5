//! Bidirectional mapping between 12-bit SAM alignment flags and named properties.

use phf::{Map, phf_map};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Mask covering the twelve defined flag bits.
pub const FLAG_BITS: u16 = 0x0FFF;

/// One named bit of an alignment flag, ordered from least- to most-significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlagProperty {
    ReadPaired,
    ProperPair,
    R1Unmap,
    R2Unmap,
    R1Reverse,
    R2Reverse,
    FirstInPair,
    SecondInPair,
    Secondary,
    QualityFail,
    PcrDuplicate,
    Supplementary,
}

impl FlagProperty {
    pub const ALL: [FlagProperty; 12] = [
        FlagProperty::ReadPaired,
        FlagProperty::ProperPair,
        FlagProperty::R1Unmap,
        FlagProperty::R2Unmap,
        FlagProperty::R1Reverse,
        FlagProperty::R2Reverse,
        FlagProperty::FirstInPair,
        FlagProperty::SecondInPair,
        FlagProperty::Secondary,
        FlagProperty::QualityFail,
        FlagProperty::PcrDuplicate,
        FlagProperty::Supplementary,
    ];

    /// Bit position of this property, 0 being the least-significant bit.
    pub const fn bit(self) -> u32 {
        self as u32
    }

    /// Weight this property contributes to an encoded flag.
    pub const fn weight(self) -> u16 {
        1 << self.bit()
    }

    pub const fn name(self) -> &'static str {
        match self {
            FlagProperty::ReadPaired => "read_paired",
            FlagProperty::ProperPair => "proper_pair",
            FlagProperty::R1Unmap => "r1_unmap",
            FlagProperty::R2Unmap => "r2_unmap",
            FlagProperty::R1Reverse => "r1_reverse",
            FlagProperty::R2Reverse => "r2_reverse",
            FlagProperty::FirstInPair => "first_in_pair",
            FlagProperty::SecondInPair => "second_in_pair",
            FlagProperty::Secondary => "secondary",
            FlagProperty::QualityFail => "quality_fail",
            FlagProperty::PcrDuplicate => "pcr_duplicate",
            FlagProperty::Supplementary => "supplementary",
        }
    }
}

static PROPERTY_NAMES: Map<&'static str, FlagProperty> = phf_map! {
    "read_paired" => FlagProperty::ReadPaired,
    "proper_pair" => FlagProperty::ProperPair,
    "r1_unmap" => FlagProperty::R1Unmap,
    "r2_unmap" => FlagProperty::R2Unmap,
    "r1_reverse" => FlagProperty::R1Reverse,
    "r2_reverse" => FlagProperty::R2Reverse,
    "first_in_pair" => FlagProperty::FirstInPair,
    "second_in_pair" => FlagProperty::SecondInPair,
    "secondary" => FlagProperty::Secondary,
    "quality_fail" => FlagProperty::QualityFail,
    "pcr_duplicate" => FlagProperty::PcrDuplicate,
    "supplementary" => FlagProperty::Supplementary,
};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown flag property '{0}'")]
pub struct UnknownFlagProperty(pub String);

impl FromStr for FlagProperty {
    type Err = UnknownFlagProperty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PROPERTY_NAMES
            .get(s.trim())
            .copied()
            .ok_or_else(|| UnknownFlagProperty(s.to_string()))
    }
}

impl fmt::Display for FlagProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Expands a flag into the truth value of every named property.
///
/// Bits above the twelfth are ignored.
pub fn decode(flag: u16) -> BTreeMap<FlagProperty, bool> {
    FlagProperty::ALL
        .iter()
        .map(|&property| (property, flag & property.weight() != 0))
        .collect()
}

/// Sums the bit weights of the given properties. Repeated properties count once.
pub fn encode<I>(properties: I) -> u16
where
    I: IntoIterator<Item = FlagProperty>,
{
    properties
        .into_iter()
        .fold(0, |flag, property| flag | property.weight())
}

/// Returns `false` when `flag` carries any property present in `reject_mask`.
#[inline]
pub fn passes(flag: u16, reject_mask: u16) -> bool {
    flag & reject_mask & FLAG_BITS == 0
}
