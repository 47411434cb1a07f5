use std::collections::BTreeMap;

/// Reference transcript sequences, upper-cased on insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    sequences: BTreeMap<String, Vec<u8>>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, mut sequence: Vec<u8>) {
        sequence.make_ascii_uppercase();
        self.sequences.insert(name.into(), sequence);
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.sequences.get(name).map(Vec::as_slice)
    }

    pub fn length(&self, name: &str) -> Option<usize> {
        self.sequences.get(name).map(Vec::len)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sequences.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.sequences
            .iter()
            .map(|(name, seq)| (name.as_str(), seq.as_slice()))
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<u8>)> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = (S, Vec<u8>)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, sequence) in iter {
            set.insert(name, sequence);
        }
        set
    }
}
