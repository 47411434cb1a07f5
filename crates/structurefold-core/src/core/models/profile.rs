use std::collections::BTreeMap;
use std::collections::btree_map;

/// Per-transcript vectors indexed by 0-based sequence position.
///
/// Transcripts are kept in name order so every writer and report built from a
/// profile is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile<V> {
    entries: BTreeMap<String, Vec<V>>,
}

/// RT-stop counts per position.
pub type StopProfile = Profile<u64>;

/// Non-negative reactivity per position, before scaling.
pub type RawReactivity = Profile<f64>;

/// Final reactivity per position; `None` marks a not-applicable position.
pub type ReactivityProfile = Profile<Option<f64>>;

impl<V> Default for Profile<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> Profile<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, transcript: impl Into<String>, values: Vec<V>) -> Option<Vec<V>> {
        self.entries.insert(transcript.into(), values)
    }

    pub fn get(&self, transcript: &str) -> Option<&[V]> {
        self.entries.get(transcript).map(Vec::as_slice)
    }

    pub fn get_mut(&mut self, transcript: &str) -> Option<&mut Vec<V>> {
        self.entries.get_mut(transcript)
    }

    pub fn contains(&self, transcript: &str) -> bool {
        self.entries.contains_key(transcript)
    }

    pub fn remove(&mut self, transcript: &str) -> Option<Vec<V>> {
        self.entries.remove(transcript)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn transcripts(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[V])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Keeps only the transcripts for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|name, _| keep(name));
    }
}

impl<V> FromIterator<(String, Vec<V>)> for Profile<V> {
    fn from_iter<I: IntoIterator<Item = (String, Vec<V>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<V> IntoIterator for Profile<V> {
    type Item = (String, Vec<V>);
    type IntoIter = btree_map::IntoIter<String, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl StopProfile {
    /// Total number of stops recorded for a transcript.
    pub fn total(&self, transcript: &str) -> Option<u64> {
        self.get(transcript).map(|stops| stops.iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_is_sorted_by_transcript_name() {
        let profile: StopProfile = [
            ("T2".to_string(), vec![1]),
            ("T10".to_string(), vec![2]),
            ("T1".to_string(), vec![3]),
        ]
        .into_iter()
        .collect();
        let names: Vec<_> = profile.transcripts().collect();
        assert_eq!(names, vec!["T1", "T10", "T2"]);
    }

    #[test]
    fn retain_filters_transcripts() {
        let mut profile = StopProfile::new();
        profile.insert("keep", vec![0, 1]);
        profile.insert("drop", vec![2]);
        profile.retain(|name| name == "keep");
        assert_eq!(profile.len(), 1);
        assert_eq!(profile.total("keep"), Some(1));
        assert_eq!(profile.total("drop"), None);
    }
}
