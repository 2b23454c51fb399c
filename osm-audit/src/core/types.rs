//! Accumulator types produced by the audit passes.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Reserved street bucket for values that only matched the trailing-token rule.
pub const ABBREVIATION_BUCKET: &str = "abbreviation";

/// Reserved postal code bucket for values that do not match the expected format.
pub const EXCLUDE_BUCKET: &str = "exclude";

/// The shape of a descriptor key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyCategory {
    /// Only lowercase ASCII letters and underscores
    #[serde(rename = "lower")]
    Lower,
    /// Two lowercase/underscore segments joined by one colon
    #[serde(rename = "lower_colon")]
    LowerColon,
    /// Contains characters unsafe for downstream storage
    #[serde(rename = "problemchars")]
    ProblemChars,
    /// Anything else
    #[serde(rename = "other")]
    Other,
}

impl KeyCategory {
    /// All categories in classification priority order.
    pub const ALL: [KeyCategory; 4] = [
        KeyCategory::Lower,
        KeyCategory::LowerColon,
        KeyCategory::ProblemChars,
        KeyCategory::Other,
    ];

    /// The category's report label.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyCategory::Lower => "lower",
            KeyCategory::LowerColon => "lower_colon",
            KeyCategory::ProblemChars => "problemchars",
            KeyCategory::Other => "other",
        }
    }
}

impl fmt::Display for KeyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count of descriptor keys per [`KeyCategory`].
///
/// All four categories are always present, starting at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTally {
    counts: BTreeMap<KeyCategory, u64>,
}

impl CategoryTally {
    /// Creates a tally with every category at zero.
    pub fn new() -> Self {
        Self {
            counts: KeyCategory::ALL.iter().map(|c| (*c, 0)).collect(),
        }
    }

    /// Adds one key to `category`.
    pub fn increment(&mut self, category: KeyCategory) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    /// Returns the count for `category`.
    pub fn get(&self, category: KeyCategory) -> u64 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Total number of keys classified.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterates categories in priority order with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (KeyCategory, u64)> + '_ {
        KeyCategory::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

impl Default for CategoryTally {
    fn default() -> Self {
        Self::new()
    }
}

/// Values grouped under bucket labels.
///
/// Buckets are created on first insertion and never removed, so no bucket is
/// ever empty. Each value appears at most once per bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketedValueIndex {
    buckets: BTreeMap<String, BTreeSet<String>>,
}

impl BucketedValueIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `value` under `bucket`. Returns false if it was already there.
    pub fn insert(&mut self, bucket: &str, value: &str) -> bool {
        match self.buckets.get_mut(bucket) {
            Some(values) => {
                if values.contains(value) {
                    false
                } else {
                    values.insert(value.to_owned())
                }
            }
            None => {
                self.buckets
                    .insert(bucket.to_owned(), BTreeSet::from([value.to_owned()]));
                true
            }
        }
    }

    /// Returns the values filed under `bucket`.
    pub fn get(&self, bucket: &str) -> Option<&BTreeSet<String>> {
        self.buckets.get(bucket)
    }

    /// Returns true if `bucket` has been created.
    pub fn contains_bucket(&self, bucket: &str) -> bool {
        self.buckets.contains_key(bucket)
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if nothing has been filed.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of distinct (bucket, value) entries.
    pub fn value_count(&self) -> usize {
        self.buckets.values().map(BTreeSet::len).sum()
    }

    /// Iterates buckets in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Consumes the index and returns the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, BTreeSet<String>> {
        self.buckets
    }
}

/// Occurrences of each element name in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementCensus {
    counts: BTreeMap<String, u64>,
}

impl ElementCensus {
    /// Creates an empty census.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of `name`.
    pub fn record(&mut self, name: &str) {
        match self.counts.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(name.to_owned(), 1);
            }
        }
    }

    /// Occurrences of `name`, zero if never seen.
    pub fn get(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Number of distinct element names.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Total number of elements.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterates names in sorted order with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_starts_with_all_categories() {
        let tally = CategoryTally::new();
        assert_eq!(tally.iter().count(), 4);
        assert_eq!(tally.total(), 0);
        for category in KeyCategory::ALL {
            assert_eq!(tally.get(category), 0);
        }
    }

    #[test]
    fn test_tally_increment_and_serialize() {
        let mut tally = CategoryTally::new();
        tally.increment(KeyCategory::Lower);
        tally.increment(KeyCategory::Lower);
        tally.increment(KeyCategory::ProblemChars);

        assert_eq!(tally.get(KeyCategory::Lower), 2);
        assert_eq!(tally.total(), 3);

        let json = serde_json::to_string(&tally).unwrap();
        assert_eq!(
            json,
            r#"{"lower":2,"lower_colon":0,"problemchars":1,"other":0}"#
        );
        let back: CategoryTally = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tally);
    }

    #[test]
    fn test_bucket_insert_is_idempotent() {
        let mut index = BucketedValueIndex::new();
        assert!(index.insert("Street", "Baker Street"));
        assert!(!index.insert("Street", "Baker Street"));
        assert!(index.insert("Street", "High Street"));
        assert!(index.insert("Ave", "5th Ave"));

        assert_eq!(index.len(), 2);
        assert_eq!(index.value_count(), 3);
        assert!(index.contains_bucket("Ave"));
        assert!(!index.contains_bucket(ABBREVIATION_BUCKET));
        assert_eq!(index.get("Street").map(BTreeSet::len), Some(2));

        let labels: Vec<&str> = index.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["Ave", "Street"]);
    }

    #[test]
    fn test_same_value_in_two_buckets() {
        let mut index = BucketedValueIndex::new();
        assert!(index.insert("a", "x"));
        assert!(index.insert("b", "x"));
        assert_eq!(index.value_count(), 2);
    }

    #[test]
    fn test_census() {
        let mut census = ElementCensus::new();
        census.record("node");
        census.record("tag");
        census.record("node");

        assert_eq!(census.get("node"), 2);
        assert_eq!(census.get("way"), 0);
        assert_eq!(census.distinct(), 2);
        assert_eq!(census.total(), 3);
        assert_eq!(
            serde_json::to_string(&census).unwrap(),
            r#"{"node":2,"tag":1}"#
        );
    }

    #[test]
    fn test_category_labels() {
        let labels: Vec<String> = KeyCategory::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, vec!["lower", "lower_colon", "problemchars", "other"]);
    }
}
