//! Street name suffix classification.
//!
//! Street values are filed under their representative trailing token. The
//! default rules take the last ASCII word, then the last Unicode word, then
//! fall back to the reserved `abbreviation` bucket for any trailing non-space
//! token. Because the ASCII rule matches every value holding an ASCII word
//! character, the two later rules only ever see values without one.

use super::buckets::{DescriptorFilter, ValueBucketer};
use super::{run_pass, Audit};
use crate::core::{AuditConfig, BucketedValueIndex, ABBREVIATION_BUCKET};
use crate::log_classification;
use crate::logging::truncate_field;
use crate::prelude::*;
use std::io::BufRead;

/// Groups street names by suffix.
#[derive(Debug, Clone)]
pub struct StreetSuffixClassifier {
    filter: DescriptorFilter,
    bucketer: ValueBucketer,
    log: LogConfig,
}

impl StreetSuffixClassifier {
    /// Builds a classifier reading `config.street_key` with the street rules.
    pub fn from_config(config: &AuditConfig) -> Result<Self> {
        Ok(Self {
            filter: DescriptorFilter::new(config, &config.street_key),
            bucketer: ValueBucketer::new(config.street_rule_set()?),
            log: LogConfig::default(),
        })
    }

    /// Builds a classifier with the default rules.
    pub fn with_defaults() -> Result<Self> {
        Self::from_config(&AuditConfig::default())
    }

    /// Sets the logging configuration.
    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Files one street value; returns its bucket, or `None` if dropped.
    pub fn classify(&mut self, value: &str) -> Option<String> {
        let bucket = self.bucketer.file(value);
        log_classification!(
            self.log,
            street = %truncate_field(value, self.log.max_field_length),
            bucket = ?bucket,
            "Classified street name"
        );
        bucket
    }

    /// Returns true if any value landed in the `abbreviation` bucket.
    pub fn has_abbreviations(&self) -> bool {
        self.bucketer.index().contains_bucket(ABBREVIATION_BUCKET)
    }

    /// The index so far.
    pub fn index(&self) -> &BucketedValueIndex {
        self.bucketer.index()
    }

    /// Number of values no rule matched.
    pub fn dropped(&self) -> u64 {
        self.bucketer.dropped()
    }
}

impl Audit for StreetSuffixClassifier {
    type Output = BucketedValueIndex;

    fn name(&self) -> &str {
        "street_suffixes"
    }

    fn observe(&mut self, element: &Element) -> Result<()> {
        if let Some(value) = self.filter.value_of(element)? {
            self.classify(value);
        }
        Ok(())
    }

    fn outcomes(&self) -> u64 {
        self.bucketer.filed()
    }

    fn finish(self) -> BucketedValueIndex {
        self.bucketer.into_index()
    }
}

/// Groups the street names of nodes and ways in `document` by suffix.
pub fn classify_streets<R: BufRead>(document: R) -> Result<BucketedValueIndex> {
    classify_streets_with(document, &AuditConfig::default())
}

/// Groups street names in `document` using the rules in `config`.
pub fn classify_streets_with<R: BufRead>(
    document: R,
    config: &AuditConfig,
) -> Result<BucketedValueIndex> {
    run_pass(
        StreetSuffixClassifier::from_config(config)?,
        ElementWalker::new(document),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BucketRuleSpec, Matching};
    use crate::test_fixtures;
    use std::collections::BTreeSet;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_files_under_last_word() {
        let mut classifier = StreetSuffixClassifier::with_defaults().unwrap();
        assert_eq!(classifier.classify("Main Street").as_deref(), Some("Street"));
        assert_eq!(classifier.classify("123 Elm St.").as_deref(), Some("St"));
        assert_eq!(classifier.classify("Rue de la Paix").as_deref(), Some("Paix"));
        assert!(!classifier.has_abbreviations());
    }

    #[test]
    fn test_non_ascii_names_use_unicode_words() {
        let mut classifier = StreetSuffixClassifier::with_defaults().unwrap();
        assert_eq!(classifier.classify("Οδός Ερμού").as_deref(), Some("Ερμού"));
        // The ASCII rule takes the last ASCII run, even inside a longer word.
        assert_eq!(classifier.classify("Götgatan").as_deref(), Some("tgatan"));
    }

    #[test]
    fn test_wordless_values_are_abbreviations() {
        let mut classifier = StreetSuffixClassifier::with_defaults().unwrap();
        assert_eq!(
            classifier.classify("---").as_deref(),
            Some(ABBREVIATION_BUCKET)
        );
        assert!(classifier.has_abbreviations());
    }

    #[test]
    fn test_trailing_newline_still_reaches_abbreviation() {
        let mut classifier = StreetSuffixClassifier::with_defaults().unwrap();
        assert_eq!(
            classifier.classify("---\n").as_deref(),
            Some(ABBREVIATION_BUCKET)
        );
        assert_eq!(
            classifier.classify("-.\n").as_deref(),
            Some(ABBREVIATION_BUCKET)
        );
        assert_eq!(classifier.classify("---\n\n"), None);
    }

    #[test]
    fn test_empty_value_is_dropped() {
        let mut classifier = StreetSuffixClassifier::with_defaults().unwrap();
        assert_eq!(classifier.classify(""), None);
        assert_eq!(classifier.classify("   "), None);
        assert_eq!(classifier.dropped(), 2);
        assert!(classifier.index().is_empty());
    }

    #[test]
    fn test_each_value_lands_in_one_bucket() {
        let mut classifier = StreetSuffixClassifier::with_defaults().unwrap();
        classifier.classify("Main Street");
        classifier.classify("Main Street");
        classifier.classify("Baker Street");
        let index = classifier.index();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("Street"), Some(&set(&["Baker Street", "Main Street"])));
    }

    #[test]
    fn test_two_ways_scenario() {
        let index = classify_streets(test_fixtures::STREET_WAYS.as_bytes()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("Street"), Some(&set(&["Baker Street"])));
        assert_eq!(index.get("Ave"), Some(&set(&["5th Ave"])));
        assert!(!index.contains_bucket(ABBREVIATION_BUCKET));
    }

    #[test]
    fn test_only_node_and_way_streets_count() {
        let index = classify_streets(test_fixtures::MIXED_STREETS.as_bytes()).unwrap();
        assert_eq!(index.get("Street"), Some(&set(&["Main Street"])));
        assert_eq!(index.get("St"), Some(&set(&["123 Elm St."])));
        assert_eq!(index.get("Ερμού"), Some(&set(&["Οδός Ερμού"])));
        assert_eq!(index.get(ABBREVIATION_BUCKET), Some(&set(&["---"])));
        assert!(index.get("Road").is_none());
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_missing_value_aborts_pass() {
        let doc = r#"<osm><way><tag k="addr:street"/></way></osm>"#;
        let err = classify_streets(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, AuditError::MissingAttribute { .. }));
    }

    #[test]
    fn test_reordered_rules_reach_abbreviation() {
        let config = AuditConfig::default().with_street_rules(vec![
            BucketRuleSpec::fixed(
                Matching::Search,
                Some(r"(?i)\b\S+\.$"),
                ABBREVIATION_BUCKET,
            ),
            BucketRuleSpec::matched(Matching::Last, r"\w+"),
        ]);
        let doc = r#"<osm><node><tag k="addr:street" v="123 Elm St."/></node></osm>"#;
        let index = classify_streets_with(doc.as_bytes(), &config).unwrap();
        assert_eq!(index.get(ABBREVIATION_BUCKET), Some(&set(&["123 Elm St."])));
    }
}
