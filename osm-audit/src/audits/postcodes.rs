//! Postal code format classification.

use super::buckets::{DescriptorFilter, ValueBucketer};
use super::{run_pass, Audit};
use crate::core::{AuditConfig, BucketedValueIndex, EXCLUDE_BUCKET};
use crate::log_classification;
use crate::logging::truncate_field;
use crate::prelude::*;
use std::collections::BTreeSet;
use std::io::BufRead;

/// Groups postal codes by whether they are in `ddd dd` form.
///
/// With the default rules a code consisting of exactly three digits,
/// whitespace and two digits is filed under itself; every other code goes to
/// the reserved `exclude` bucket.
#[derive(Debug, Clone)]
pub struct PostcodeClassifier {
    filter: DescriptorFilter,
    bucketer: ValueBucketer,
    log: LogConfig,
}

impl PostcodeClassifier {
    pub fn from_config(config: &AuditConfig) -> Result<Self> {
        Ok(Self {
            filter: DescriptorFilter::new(config, &config.postcode_key),
            bucketer: ValueBucketer::new(config.postcode_rule_set()?),
            log: LogConfig::default(),
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::from_config(&AuditConfig::default())
    }

    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Files one postal code; returns its bucket, or `None` if dropped.
    pub fn classify(&mut self, value: &str) -> Option<String> {
        let bucket = self.bucketer.file(value);
        log_classification!(
            self.log,
            postcode = %truncate_field(value, self.log.max_field_length),
            bucket = ?bucket,
            "Classified postal code"
        );
        bucket
    }

    /// Codes filed under `exclude` so far.
    pub fn nonconforming(&self) -> BTreeSet<String> {
        self.bucketer
            .index()
            .get(EXCLUDE_BUCKET)
            .cloned()
            .unwrap_or_default()
    }

    pub fn index(&self) -> &BucketedValueIndex {
        self.bucketer.index()
    }
}

impl Audit for PostcodeClassifier {
    type Output = BucketedValueIndex;

    fn name(&self) -> &str {
        "postal_codes"
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

/// Groups the postal codes of nodes and ways in `document` by format.
pub fn classify_postcodes<R: BufRead>(document: R) -> Result<BucketedValueIndex> {
    classify_postcodes_with(document, &AuditConfig::default())
}

/// Groups postal codes in `document` using the rules in `config`.
pub fn classify_postcodes_with<R: BufRead>(
    document: R,
    config: &AuditConfig,
) -> Result<BucketedValueIndex> {
    run_pass(
        PostcodeClassifier::from_config(config)?,
        ElementWalker::new(document),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_conforming_code_keeps_its_bucket() {
        let mut classifier = PostcodeClassifier::with_defaults().unwrap();
        assert_eq!(classifier.classify("123 45").as_deref(), Some("123 45"));
        assert!(classifier.nonconforming().is_empty());
    }

    #[test]
    fn test_nonconforming_codes_are_excluded() {
        let mut classifier = PostcodeClassifier::with_defaults().unwrap();
        assert_eq!(classifier.classify("12345").as_deref(), Some(EXCLUDE_BUCKET));
        assert_eq!(classifier.classify("ABCDE").as_deref(), Some(EXCLUDE_BUCKET));
        assert_eq!(classifier.classify("").as_deref(), Some(EXCLUDE_BUCKET));
        assert_eq!(classifier.nonconforming(), set(&["", "12345", "ABCDE"]));
    }

    #[test]
    fn test_partial_matches_are_excluded() {
        let mut classifier = PostcodeClassifier::with_defaults().unwrap();
        for code in ["SE-114 55", "123 456", "12345 678 90", "114 55\n"] {
            assert_eq!(classifier.classify(code).as_deref(), Some(EXCLUDE_BUCKET));
        }
        assert_eq!(
            classifier.nonconforming(),
            set(&["SE-114 55", "123 456", "12345 678 90", "114 55\n"])
        );
        assert_eq!(classifier.index().len(), 1);
    }

    #[test]
    fn test_any_ascii_whitespace_separates() {
        let mut classifier = PostcodeClassifier::with_defaults().unwrap();
        assert_eq!(classifier.classify("114\t55").as_deref(), Some("114\t55"));
        assert_eq!(classifier.classify("114  55").as_deref(), Some("114  55"));
        assert!(classifier.nonconforming().is_empty());
    }

    #[test]
    fn test_non_ascii_digits_do_not_conform() {
        let mut classifier = PostcodeClassifier::with_defaults().unwrap();
        assert_eq!(classifier.classify("١٢٣ ٤٥").as_deref(), Some(EXCLUDE_BUCKET));
    }

    #[test]
    fn test_postcode_scenario() {
        let index = classify_postcodes(test_fixtures::POSTCODES.as_bytes()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("100 00"), Some(&set(&["100 00"])));
        assert_eq!(index.get(EXCLUDE_BUCKET), Some(&set(&["10000"])));
    }

    #[test]
    fn test_ignores_other_keys_and_containers() {
        let doc = r#"<osm>
            <relation><tag k="addr:postcode" v="99999"/></relation>
            <node><tag k="addr:city" v="Stockholm"/></node>
        </osm>"#;
        let index = classify_postcodes(doc.as_bytes()).unwrap();
        assert!(index.is_empty());
    }
}
