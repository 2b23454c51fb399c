//! Audit report types.

use super::types::{
    BucketedValueIndex, CategoryTally, ElementCensus, KeyCategory, ABBREVIATION_BUCKET,
    EXCLUDE_BUCKET,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The passes an audit run can perform, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    ElementCensus,
    TagKeys,
    StreetSuffixes,
    PostalCodes,
}

impl Pass {
    /// All passes in execution order.
    pub const ALL: [Pass; 4] = [
        Pass::ElementCensus,
        Pass::TagKeys,
        Pass::StreetSuffixes,
        Pass::PostalCodes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Pass::ElementCensus => "element_census",
            Pass::TagKeys => "tag_keys",
            Pass::StreetSuffixes => "street_suffixes",
            Pass::PostalCodes => "postal_codes",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pass that failed while the run continued with the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassFailure {
    pub pass: Pass,
    pub message: String,
}

/// Aggregated results of one audit run.
///
/// A pass that was disabled or failed leaves its field `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// Description of the audited document
    pub source: String,
    /// When the run started (RFC 3339)
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_counts: Option<ElementCensus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_tally: Option<CategoryTally>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_types: Option<BucketedValueIndex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcodes: Option<BucketedValueIndex>,
    /// Whether the street pass created the `abbreviation` bucket
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_abbreviations: Option<bool>,
    /// Contents of the postal code `exclude` bucket
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub nonconforming_postcodes: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<PassFailure>,
}

impl AuditReport {
    /// Creates an empty report for `source`, stamped with the current time.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            element_counts: None,
            key_tally: None,
            street_types: None,
            postcodes: None,
            has_abbreviations: None,
            nonconforming_postcodes: BTreeSet::new(),
            failures: Vec::new(),
        }
    }

    /// Stores the street pass result and derives the abbreviation signal.
    pub fn set_street_types(&mut self, index: BucketedValueIndex) {
        self.has_abbreviations = Some(index.contains_bucket(ABBREVIATION_BUCKET));
        self.street_types = Some(index);
    }

    /// Stores the postal code pass result and extracts non-conforming codes.
    pub fn set_postcodes(&mut self, index: BucketedValueIndex) {
        self.nonconforming_postcodes = index.get(EXCLUDE_BUCKET).cloned().unwrap_or_default();
        self.postcodes = Some(index);
    }

    /// Records a failed pass.
    pub fn add_failure(&mut self, pass: Pass, message: impl Into<String>) {
        self.failures.push(PassFailure {
            pass,
            message: message.into(),
        });
    }

    /// Returns true if no pass failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns true if any data-quality issue was found.
    ///
    /// Issues are problem-character keys, abbreviated street names and
    /// non-conforming postal codes.
    pub fn has_issues(&self) -> bool {
        let problem_keys = self
            .key_tally
            .as_ref()
            .map(|t| t.get(KeyCategory::ProblemChars) > 0)
            .unwrap_or(false);
        problem_keys
            || self.has_abbreviations.unwrap_or(false)
            || !self.nonconforming_postcodes.is_empty()
    }

    /// Formats the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::prelude::Result<String> {
        use crate::formatters::{JsonFormatter, ReportFormatter};
        JsonFormatter::new().with_pretty(true).format(self)
    }

    /// Formats the report for console display.
    pub fn to_human(&self) -> crate::prelude::Result<String> {
        use crate::formatters::{HumanFormatter, ReportFormatter};
        HumanFormatter::new().format(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_is_empty() {
        let report = AuditReport::new("sample.osm");
        assert_eq!(report.source, "sample.osm");
        assert!(report.is_complete());
        assert!(!report.has_issues());
        assert!(report.has_abbreviations.is_none());
    }

    #[test]
    fn test_street_types_derive_abbreviation_flag() {
        let mut index = BucketedValueIndex::new();
        index.insert("Street", "Baker Street");

        let mut report = AuditReport::new("t");
        report.set_street_types(index.clone());
        assert_eq!(report.has_abbreviations, Some(false));

        index.insert(ABBREVIATION_BUCKET, "---");
        report.set_street_types(index);
        assert_eq!(report.has_abbreviations, Some(true));
        assert!(report.has_issues());
    }

    #[test]
    fn test_postcodes_extract_exclude_bucket() {
        let mut index = BucketedValueIndex::new();
        index.insert("100 00", "100 00");
        index.insert(EXCLUDE_BUCKET, "10000");

        let mut report = AuditReport::new("t");
        report.set_postcodes(index);
        assert_eq!(
            report.nonconforming_postcodes,
            BTreeSet::from(["10000".to_string()])
        );
        assert!(report.has_issues());
    }

    #[test]
    fn test_problem_keys_are_issues() {
        let mut tally = CategoryTally::new();
        tally.increment(KeyCategory::Lower);
        let mut report = AuditReport::new("t");
        report.key_tally = Some(tally.clone());
        assert!(!report.has_issues());

        tally.increment(KeyCategory::ProblemChars);
        report.key_tally = Some(tally);
        assert!(report.has_issues());
    }

    #[test]
    fn test_failures_serialize_with_pass_name() {
        let mut report = AuditReport::new("t");
        report.add_failure(Pass::TagKeys, "Element <tag> is missing required attribute 'k'");
        assert!(!report.is_complete());

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"pass\":\"tag_keys\""));
        assert!(!json.contains("key_tally"));
        assert_eq!(Pass::StreetSuffixes.to_string(), "street_suffixes");
    }
}
