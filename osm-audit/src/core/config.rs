//! Audit configuration.
//!
//! [`AuditConfig`] names the elements and attributes the passes look at and
//! carries the ordered rule lists each classifier runs. Defaults reproduce the
//! standard OpenStreetMap audit; every field can be overridden from JSON.
//!
//! ```rust
//! use osm_audit::core::AuditConfig;
//!
//! # fn example() -> osm_audit::error::Result<()> {
//! let config = AuditConfig::from_json_str(r#"{ "containers": ["node", "way", "relation"] }"#)?;
//! assert_eq!(config.containers.len(), 3);
//! assert_eq!(config.street_key, "addr:street");
//! # Ok(())
//! # }
//! ```

use super::rules::{BucketLabel, Matching, Predicate, Rule, RuleSet};
use super::types::{KeyCategory, ABBREVIATION_BUCKET, EXCLUDE_BUCKET};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A rule assigning matching keys to a [`KeyCategory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRuleSpec {
    pub category: KeyCategory,
    pub matching: Matching,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl KeyRuleSpec {
    pub fn new(category: KeyCategory, matching: Matching, pattern: &str) -> Self {
        Self {
            category,
            matching,
            pattern: Some(pattern.to_string()),
        }
    }
}

/// A rule filing matching values into a bucket.
///
/// With no `bucket`, the value is filed under the text the pattern matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRuleSpec {
    pub matching: Matching,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

impl BucketRuleSpec {
    /// Files under the matched text.
    pub fn matched(matching: Matching, pattern: &str) -> Self {
        Self {
            matching,
            pattern: Some(pattern.to_string()),
            bucket: None,
        }
    }

    /// Files under a fixed bucket.
    pub fn fixed(matching: Matching, pattern: Option<&str>, bucket: &str) -> Self {
        Self {
            matching,
            pattern: pattern.map(str::to_string),
            bucket: Some(bucket.to_string()),
        }
    }

    fn compile(&self, rule: &str) -> Result<Rule<BucketLabel>> {
        let predicate = Predicate::compile(self.matching, self.pattern.as_deref(), rule)?;
        let label = match &self.bucket {
            Some(bucket) => BucketLabel::Fixed(bucket.clone()),
            None => BucketLabel::Matched,
        };
        Ok(Rule::new(predicate, label))
    }
}

/// Configuration shared by all audit passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Name of descriptor elements (`<tag k=".." v=".."/>`)
    pub descriptor_element: String,
    /// Attribute holding a descriptor's key
    pub key_attribute: String,
    /// Attribute holding a descriptor's value
    pub value_attribute: String,
    /// Containers whose descriptors the street and postal code passes read
    pub containers: Vec<String>,
    /// Descriptor key of street names
    pub street_key: String,
    /// Descriptor key of postal codes
    pub postcode_key: String,
    /// Key shape rules, in priority order; unmatched keys count as `other`
    pub key_rules: Vec<KeyRuleSpec>,
    /// Street suffix rules, in priority order; unmatched values are dropped
    pub street_rules: Vec<BucketRuleSpec>,
    /// Postal code rules, in priority order
    pub postcode_rules: Vec<BucketRuleSpec>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            descriptor_element: "tag".to_string(),
            key_attribute: "k".to_string(),
            value_attribute: "v".to_string(),
            containers: vec!["node".to_string(), "way".to_string()],
            street_key: "addr:street".to_string(),
            postcode_key: "addr:postcode".to_string(),
            key_rules: default_key_rules(),
            street_rules: default_street_rules(),
            postcode_rules: default_postcode_rules(),
        }
    }
}

/// `lower`, then `lower_colon`, then `problemchars`.
pub fn default_key_rules() -> Vec<KeyRuleSpec> {
    vec![
        KeyRuleSpec::new(KeyCategory::Lower, Matching::Full, "[a-z_]*"),
        KeyRuleSpec::new(KeyCategory::LowerColon, Matching::Full, "[a-z_]*:[a-z_]*"),
        KeyRuleSpec::new(
            KeyCategory::ProblemChars,
            Matching::Search,
            r#"[=+/&<>;'"?%#$@,. \t\r\n]"#,
        ),
    ]
}

/// Last ASCII word, then last Unicode word, then a trailing abbreviation.
///
/// The ASCII rule matches any value holding an ASCII letter, digit or
/// underscore, so the later rules only see values without one.
pub fn default_street_rules() -> Vec<BucketRuleSpec> {
    vec![
        BucketRuleSpec::matched(Matching::Last, r"(?-u:\w)+"),
        BucketRuleSpec::matched(Matching::Last, r"\w+"),
        BucketRuleSpec::fixed(
            Matching::Search,
            Some(r"(?i)\S+\.?\n?\z"),
            ABBREVIATION_BUCKET,
        ),
    ]
}

/// Whole-value `ddd dd` codes under themselves, everything else under `exclude`.
pub fn default_postcode_rules() -> Vec<BucketRuleSpec> {
    vec![
        BucketRuleSpec::matched(Matching::Full, r"(?-u:\d{3}\s+\d{2})"),
        BucketRuleSpec::fixed(Matching::Always, None, EXCLUDE_BUCKET),
    ]
}

impl AuditConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a configuration from JSON.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Reading audit config {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the container elements.
    pub fn with_containers<I, S>(mut self, containers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.containers = containers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the descriptor element name.
    pub fn with_descriptor_element(mut self, name: impl Into<String>) -> Self {
        self.descriptor_element = name.into();
        self
    }

    /// Replaces the key shape rules.
    pub fn with_key_rules(mut self, rules: Vec<KeyRuleSpec>) -> Self {
        self.key_rules = rules;
        self
    }

    /// Replaces the street suffix rules.
    pub fn with_street_rules(mut self, rules: Vec<BucketRuleSpec>) -> Self {
        self.street_rules = rules;
        self
    }

    /// Replaces the postal code rules.
    pub fn with_postcode_rules(mut self, rules: Vec<BucketRuleSpec>) -> Self {
        self.postcode_rules = rules;
        self
    }

    /// Checks names are non-empty and every rule compiles.
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("descriptor_element", &self.descriptor_element),
            ("key_attribute", &self.key_attribute),
            ("value_attribute", &self.value_attribute),
            ("street_key", &self.street_key),
            ("postcode_key", &self.postcode_key),
        ];
        for (field, value) in names {
            if value.is_empty() {
                return Err(AuditError::Configuration(format!("{field} must not be empty")));
            }
        }
        if self.containers.is_empty() {
            return Err(AuditError::Configuration(
                "containers must name at least one element".to_string(),
            ));
        }
        if let Some(blank) = self.containers.iter().position(String::is_empty) {
            return Err(AuditError::Configuration(format!(
                "containers[{blank}] must not be empty"
            )));
        }

        self.key_rule_set()?;
        self.street_rule_set()?;
        self.postcode_rule_set()?;
        Ok(())
    }

    /// Compiles the key shape rules.
    pub fn key_rule_set(&self) -> Result<RuleSet<KeyCategory>> {
        let rules = self
            .key_rules
            .iter()
            .enumerate()
            .map(|(i, spec)| -> Result<Rule<KeyCategory>> {
                let name = format!("key_rules[{i}]");
                let predicate = Predicate::compile(spec.matching, spec.pattern.as_deref(), &name)?;
                Ok(Rule::new(predicate, spec.category))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(RuleSet::new(rules))
    }

    /// Compiles the street suffix rules.
    pub fn street_rule_set(&self) -> Result<RuleSet<BucketLabel>> {
        compile_bucket_rules("street_rules", &self.street_rules)
    }

    /// Compiles the postal code rules.
    pub fn postcode_rule_set(&self) -> Result<RuleSet<BucketLabel>> {
        compile_bucket_rules("postcode_rules", &self.postcode_rules)
    }
}

fn compile_bucket_rules(list: &str, specs: &[BucketRuleSpec]) -> Result<RuleSet<BucketLabel>> {
    let rules = specs
        .iter()
        .enumerate()
        .map(|(i, spec)| spec.compile(&format!("{list}[{i}]")))
        .collect::<Result<Vec<_>>>()?;
    Ok(RuleSet::new(rules))
}
