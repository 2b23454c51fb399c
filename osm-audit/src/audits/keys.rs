//! Tag key shape classification.

use super::{run_pass, Audit};
use crate::core::{AuditConfig, CategoryTally, KeyCategory, RuleSet};
use crate::log_classification;
use crate::logging::truncate_field;
use crate::prelude::*;
use std::io::BufRead;

/// Tallies descriptor keys by shape.
///
/// Every descriptor element is counted, whatever its container. Keys matching
/// no configured rule count as [`KeyCategory::Other`].
#[derive(Debug, Clone)]
pub struct TagKeyClassifier {
    rules: RuleSet<KeyCategory>,
    descriptor_element: String,
    key_attribute: String,
    tally: CategoryTally,
    log: LogConfig,
}

impl TagKeyClassifier {
    /// Builds a classifier from the key rules and names in `config`.
    pub fn from_config(config: &AuditConfig) -> Result<Self> {
        Ok(Self {
            rules: config.key_rule_set()?,
            descriptor_element: config.descriptor_element.clone(),
            key_attribute: config.key_attribute.clone(),
            tally: CategoryTally::new(),
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

    /// Classifies one key and records it in the tally.
    pub fn classify(&mut self, key: &str) -> KeyCategory {
        let category = self
            .rules
            .first_match(key)
            .map(|hit| *hit.label)
            .unwrap_or(KeyCategory::Other);
        self.tally.increment(category);

        log_classification!(
            self.log,
            key = %truncate_field(key, self.log.max_field_length),
            category = %category,
            "Classified tag key"
        );
        category
    }

    /// The tally so far.
    pub fn tally(&self) -> &CategoryTally {
        &self.tally
    }
}

impl Audit for TagKeyClassifier {
    type Output = CategoryTally;

    fn name(&self) -> &str {
        "tag_keys"
    }

    fn observe(&mut self, element: &Element) -> Result<()> {
        if element.name == self.descriptor_element {
            let key = element.require_attribute(&self.key_attribute)?;
            self.classify(key);
        }
        Ok(())
    }

    fn outcomes(&self) -> u64 {
        self.tally.total()
    }

    fn finish(self) -> CategoryTally {
        self.tally
    }
}

/// Tallies the key shapes of every descriptor in `document` with the default
/// rules.
pub fn classify_keys<R: BufRead>(document: R) -> Result<CategoryTally> {
    classify_keys_with(document, &AuditConfig::default())
}

/// Tallies the key shapes of every descriptor in `document`.
pub fn classify_keys_with<R: BufRead>(document: R, config: &AuditConfig) -> Result<CategoryTally> {
    run_pass(
        TagKeyClassifier::from_config(config)?,
        ElementWalker::new(document),
    )
}
