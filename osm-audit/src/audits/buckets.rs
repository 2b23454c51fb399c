//! Shared plumbing for the value-bucketing passes.

use crate::core::{AuditConfig, BucketLabel, BucketedValueIndex, RuleSet};
use crate::prelude::*;

/// Selects the descriptors a bucketing pass reads.
///
/// A descriptor qualifies when its name is the configured descriptor element,
/// its direct parent is one of the containers and its key equals `key`.
#[derive(Debug, Clone)]
pub(crate) struct DescriptorFilter {
    element: String,
    key_attribute: String,
    value_attribute: String,
    containers: Vec<String>,
    key: String,
}

impl DescriptorFilter {
    pub(crate) fn new(config: &AuditConfig, key: &str) -> Self {
        Self {
            element: config.descriptor_element.clone(),
            key_attribute: config.key_attribute.clone(),
            value_attribute: config.value_attribute.clone(),
            containers: config.containers.clone(),
            key: key.to_string(),
        }
    }

    /// Returns the value of a qualifying descriptor, `None` for anything else.
    ///
    /// A descriptor inside a container must carry both key and value
    /// attributes; a missing one is an error.
    pub(crate) fn value_of<'e>(&self, element: &'e Element) -> Result<Option<&'e str>> {
        if element.name != self.element || !element.is_within(&self.containers) {
            return Ok(None);
        }
        let key = element.require_attribute(&self.key_attribute)?;
        if key != self.key {
            return Ok(None);
        }
        element.require_attribute(&self.value_attribute).map(Some)
    }
}

/// Files values into a [`BucketedValueIndex`] using an ordered rule set.
#[derive(Debug, Clone)]
pub(crate) struct ValueBucketer {
    rules: RuleSet<BucketLabel>,
    index: BucketedValueIndex,
    filed: u64,
    dropped: u64,
}

impl ValueBucketer {
    pub(crate) fn new(rules: RuleSet<BucketLabel>) -> Self {
        Self {
            rules,
            index: BucketedValueIndex::new(),
            filed: 0,
            dropped: 0,
        }
    }

    /// Files `value` under the bucket chosen by the first matching rule.
    ///
    /// Returns the bucket name, or `None` when no rule matched and the value
    /// was dropped.
    pub(crate) fn file(&mut self, value: &str) -> Option<String> {
        match self.rules.first_match(value) {
            Some(hit) => {
                let bucket = hit.label.resolve(hit.text).to_string();
                self.index.insert(&bucket, value);
                self.filed += 1;
                Some(bucket)
            }
            None => {
                self.dropped += 1;
                None
            }
        }
    }

    pub(crate) fn index(&self) -> &BucketedValueIndex {
        &self.index
    }

    pub(crate) fn filed(&self) -> u64 {
        self.filed
    }

    pub(crate) fn dropped(&self) -> u64 {
        self.dropped
    }

    pub(crate) fn into_index(self) -> BucketedValueIndex {
        self.index
    }
}
