//! Ordered classification rules.
//!
//! A [`RuleSet`] is an immutable, ordered list of `(predicate, label)` pairs.
//! Classification is first-match-wins: rules are tried in order and the first
//! predicate that matches decides the outcome; later rules are never consulted.

use crate::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How a rule's pattern is applied to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Matching {
    /// The pattern must match the entire value
    Full,
    /// The first match anywhere in the value
    Search,
    /// The last non-overlapping match anywhere in the value
    Last,
    /// Matches every value; takes no pattern
    Always,
}

/// A compiled rule predicate.
///
/// [`Predicate::find`] returns the text that satisfied the predicate: the whole
/// value for `Full` and `Always`, the matched substring otherwise.
#[derive(Debug, Clone)]
pub enum Predicate {
    Full(Regex),
    Search(Regex),
    Last(Regex),
    Always,
}

impl Predicate {
    /// Compiles `pattern` under the given matching mode.
    ///
    /// `rule` names the rule in error messages.
    pub fn compile(matching: Matching, pattern: Option<&str>, rule: &str) -> Result<Self> {
        let Some(pattern) = pattern else {
            return match matching {
                Matching::Always => Ok(Predicate::Always),
                other => Err(AuditError::Configuration(format!(
                    "rule '{rule}' uses {other:?} matching but has no pattern"
                ))),
            };
        };

        let compile = |source: &str| {
            Regex::new(source).map_err(|e| AuditError::InvalidPattern {
                rule: rule.to_string(),
                pattern: pattern.to_string(),
                source: e,
            })
        };

        Ok(match matching {
            Matching::Full => Predicate::Full(compile(format!("^(?:{pattern})$").as_str())?),
            Matching::Search => Predicate::Search(compile(pattern)?),
            Matching::Last => Predicate::Last(compile(pattern)?),
            Matching::Always => Predicate::Always,
        })
    }

    /// Returns the text that satisfied the predicate, or `None`.
    pub fn find<'v>(&self, value: &'v str) -> Option<&'v str> {
        match self {
            Predicate::Full(re) => re.is_match(value).then_some(value),
            Predicate::Search(re) => re.find(value).map(|m| m.as_str()),
            Predicate::Last(re) => re.find_iter(value).last().map(|m| m.as_str()),
            Predicate::Always => Some(value),
        }
    }
}

/// Where a matching bucket rule files its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketLabel {
    /// Under the text the predicate matched
    Matched,
    /// Under a fixed, reserved label
    Fixed(String),
}

impl BucketLabel {
    /// Resolves the bucket name for a value whose predicate matched `text`.
    pub fn resolve<'a>(&'a self, text: &'a str) -> &'a str {
        match self {
            BucketLabel::Matched => text,
            BucketLabel::Fixed(label) => label,
        }
    }
}

/// One classification rule.
#[derive(Debug, Clone)]
pub struct Rule<L> {
    pub predicate: Predicate,
    pub label: L,
}

impl<L> Rule<L> {
    pub fn new(predicate: Predicate, label: L) -> Self {
        Self { predicate, label }
    }
}

/// The outcome of classifying one value.
#[derive(Debug)]
pub struct RuleMatch<'r, 'v, L> {
    /// Position of the winning rule
    pub index: usize,
    /// Label of the winning rule
    pub label: &'r L,
    /// Text that satisfied the winning predicate
    pub text: &'v str,
}

/// Ordered, immutable list of rules evaluated first-match-wins.
#[derive(Debug, Clone)]
pub struct RuleSet<L> {
    rules: Vec<Rule<L>>,
}

impl<L> RuleSet<L> {
    /// Creates a rule set; `rules` order is the evaluation order.
    pub fn new(rules: Vec<Rule<L>>) -> Self {
        Self { rules }
    }

    /// Returns the first rule whose predicate matches `value`.
    pub fn first_match<'r, 'v>(&'r self, value: &'v str) -> Option<RuleMatch<'r, 'v, L>> {
        self.rules.iter().enumerate().find_map(|(index, rule)| {
            rule.predicate.find(value).map(|text| RuleMatch {
                index,
                label: &rule.label,
                text,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<L>> {
        self.rules.iter()
    }
}
