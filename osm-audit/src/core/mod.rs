//! Core types: configuration, classification rules, accumulators and reports.

pub mod config;
pub mod report;
pub mod rules;
pub mod types;

pub use config::{AuditConfig, BucketRuleSpec, KeyRuleSpec};
pub use report::{AuditReport, Pass, PassFailure};
pub use rules::{BucketLabel, Matching, Predicate, Rule, RuleMatch, RuleSet};
pub use types::{
    BucketedValueIndex, CategoryTally, ElementCensus, KeyCategory, ABBREVIATION_BUCKET,
    EXCLUDE_BUCKET,
};
