//! Report formatting for audit results.
//!
//! This module renders an [`AuditReport`] as JSON for tooling, as plain text
//! for the console, or as Markdown for documentation.
//!
//! # Examples
//!
//! ```rust
//! use osm_audit::core::AuditReport;
//! use osm_audit::formatters::{HumanFormatter, ReportFormatter};
//!
//! let report = AuditReport::new("sample.osm");
//! let text = HumanFormatter::new().format(&report).unwrap();
//! assert!(text.contains("sample.osm"));
//! ```

use crate::core::{AuditReport, BucketedValueIndex, KeyCategory};
use crate::prelude::*;
use std::collections::BTreeSet;
use std::fmt::{self, Write};

/// Configuration options for formatting audit reports.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include the element census
    pub include_census: bool,
    /// Include bucket contents (street types, postal code buckets)
    pub include_buckets: bool,
    /// Include pass failures
    pub include_failures: bool,
    /// Maximum number of values listed per bucket (-1 for all)
    pub max_values: i32,
    /// Whether to use colorized output (for human formatter)
    pub use_colors: bool,
    /// Whether to include timestamps in output
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_census: true,
            include_buckets: false,
            include_failures: true,
            max_values: 20,
            use_colors: false,
            include_timestamps: true,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only the audit signals.
    pub fn minimal() -> Self {
        Self {
            include_census: false,
            include_buckets: false,
            include_failures: true,
            max_values: 10,
            use_colors: false,
            include_timestamps: false,
        }
    }

    /// Creates a detailed configuration showing everything.
    pub fn detailed() -> Self {
        Self {
            include_census: true,
            include_buckets: true,
            include_failures: true,
            max_values: -1,
            use_colors: true,
            include_timestamps: true,
        }
    }

    /// Creates a configuration suitable for CI logs.
    pub fn ci() -> Self {
        Self {
            include_census: true,
            include_buckets: true,
            include_failures: true,
            max_values: 50,
            use_colors: false,
            include_timestamps: true,
        }
    }

    /// Sets whether to include the element census.
    pub fn with_census(mut self, include: bool) -> Self {
        self.include_census = include;
        self
    }

    /// Sets whether to list bucket contents.
    pub fn with_buckets(mut self, include: bool) -> Self {
        self.include_buckets = include;
        self
    }

    /// Sets the maximum number of values listed per bucket.
    pub fn with_max_values(mut self, max: i32) -> Self {
        self.max_values = max;
        self
    }

    /// Sets whether to use colorized output.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn limit(&self) -> Option<usize> {
        usize::try_from(self.max_values).ok()
    }
}

/// Trait for rendering audit reports into different output formats.
///
/// # Examples
///
/// ```rust
/// use osm_audit::core::AuditReport;
/// use osm_audit::formatters::ReportFormatter;
///
/// struct IssueFlag;
///
/// impl ReportFormatter for IssueFlag {
///     fn format(&self, report: &AuditReport) -> osm_audit::prelude::Result<String> {
///         Ok(format!("issues: {}", report.has_issues()))
///     }
/// }
/// ```
pub trait ReportFormatter {
    /// Formats a report into a string representation.
    fn format(&self, report: &AuditReport) -> Result<String>;

    /// Formats a report with custom configuration.
    fn format_with_config(
        &self,
        report: &AuditReport,
        _config: &FormatterConfig,
    ) -> Result<String> {
        self.format(report)
    }
}

/// Formats reports as structured JSON.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a JSON formatter that keeps every field of the report.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::detailed(),
            pretty: false,
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: false,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &AuditReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &AuditReport, config: &FormatterConfig) -> Result<String> {
        let filtered = filter_report_for_config(report, config)?;
        let json = if self.pretty {
            serde_json::to_string_pretty(&filtered)
        } else {
            serde_json::to_string(&filtered)
        };
        json.map_err(|e| AuditError::Internal(format!("Failed to serialize report to JSON: {e}")))
    }
}

/// Drops the sections `config` excludes from the JSON form of `report`.
fn filter_report_for_config(
    report: &AuditReport,
    config: &FormatterConfig,
) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(report)?;
    if let Some(object) = value.as_object_mut() {
        if !config.include_census {
            object.remove("element_counts");
        }
        if !config.include_buckets {
            object.remove("street_types");
            object.remove("postcodes");
        }
        if !config.include_failures {
            object.remove("failures");
        }
        if !config.include_timestamps {
            object.remove("timestamp");
        }
    }
    Ok(value)
}

/// Formats reports for console output.
///
/// The layout follows the classic audit printout: element counts, key
/// categories, whether street abbreviations were found and the list of
/// non-conforming postal codes.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    fn render(
        &self,
        out: &mut String,
        report: &AuditReport,
        config: &FormatterConfig,
    ) -> fmt::Result {
        let (green, red, reset) = if config.use_colors {
            ("\x1b[32m", "\x1b[31m", "\x1b[0m")
        } else {
            ("", "", "")
        };

        writeln!(out, "OSM audit: {}", report.source)?;
        if config.include_timestamps {
            writeln!(out, "Timestamp: {}", report.timestamp)?;
        }

        if config.include_census {
            if let Some(census) = &report.element_counts {
                writeln!(out)?;
                writeln!(out, "Information for all the tags in the file:")?;
                for (name, count) in census.iter() {
                    writeln!(out, "   {name}: {count}")?;
                }
            }
        }

        if let Some(tally) = &report.key_tally {
            writeln!(out)?;
            writeln!(out, "Number of different tags in the file:")?;
            for (category, count) in tally.iter() {
                let color = if category == KeyCategory::ProblemChars && count > 0 {
                    red
                } else {
                    ""
                };
                let end = if color.is_empty() { "" } else { reset };
                writeln!(out, "   {category}: {color}{count}{end}")?;
            }
        }

        if let Some(found) = report.has_abbreviations {
            writeln!(out)?;
            if found {
                writeln!(out, "{red}True{reset}: Abbreviations found in the street names.")?;
            } else {
                writeln!(out, "{green}False{reset}: Abbreviations not found in the street names.")?;
            }
            if config.include_buckets {
                if let Some(index) = &report.street_types {
                    writeln!(out, "Types of street names in the file:")?;
                    render_index(out, index, config)?;
                }
            }
        }

        if report.postcodes.is_some() {
            writeln!(out)?;
            if report.nonconforming_postcodes.is_empty() {
                writeln!(out, "All postal codes in the file are standardized.")?;
            } else {
                writeln!(out, "Incorrected/Unstandardized postal codes in the file:")?;
                render_values(out, &report.nonconforming_postcodes, config, "   ")?;
            }
            if config.include_buckets {
                if let Some(index) = &report.postcodes {
                    writeln!(out, "Postal code formats in the file:")?;
                    render_index(out, index, config)?;
                }
            }
        }

        if config.include_failures && !report.failures.is_empty() {
            writeln!(out)?;
            writeln!(out, "{red}Failed passes:{reset}")?;
            for failure in &report.failures {
                writeln!(out, "   {}: {}", failure.pass, failure.message)?;
            }
        }

        Ok(())
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for HumanFormatter {
    fn format(&self, report: &AuditReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &AuditReport, config: &FormatterConfig) -> Result<String> {
        let mut output = String::new();
        self.render(&mut output, report, config)
            .map_err(|e| AuditError::Internal(format!("Failed to format report: {e}")))?;
        Ok(output)
    }
}

fn render_index(
    out: &mut String,
    index: &BucketedValueIndex,
    config: &FormatterConfig,
) -> fmt::Result {
    for (bucket, values) in index.iter() {
        writeln!(out, "   {bucket} ({})", values.len())?;
        render_values(out, values, config, "      ")?;
    }
    Ok(())
}

fn render_values(
    out: &mut String,
    values: &BTreeSet<String>,
    config: &FormatterConfig,
    indent: &str,
) -> fmt::Result {
    let shown = config.limit().unwrap_or(values.len()).min(values.len());
    for value in values.iter().take(shown) {
        writeln!(out, "{indent}{value:?}")?;
    }
    if values.len() > shown {
        writeln!(out, "{indent}... and {} more", values.len() - shown)?;
    }
    Ok(())
}

/// Formats reports as Markdown.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    heading_level: u8,
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            heading_level: 2,
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            heading_level: 2,
        }
    }

    /// Sets the base heading level for the output.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 5);
        self
    }

    fn render(
        &self,
        out: &mut String,
        report: &AuditReport,
        config: &FormatterConfig,
    ) -> fmt::Result {
        let h = "#".repeat(self.heading_level as usize);
        let status = if report.has_issues() {
            "issues found"
        } else {
            "clean"
        };

        writeln!(out, "{h} OSM Audit Report: {status}")?;
        writeln!(out)?;
        writeln!(out, "**Source:** {}", report.source)?;
        if config.include_timestamps {
            writeln!(out, "**Timestamp:** {}", report.timestamp)?;
        }

        if config.include_census {
            if let Some(census) = &report.element_counts {
                writeln!(out)?;
                writeln!(out, "{h}# Elements")?;
                writeln!(out)?;
                writeln!(out, "| Element | Count |")?;
                writeln!(out, "|---------|-------|")?;
                for (name, count) in census.iter() {
                    writeln!(out, "| `{name}` | {count} |")?;
                }
            }
        }

        if let Some(tally) = &report.key_tally {
            writeln!(out)?;
            writeln!(out, "{h}# Tag keys")?;
            writeln!(out)?;
            writeln!(out, "| Category | Count |")?;
            writeln!(out, "|----------|-------|")?;
            for (category, count) in tally.iter() {
                writeln!(out, "| {category} | {count} |")?;
            }
        }

        if let Some(found) = report.has_abbreviations {
            writeln!(out)?;
            writeln!(out, "{h}# Street names")?;
            writeln!(out)?;
            writeln!(out, "- Abbreviations found: **{found}**")?;
            if config.include_buckets {
                if let Some(index) = &report.street_types {
                    for (bucket, values) in index.iter() {
                        writeln!(out, "- `{bucket}`: {}", values.len())?;
                    }
                }
            }
        }

        if report.postcodes.is_some() {
            writeln!(out)?;
            writeln!(out, "{h}# Postal codes")?;
            writeln!(out)?;
            if report.nonconforming_postcodes.is_empty() {
                writeln!(out, "All postal codes are standardized.")?;
            } else {
                let shown = config
                    .limit()
                    .unwrap_or(report.nonconforming_postcodes.len());
                for code in report.nonconforming_postcodes.iter().take(shown) {
                    writeln!(out, "- `{code}`")?;
                }
                if report.nonconforming_postcodes.len() > shown {
                    writeln!(
                        out,
                        "- ... and {} more",
                        report.nonconforming_postcodes.len() - shown
                    )?;
                }
            }
        }

        if config.include_failures && !report.failures.is_empty() {
            writeln!(out)?;
            writeln!(out, "{h}# Failed passes")?;
            writeln!(out)?;
            for failure in &report.failures {
                writeln!(out, "- **{}**: {}", failure.pass, failure.message)?;
            }
        }

        Ok(())
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, report: &AuditReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &AuditReport, config: &FormatterConfig) -> Result<String> {
        let mut output = String::new();
        self.render(&mut output, report, config)
            .map_err(|e| AuditError::Internal(format!("Failed to format report: {e}")))?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CategoryTally, ElementCensus, Pass, ABBREVIATION_BUCKET, EXCLUDE_BUCKET};

    fn sample_report() -> AuditReport {
        let mut report = AuditReport::new("sample.osm");

        let mut census = ElementCensus::new();
        census.record("osm");
        census.record("node");
        census.record("tag");
        report.element_counts = Some(census);

        let mut tally = CategoryTally::new();
        tally.increment(KeyCategory::Lower);
        tally.increment(KeyCategory::ProblemChars);
        report.key_tally = Some(tally);

        let mut streets = BucketedValueIndex::new();
        streets.insert("Street", "Baker Street");
        streets.insert(ABBREVIATION_BUCKET, "---");
        report.set_street_types(streets);

        let mut postcodes = BucketedValueIndex::new();
        postcodes.insert("100 00", "100 00");
        postcodes.insert(EXCLUDE_BUCKET, "10000");
        postcodes.insert(EXCLUDE_BUCKET, "ABCDE");
        report.set_postcodes(postcodes);

        report
    }

    #[test]
    fn test_json_formatter_keeps_everything_by_default() {
        let json = JsonFormatter::new().format(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["key_tally"]["problemchars"], 1);
        assert_eq!(value["has_abbreviations"], true);
        assert_eq!(value["street_types"]["Street"][0], "Baker Street");
        assert_eq!(value["nonconforming_postcodes"][1], "ABCDE");
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_json_formatter_filters_sections() {
        let json = JsonFormatter::new()
            .with_pretty(true)
            .format_with_config(&sample_report(), &FormatterConfig::minimal())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("element_counts").is_none());
        assert!(value.get("street_types").is_none());
        assert!(value.get("timestamp").is_none());
        assert!(value.get("key_tally").is_some());
    }

    #[test]
    fn test_human_formatter_prints_audit_signals() {
        let output = HumanFormatter::new().format(&sample_report()).unwrap();
        assert!(output.contains("OSM audit: sample.osm"));
        assert!(output.contains("   tag: 1"));
        assert!(output.contains("   problemchars: 1"));
        assert!(output.contains("True: Abbreviations found"));
        assert!(output.contains("Incorrected/Unstandardized postal codes in the file:"));
        assert!(output.contains("\"10000\""));
        assert!(!output.contains("Types of street names"));
    }

    #[test]
    fn test_human_formatter_reports_no_abbreviations() {
        let mut report = AuditReport::new("clean.osm");
        report.set_street_types(BucketedValueIndex::new());
        let output = HumanFormatter::with_config(FormatterConfig::minimal())
            .format(&report)
            .unwrap();
        assert!(output.contains("False: Abbreviations not found in the street names."));
        assert!(!output.contains("Timestamp"));
    }

    #[test]
    fn test_human_formatter_limits_values() {
        let config = FormatterConfig::detailed()
            .with_colors(false)
            .with_max_values(1);
        let output = HumanFormatter::with_config(config)
            .format(&sample_report())
            .unwrap();
        assert!(output.contains("Types of street names in the file:"));
        assert!(output.contains("... and 1 more"));
    }

    #[test]
    fn test_human_formatter_lists_failures() {
        let mut report = AuditReport::new("broken.osm");
        report.add_failure(Pass::TagKeys, "Element <tag> is missing required attribute 'k'");
        let output = HumanFormatter::new().format(&report).unwrap();
        assert!(output.contains("Failed passes:"));
        assert!(output.contains("tag_keys: Element <tag>"));
    }

    #[test]
    fn test_markdown_formatter() {
        let output = MarkdownFormatter::new()
            .with_heading_level(3)
            .format(&sample_report())
            .unwrap();
        assert!(output.starts_with("### OSM Audit Report: issues found"));
        assert!(output.contains("#### Tag keys"));
        assert!(output.contains("| problemchars | 1 |"));
        assert!(output.contains("- `10000`"));
    }
}
