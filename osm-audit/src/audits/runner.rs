//! Sequential execution of the audit passes over one source.

use super::{
    audit_source, ElementCounter, PostcodeClassifier, StreetSuffixClassifier, TagKeyClassifier,
};
use crate::core::{AuditConfig, AuditReport, Pass};
use crate::{log_debug, log_run_summary};
use crate::prelude::*;
use crate::sources::DocumentSource;
use tracing::{error, info, instrument, warn};

/// Runs the enabled passes over a document, one fresh stream per pass.
///
/// Passes run in [`Pass::ALL`] order. By default the first failing pass
/// aborts the run; with [`AuditRunner::continue_on_error`] the failure is
/// recorded in the report and the remaining passes still run.
///
/// # Example
///
/// ```rust
/// use osm_audit::audits::AuditRunner;
/// use osm_audit::sources::InMemoryDocument;
///
/// # fn example() -> osm_audit::error::Result<()> {
/// let doc = InMemoryDocument::new(
///     "inline",
///     r#"<osm><way><tag k="addr:street" v="5th Ave"/></way></osm>"#,
/// );
/// let report = AuditRunner::default().run(&doc)?;
/// assert_eq!(report.has_abbreviations, Some(false));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AuditRunner {
    config: AuditConfig,
    log: LogConfig,
    continue_on_error: bool,
    enabled: Vec<Pass>,
}

impl Default for AuditRunner {
    fn default() -> Self {
        Self::new(AuditConfig::default())
    }
}

impl AuditRunner {
    /// Creates a runner with every pass enabled.
    pub fn new(config: AuditConfig) -> Self {
        Self {
            config,
            log: LogConfig::default(),
            continue_on_error: false,
            enabled: Pass::ALL.to_vec(),
        }
    }

    /// Sets the logging configuration handed to the classifiers.
    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Sets whether to continue with the remaining passes when one fails.
    ///
    /// Default is false (abort on the first failure).
    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Enables or disables one pass.
    pub fn with_pass(mut self, pass: Pass, enabled: bool) -> Self {
        self.enabled.retain(|p| *p != pass);
        if enabled {
            self.enabled.push(pass);
        }
        self
    }

    /// Runs only the given passes.
    pub fn only(mut self, passes: &[Pass]) -> Self {
        self.enabled = passes.to_vec();
        self
    }

    /// Returns true if `pass` will run.
    pub fn is_enabled(&self, pass: Pass) -> bool {
        self.enabled.contains(&pass)
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Runs the enabled passes over `source`.
    ///
    /// The configuration is validated before any stream is opened.
    #[instrument(skip(self, source), fields(source = %source.description()))]
    pub fn run<S: DocumentSource>(&self, source: &S) -> Result<AuditReport> {
        self.config.validate()?;

        let passes: Vec<Pass> = Pass::ALL
            .into_iter()
            .filter(|pass| self.is_enabled(*pass))
            .collect();
        info!(
            passes = passes.len(),
            continue_on_error = self.continue_on_error,
            "Starting audit run"
        );

        let mut report = AuditReport::new(source.description());
        for pass in passes {
            log_debug!(self.log, %pass, "Running audit pass");
            if let Err(err) = self.run_pass(pass, source, &mut report) {
                if !self.continue_on_error {
                    error!(%pass, error = %err, "Audit pass failed");
                    return Err(err);
                }
                warn!(%pass, error = %err, "Audit pass failed, continuing with remaining passes");
                report.add_failure(pass, err.to_string());
            }
        }

        log_run_summary!(
            self.log,
            failures = report.failures.len(),
            has_issues = report.has_issues(),
            "Audit run completed"
        );
        Ok(report)
    }

    fn run_pass<S: DocumentSource>(
        &self,
        pass: Pass,
        source: &S,
        report: &mut AuditReport,
    ) -> Result<()> {
        match pass {
            Pass::ElementCensus => {
                report.element_counts = Some(audit_source(ElementCounter::new(), source)?);
            }
            Pass::TagKeys => {
                let audit =
                    TagKeyClassifier::from_config(&self.config)?.with_log_config(self.log.clone());
                report.key_tally = Some(audit_source(audit, source)?);
            }
            Pass::StreetSuffixes => {
                let audit = StreetSuffixClassifier::from_config(&self.config)?
                    .with_log_config(self.log.clone());
                report.set_street_types(audit_source(audit, source)?);
            }
            Pass::PostalCodes => {
                let audit = PostcodeClassifier::from_config(&self.config)?
                    .with_log_config(self.log.clone());
                report.set_postcodes(audit_source(audit, source)?);
            }
        }
        Ok(())
    }
}
