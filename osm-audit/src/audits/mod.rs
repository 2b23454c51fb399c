//! Audit passes over an element stream.
//!
//! Each pass is a value implementing [`Audit`]: it owns its accumulator,
//! observes elements one at a time and is consumed by [`Audit::finish`] to
//! produce its result. [`run_pass`] drives one audit over one
//! [`ElementWalker`]; the first error from either the walker or the audit
//! ends the pass and no partial result is returned.
//!
//! ```rust
//! use osm_audit::audits::{audit_source, TagKeyClassifier};
//! use osm_audit::core::KeyCategory;
//! use osm_audit::sources::InMemoryDocument;
//!
//! # fn example() -> osm_audit::error::Result<()> {
//! let xml = r#"<osm><node><tag k="name;alt" v="x"/></node></osm>"#;
//! let doc = InMemoryDocument::new("inline", xml);
//! let tally = audit_source(TagKeyClassifier::with_defaults()?, &doc)?;
//! assert_eq!(tally.get(KeyCategory::ProblemChars), 1);
//! # Ok(())
//! # }
//! ```

use crate::prelude::*;
use crate::sources::DocumentSource;
use std::fmt::Debug;
use std::io::BufRead;
use tracing::{info, instrument};

mod buckets;
mod census;
mod keys;
mod postcodes;
mod runner;
mod streets;

pub use census::{count_elements, ElementCounter};
pub use keys::{classify_keys, classify_keys_with, TagKeyClassifier};
pub use postcodes::{classify_postcodes, classify_postcodes_with, PostcodeClassifier};
pub use runner::AuditRunner;
pub use streets::{classify_streets, classify_streets_with, StreetSuffixClassifier};

/// A single pass over the elements of a document.
pub trait Audit: Debug {
    /// The aggregate produced when the pass completes.
    type Output;

    /// Short identifier used in logs and reports.
    fn name(&self) -> &str;

    /// Observes one element. An error aborts the pass.
    fn observe(&mut self, element: &Element) -> Result<()>;

    /// Number of elements that contributed to the aggregate so far.
    fn outcomes(&self) -> u64;

    /// Consumes the audit and returns its aggregate.
    fn finish(self) -> Self::Output;
}

/// Runs `audit` over every element of `walker`.
#[instrument(skip(audit, walker), fields(pass = audit.name()))]
pub fn run_pass<A, R>(mut audit: A, mut walker: ElementWalker<R>) -> Result<A::Output>
where
    A: Audit,
    R: BufRead,
{
    for element in walker.by_ref() {
        audit.observe(&element?)?;
    }

    info!(
        pass = audit.name(),
        elements = walker.elements_read(),
        outcomes = audit.outcomes(),
        "Audit pass completed"
    );
    Ok(audit.finish())
}

/// Opens a fresh stream from `source` and runs `audit` over it.
///
/// The stream is dropped when the pass returns, on success or failure.
pub fn audit_source<A, S>(audit: A, source: &S) -> Result<A::Output>
where
    A: Audit,
    S: DocumentSource,
{
    run_pass(audit, source.walk()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::InMemoryDocument;
    use crate::test_fixtures;

    #[derive(Debug, Default)]
    struct NameCollector {
        names: Vec<String>,
    }

    impl Audit for NameCollector {
        type Output = Vec<String>;

        fn name(&self) -> &str {
            "names"
        }

        fn observe(&mut self, element: &Element) -> Result<()> {
            if element.name == "boom" {
                return Err(AuditError::Internal("boom".to_string()));
            }
            self.names.push(element.name.clone());
            Ok(())
        }

        fn outcomes(&self) -> u64 {
            self.names.len() as u64
        }

        fn finish(self) -> Self::Output {
            self.names
        }
    }

    #[test]
    fn test_run_pass_visits_every_element() {
        let walker = ElementWalker::new(test_fixtures::SMALL_EXTRACT.as_bytes());
        let names = run_pass(NameCollector::default(), walker).unwrap();
        assert_eq!(names.len(), 13);
        assert_eq!(names[0], "osm");
    }

    #[test]
    fn test_run_pass_stops_on_audit_error() {
        let walker = ElementWalker::new("<osm><boom/><node/></osm>".as_bytes());
        let err = run_pass(NameCollector::default(), walker).unwrap_err();
        assert!(matches!(err, AuditError::Internal(_)));
    }

    #[test]
    fn test_run_pass_propagates_structural_errors() {
        let walker = ElementWalker::new(test_fixtures::MALFORMED.as_bytes());
        let err = run_pass(NameCollector::default(), walker).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_audit_source_opens_fresh_streams() {
        let doc = InMemoryDocument::new("fixture", test_fixtures::SMALL_EXTRACT);
        let first = audit_source(NameCollector::default(), &doc).unwrap();
        let second = audit_source(NameCollector::default(), &doc).unwrap();
        assert_eq!(first, second);
    }
}
