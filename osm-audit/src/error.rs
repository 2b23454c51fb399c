//! Error types for the OSM audit library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`AuditError`] enum. A structural parse failure aborts the pass that hit it;
//! a missing attribute aborts only the classifier pass that tried to read it.

use thiserror::Error;

/// The main error type for the OSM audit library.
#[derive(Error, Debug)]
pub enum AuditError {
    /// The document stream is not well-formed XML.
    #[error("Malformed document at byte {position}: {message}")]
    StructuralParse {
        /// Byte offset in the stream where the problem was detected
        position: u64,
        /// Human-readable description of the problem
        message: String,
        /// Underlying reader error, when the XML tokenizer reported it
        #[source]
        source: Option<quick_xml::Error>,
    },

    /// A descriptor element lacks an attribute a classifier needs.
    #[error("Element <{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Name of the element that was inspected
        element: String,
        /// Name of the attribute that was expected
        attribute: String,
    },

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configured classification rule could not be compiled.
    #[error("Invalid pattern '{pattern}' for rule '{rule}': {source}")]
    InvalidPattern {
        /// Name of the rule set and position of the rule
        rule: String,
        /// The pattern text as configured
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, AuditError>`.
///
/// # Examples
///
/// ```rust
/// use osm_audit::error::Result;
///
/// fn audit_something() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, AuditError>;

impl AuditError {
    /// Creates a structural parse error without an underlying reader error.
    pub fn structural(position: u64, message: impl Into<String>) -> Self {
        Self::StructuralParse {
            position,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a structural parse error wrapping the XML reader's error.
    pub fn structural_with_source(position: u64, source: quick_xml::Error) -> Self {
        Self::StructuralParse {
            position,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a missing attribute error.
    pub fn missing_attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Returns true if this error means the input document is not well-formed.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::StructuralParse { .. })
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AuditError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| wrap(msg, e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(&f(), e.into()))
    }
}

// Io keeps its kind so callers can still match on NotFound and friends.
fn wrap(msg: &str, base: AuditError) -> AuditError {
    match base {
        AuditError::Io(inner) => {
            AuditError::Io(std::io::Error::new(inner.kind(), format!("{msg}: {inner}")))
        }
        AuditError::Internal(inner) => AuditError::Internal(format!("{msg}: {inner}")),
        AuditError::Configuration(inner) => {
            AuditError::Configuration(format!("{msg}: {inner}"))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_missing_attribute_message() {
        let err = AuditError::missing_attribute("tag", "k");
        assert_eq!(
            err.to_string(),
            "Element <tag> is missing required attribute 'k'"
        );
        assert!(!err.is_structural());
    }

    #[test]
    fn test_structural_error() {
        let err = AuditError::structural(42, "no element found");
        assert_eq!(
            err.to_string(),
            "Malformed document at byte 42: no element found"
        );
        assert!(err.is_structural());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = AuditError::InvalidPattern {
            rule: "street_rules[0]".to_string(),
            pattern: "(unclosed".to_string(),
            source,
        };
        assert!(err.to_string().contains("street_rules[0]"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_context_on_io() {
        fn failing_open() -> std::result::Result<(), std::io::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
        }

        let err = failing_open().context("Opening map.osm").unwrap_err();
        match err {
            AuditError::Io(inner) => {
                assert_eq!(inner.kind(), std::io::ErrorKind::NotFound);
                assert!(inner.to_string().contains("Opening map.osm"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_with_context_leaves_parse_errors_alone() {
        let result: Result<()> = Err(AuditError::structural(0, "junk"));
        let err = result
            .with_context(|| "Running census".to_string())
            .unwrap_err();
        assert!(err.is_structural());
    }
}
