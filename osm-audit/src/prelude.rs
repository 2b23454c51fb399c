//! Prelude for commonly used types and traits in osm-audit.

pub use crate::audits::{Audit, AuditRunner};
pub use crate::core::{AuditConfig, AuditReport, KeyCategory};
pub use crate::error::{AuditError, ErrorContext, Result};
pub use crate::formatters::{FormatterConfig, ReportFormatter};
pub use crate::logging::LogConfig;
pub use crate::sources::{DocumentSource, Element, ElementWalker};
