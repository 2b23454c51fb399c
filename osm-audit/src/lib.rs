//! # osm-audit - Data-quality audit for OpenStreetMap extracts
//!
//! osm-audit streams an OpenStreetMap XML extract and reports on the quality
//! of its descriptor tags without ever loading the whole document:
//!
//! - **Tag keys** are tallied by shape: `lower`, `lower_colon`,
//!   `problemchars` or `other`.
//! - **Street names** are grouped by their trailing word, with values that
//!   have no word character filed under `abbreviation`.
//! - **Postal codes** in `ddd dd` form are filed under themselves, with
//!   everything else filed under `exclude`.
//! - **Elements** are counted by name.
//!
//! ## Quick Start
//!
//! ```rust
//! use osm_audit::prelude::*;
//! use osm_audit::sources::InMemoryDocument;
//!
//! # fn example() -> osm_audit::error::Result<()> {
//! let doc = InMemoryDocument::new(
//!     "sample",
//!     r#"<osm>
//!         <way id="1"><tag k="addr:street" v="Baker Street"/></way>
//!         <way id="2"><tag k="addr:postcode" v="10000"/></way>
//!     </osm>"#,
//! );
//!
//! let report = AuditRunner::default().run(&doc)?;
//! assert_eq!(report.key_tally.as_ref().map(|t| t.total()), Some(2));
//! assert_eq!(report.has_abbreviations, Some(false));
//! assert!(report.nonconforming_postcodes.contains("10000"));
//! println!("{}", report.to_human()?);
//! # Ok(())
//! # }
//! ```
//!
//! Single passes are available as functions over any `BufRead`:
//!
//! ```rust
//! use osm_audit::classify_streets;
//!
//! let xml = r#"<osm><node><tag k="addr:street" v="123 Elm St."/></node></osm>"#;
//! let streets = classify_streets(xml.as_bytes()).unwrap();
//! assert!(streets.contains_bucket("St"));
//! ```
//!
//! ## Rules
//!
//! Classification rules are ordered lists in [`core::AuditConfig`], evaluated
//! first-match-wins. They can be replaced from JSON without code changes.
//!
//! ## Architecture
//!
//! - **`sources`**: document sources and the streaming element walker
//! - **`core`**: configuration, rule sets, accumulators and reports
//! - **`audits`**: the audit passes and the runner that sequences them
//! - **`formatters`**: JSON, console and Markdown report output
//! - **`logging`**: `tracing` configuration helpers

pub mod audits;
pub mod core;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod sources;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;

pub use audits::{
    classify_keys, classify_postcodes, classify_streets, count_elements, AuditRunner,
};
