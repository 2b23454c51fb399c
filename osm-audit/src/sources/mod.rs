//! Document sources for the audit passes.
//!
//! Every audit pass consumes its own stream: a [`DocumentSource`] hands out a
//! fresh reader each time [`DocumentSource::open`] is called, and the
//! [`ElementWalker`] turns that reader into a lazy sequence of elements.
//! Readers are owned by the pass that opened them and are closed when the
//! pass returns, whether it succeeded or not.

use crate::prelude::*;
use std::fmt::Debug;
use std::io::BufRead;

mod file;
mod memory;
mod walker;

pub use file::OsmFile;
pub use memory::InMemoryDocument;
pub use walker::{Element, ElementWalker};

/// A document that can be opened any number of times for reading.
///
/// # Examples
///
/// ```rust
/// use osm_audit::sources::{DocumentSource, InMemoryDocument};
///
/// # fn example() -> osm_audit::error::Result<()> {
/// let doc = InMemoryDocument::new("inline", r#"<osm><node id="1"/></osm>"#);
/// let names: Vec<String> = doc
///     .walk()?
///     .map(|element| element.map(|e| e.name))
///     .collect::<Result<_, _>>()?;
/// assert_eq!(names, vec!["osm", "node"]);
/// # Ok(())
/// # }
/// ```
pub trait DocumentSource: Debug {
    /// The buffered reader handed out for one traversal.
    type Reader: BufRead;

    /// Opens a new, independent stream positioned at the start of the document.
    fn open(&self) -> Result<Self::Reader>;

    /// Returns a human-readable description of this source.
    fn description(&self) -> String;

    /// Opens a new stream and wraps it in an [`ElementWalker`].
    fn walk(&self) -> Result<ElementWalker<Self::Reader>> {
        Ok(ElementWalker::new(self.open()?))
    }
}
