//! In-memory document source.

use super::DocumentSource;
use crate::prelude::*;
use std::io::Cursor;
use std::sync::Arc;

/// A document held in memory, mostly useful for tests and small inputs.
///
/// Opening is a reference-count bump; the bytes are shared by every stream.
#[derive(Debug, Clone)]
pub struct InMemoryDocument {
    name: String,
    bytes: Arc<[u8]>,
}

impl InMemoryDocument {
    /// Creates a document named `name` from the given content.
    pub fn new(name: impl Into<String>, content: impl AsRef<[u8]>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::from(content.as_ref()),
        }
    }

    /// Size of the document in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the document has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl DocumentSource for InMemoryDocument {
    type Reader = Cursor<Arc<[u8]>>;

    fn open(&self) -> Result<Self::Reader> {
        Ok(Cursor::new(Arc::clone(&self.bytes)))
    }

    fn description(&self) -> String {
        format!("{} ({} bytes in memory)", self.name, self.bytes.len())
    }
}
