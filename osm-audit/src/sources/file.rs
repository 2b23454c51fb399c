//! File-backed document source.

use super::DocumentSource;
use crate::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// An `.osm` extract on disk.
///
/// Each call to [`DocumentSource::open`] opens a new file handle, so passes
/// never share a read cursor. The handle is closed when the reader is dropped.
#[derive(Debug, Clone)]
pub struct OsmFile {
    path: PathBuf,
    buffer_capacity: usize,
}

impl OsmFile {
    /// Creates a source for the file at `path`.
    ///
    /// The file is not opened until a pass asks for it.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    /// Sets the read buffer size used for each opened stream.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }

    /// Returns the path of the extract.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for OsmFile {
    type Reader = BufReader<File>;

    fn open(&self) -> Result<Self::Reader> {
        let file = File::open(&self.path)
            .with_context(|| format!("Opening {}", self.path.display()))?;
        Ok(BufReader::with_capacity(self.buffer_capacity, file))
    }

    fn description(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures;
    use std::io::Write;

    #[test]
    fn test_opens_independent_streams() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(test_fixtures::SMALL_EXTRACT.as_bytes()).unwrap();

        let source = OsmFile::new(file.path()).with_buffer_capacity(16);
        let first = source.walk().unwrap().count();
        let second = source.walk().unwrap().count();
        assert_eq!(first, 13);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = OsmFile::new("/definitely/not/here.osm");
        let err = source.open().unwrap_err();
        match err {
            AuditError::Io(inner) => {
                assert_eq!(inner.kind(), std::io::ErrorKind::NotFound);
                assert!(inner.to_string().contains("here.osm"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_description_is_path() {
        let source = OsmFile::new("maps/sample.osm");
        assert_eq!(source.description(), "maps/sample.osm");
        assert_eq!(source.path(), Path::new("maps/sample.osm"));
    }
}
