//! Pull-based streaming traversal of an XML document.

use crate::prelude::*;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;
use std::iter::FusedIterator;

/// One element of the document, as seen at its start tag.
///
/// Children are not attached; the walker reports them separately, each with
/// the name of the element that directly encloses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written in the document
    pub name: String,
    /// Attributes in document order, with entities unescaped
    pub attributes: Vec<(String, String)>,
    /// Name of the directly enclosing element, `None` for the root
    pub container: Option<String>,
    /// Nesting depth, 0 for the root
    pub depth: usize,
}

impl Element {
    /// Creates a root-level element with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            container: None,
            depth: 0,
        }
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Places the element inside the named container, one level below it.
    pub fn within(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self.depth = 1;
        self
    }

    /// Returns the value of the first attribute named `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value of attribute `key`, or a `MissingAttribute` error.
    pub fn require_attribute(&self, key: &str) -> Result<&str> {
        self.attribute(key)
            .ok_or_else(|| AuditError::missing_attribute(&self.name, key))
    }

    /// Returns the enclosing element's name, if any.
    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    /// Returns true if the enclosing element is one of `containers`.
    pub fn is_within<S: AsRef<str>>(&self, containers: &[S]) -> bool {
        match self.container() {
            Some(parent) => containers.iter().any(|c| c.as_ref() == parent),
            None => false,
        }
    }
}

/// Lazy, forward-only sequence of the elements of one document stream.
///
/// The walker holds one reusable read buffer and the names of the currently
/// open elements, so memory use depends on nesting depth and not on document
/// size. It is not rewindable: traversing again needs a fresh stream.
///
/// The first structural problem is yielded as [`AuditError::StructuralParse`]
/// and ends the sequence.
///
/// # Examples
///
/// ```rust
/// use osm_audit::sources::ElementWalker;
///
/// let xml = r#"<osm><way id="7"><tag k="highway" v="residential"/></way></osm>"#;
/// let tags: Vec<_> = ElementWalker::new(xml.as_bytes())
///     .filter_map(|e| e.ok())
///     .filter(|e| e.name == "tag")
///     .collect();
/// assert_eq!(tags[0].container(), Some("way"));
/// assert_eq!(tags[0].attribute("k"), Some("highway"));
/// ```
pub struct ElementWalker<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    open: Vec<String>,
    seen_root: bool,
    done: bool,
    elements_read: u64,
}

impl<R: BufRead> ElementWalker<R> {
    /// Creates a walker over the given buffered stream.
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::from_reader(source),
            buf: Vec::with_capacity(1024),
            open: Vec::new(),
            seen_root: false,
            done: false,
            elements_read: 0,
        }
    }

    /// Number of elements yielded so far.
    pub fn elements_read(&self) -> u64 {
        self.elements_read
    }

    /// Byte offset of the reader in the underlying stream.
    pub fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    fn advance(&mut self) -> Result<Option<Element>> {
        loop {
            self.buf.clear();
            let position = self.reader.buffer_position() as u64;
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(err) => {
                    let at = self.reader.error_position() as u64;
                    return Err(AuditError::structural_with_source(at, err));
                }
            };

            match event {
                Event::Start(start) => {
                    check_single_root(self.seen_root, self.open.len(), position)?;
                    let element =
                        read_element(&start, self.open.last(), self.open.len(), position)?;
                    self.seen_root = true;
                    self.open.push(element.name.clone());
                    return Ok(Some(element));
                }
                Event::Empty(start) => {
                    check_single_root(self.seen_root, self.open.len(), position)?;
                    let element =
                        read_element(&start, self.open.last(), self.open.len(), position)?;
                    self.seen_root = true;
                    return Ok(Some(element));
                }
                Event::End(end) => {
                    let name = decode(end.name().as_ref(), position)?;
                    match self.open.pop() {
                        Some(open) if open == name => {}
                        Some(open) => {
                            return Err(AuditError::structural(
                                position,
                                format!("mismatched tag: expected </{open}>, found </{name}>"),
                            ));
                        }
                        None => {
                            return Err(AuditError::structural(
                                position,
                                format!("closing tag </{name}> has no matching start tag"),
                            ));
                        }
                    }
                }
                Event::Text(text) if self.open.is_empty() => {
                    if !text.iter().all(u8::is_ascii_whitespace) {
                        return Err(AuditError::structural(
                            position,
                            "text outside the document element",
                        ));
                    }
                }
                Event::CData(_) if self.open.is_empty() => {
                    return Err(AuditError::structural(
                        position,
                        "CDATA outside the document element",
                    ));
                }
                Event::Eof => {
                    if let Some(open) = self.open.last() {
                        return Err(AuditError::structural(
                            position,
                            format!("unexpected end of document: <{open}> is not closed"),
                        ));
                    }
                    if !self.seen_root {
                        return Err(AuditError::structural(position, "no element found"));
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for ElementWalker<R> {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(element)) => {
                self.elements_read += 1;
                Some(Ok(element))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for ElementWalker<R> {}

impl<R> std::fmt::Debug for ElementWalker<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementWalker")
            .field("open", &self.open)
            .field("elements_read", &self.elements_read)
            .field("done", &self.done)
            .finish()
    }
}

fn check_single_root(seen_root: bool, depth: usize, position: u64) -> Result<()> {
    if seen_root && depth == 0 {
        return Err(AuditError::structural(
            position,
            "junk after document element",
        ));
    }
    Ok(())
}

fn read_element(
    start: &BytesStart<'_>,
    container: Option<&String>,
    depth: usize,
    position: u64,
) -> Result<Element> {
    let name = decode(start.name().as_ref(), position)?;
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| AuditError::structural_with_source(position, e.into()))?;
        let key = decode(attr.key.as_ref(), position)?;
        let value = attr
            .unescape_value()
            .map_err(|e| AuditError::structural_with_source(position, e))?;
        attributes.push((key, value.into_owned()));
    }
    Ok(Element {
        name,
        attributes,
        container: container.cloned(),
        depth,
    })
}

fn decode(bytes: &[u8], position: u64) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| AuditError::structural(position, format!("invalid UTF-8 in name: {e}")))
}
