//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

/// Wraps descriptor markup in an `<osm>` root.
pub fn osm(body: &str) -> String {
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<osm version=\"0.6\">\n{body}\n</osm>\n")
}

/// A `<tag>` element.
pub fn tag(key: &str, value: &str) -> String {
    format!(r#"<tag k="{}" v="{}"/>"#, escape(key), escape(value))
}

/// A node holding the given tags.
pub fn node(id: u64, tags: &[String]) -> String {
    format!(r#"<node id="{id}" lat="0" lon="0">{}</node>"#, tags.concat())
}

/// A way holding the given tags.
pub fn way(id: u64, tags: &[String]) -> String {
    format!(r#"<way id="{id}"><nd ref="1"/>{}</way>"#, tags.concat())
}

/// A relation holding the given tags.
pub fn relation(id: u64, tags: &[String]) -> String {
    format!(r#"<relation id="{id}">{}</relation>"#, tags.concat())
}

/// Escapes text for use inside a double-quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
    out
}

/// Writes `content` to a temporary `.osm` file.
pub fn write_extract(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".osm")
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write extract");
    file.flush().expect("flush extract");
    file
}
