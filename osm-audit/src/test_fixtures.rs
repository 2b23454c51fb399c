//! Sample OpenStreetMap documents for tests and benchmarks.
//!
//! The constants are small, hand-written extracts whose audit results are
//! known; [`generate_extract`] builds larger synthetic documents.

use std::fmt::Write;

/// A complete extract with one node, one way and one relation.
///
/// Walks as 13 elements: `osm, bounds, node, tag, tag, way, nd, nd, tag, tag,
/// relation, member, tag`. Keys: 3 `lower`, 2 `lower_colon`.
pub const SMALL_EXTRACT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="osm-audit fixtures">
  <bounds minlat="59.3000" minlon="18.0000" maxlat="59.3500" maxlon="18.1000"/>
  <node id="1" lat="59.3293" lon="18.0686">
    <tag k="amenity" v="cafe"/>
    <tag k="addr:street" v="Baker Street"/>
  </node>
  <way id="10">
    <nd ref="1"/>
    <nd ref="2"/>
    <tag k="highway" v="residential"/>
    <tag k="addr:postcode" v="100 00"/>
  </way>
  <relation id="100">
    <member type="way" ref="10" role="outer"/>
    <tag k="type" v="multipolygon"/>
  </relation>
</osm>
"#;

/// Two ways with street names and no abbreviations.
pub const STREET_WAYS: &str = r#"<osm>
  <way id="1"><tag k="addr:street" v="Baker Street"/></way>
  <way id="2"><tag k="addr:street" v="5th Ave"/></way>
</osm>
"#;

/// Street values exercising every default street rule, plus one value in a
/// relation that the street pass must ignore.
pub const MIXED_STREETS: &str = r#"<osm>
  <node id="1"><tag k="addr:street" v="Main Street"/></node>
  <node id="2"><tag k="addr:street" v="123 Elm St."/></node>
  <node id="3"><tag k="addr:street" v="Οδός Ερμού"/></node>
  <node id="4"><tag k="addr:street" v="---"/></node>
  <node id="5"><tag k="addr:street" v=""/></node>
  <way id="6"><tag k="name" v="Not A Street"/></way>
  <relation id="7"><tag k="addr:street" v="Relation Road"/></relation>
</osm>
"#;

/// One conforming and one non-conforming postal code.
pub const POSTCODES: &str = r#"<osm>
  <node id="1"><tag k="addr:postcode" v="100 00"/></node>
  <way id="2"><tag k="addr:postcode" v="10000"/></way>
</osm>
"#;

/// One key of each category.
pub const KEY_SHAPES: &str = r#"<osm>
  <node id="1">
    <tag k="amenity" v="x"/>
    <tag k="addr:street" v="x"/>
    <tag k="name;alt" v="x"/>
    <tag k="CamelCase" v="x"/>
  </node>
</osm>
"#;

/// A descriptor with no key attribute.
pub const MISSING_KEY: &str = r#"<osm>
  <node id="1"><tag k="amenity" v="cafe"/></node>
  <node id="2"><tag v="orphan"/></node>
</osm>
"#;

/// Well-formed until the second node, which is never closed properly.
pub const MALFORMED: &str = r#"<osm>
  <node id="1"><tag k="amenity" v="cafe"/></node>
  <node id="2"><tag k="addr:street" v="Baker Street"/></way>
</osm>
"#;

const STREETS: [&str; 6] = [
    "Baker Street",
    "5th Ave",
    "123 Elm St.",
    "Storgatan",
    "Kungsgatan 4",
    "Drottninggatan",
];

const POSTAL_CODES: [&str; 4] = ["100 00", "114 55", "11455", "SE-113"];

const KEYS: [&str; 6] = [
    "amenity",
    "highway",
    "name:en",
    "addr:housenumber",
    "fixme;note",
    "Source",
];

/// Generates a well-formed extract with `nodes` nodes and one way per ten
/// nodes, cycling through a fixed palette of keys, streets and postal codes.
pub fn generate_extract(nodes: usize) -> String {
    let mut doc = String::with_capacity(nodes * 200 + 128);
    doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<osm version=\"0.6\">\n");

    for i in 0..nodes {
        let _ = writeln!(
            doc,
            r#"  <node id="{i}" lat="59.{:04}" lon="18.{:04}">"#,
            i % 10_000,
            (i * 7) % 10_000
        );
        let _ = writeln!(
            doc,
            r#"    <tag k="{}" v="value {i}"/>"#,
            KEYS[i % KEYS.len()]
        );
        let _ = writeln!(
            doc,
            r#"    <tag k="addr:street" v="{}"/>"#,
            STREETS[i % STREETS.len()]
        );
        let _ = writeln!(
            doc,
            r#"    <tag k="addr:postcode" v="{}"/>"#,
            POSTAL_CODES[i % POSTAL_CODES.len()]
        );
        doc.push_str("  </node>\n");

        if i % 10 == 9 {
            let _ = writeln!(doc, r#"  <way id="{}">"#, 1_000_000 + i);
            for r in (i - 9)..=i {
                let _ = writeln!(doc, r#"    <nd ref="{r}"/>"#);
            }
            doc.push_str("    <tag k=\"highway\" v=\"residential\"/>\n  </way>\n");
        }
    }

    doc.push_str("</osm>\n");
    doc
}
