//! OSM audit CLI
//!
//! Audits one OpenStreetMap XML extract and prints the report. Verbosity is
//! controlled with `RUST_LOG`.

use anyhow::{Context, Result};
use clap::Parser;
use osm_audit::audits::AuditRunner;
use osm_audit::logging::setup::{init_logging, LoggingConfig};
use osm_audit::sources::OsmFile;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// OpenStreetMap XML extract to audit
    path: PathBuf,
}

fn audit(path: &Path) -> Result<String> {
    let source = OsmFile::new(path);
    let report = AuditRunner::default()
        .run(&source)
        .with_context(|| format!("auditing {}", path.display()))?;
    debug!(issues = report.has_issues(), "Rendering report");
    Ok(report.to_human()?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig::default()).map_err(|e| anyhow::anyhow!("{e}"))?;

    let output = audit(&args.path)?;
    print!("{output}");
    Ok(())
}
