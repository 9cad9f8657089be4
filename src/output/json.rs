//! JSON output

use crate::scan::{Counts, ScanSummary};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// JSON document for a count run
#[derive(Debug, Serialize)]
pub struct CountReport {
    pub file: String,
    pub newlines: u64,
    pub nulls: u64,
    pub tabs: u64,
    pub file_size: u64,
    pub bytes_scanned: u64,
    pub ranges: usize,
    pub elapsed_secs: f64,
}

impl CountReport {
    pub fn new(path: &Path, summary: &ScanSummary<Counts>) -> Self {
        Self {
            file: path.display().to_string(),
            newlines: summary.value.newlines,
            nulls: summary.value.nulls,
            tabs: summary.value.tabs,
            file_size: summary.file_size,
            bytes_scanned: summary.bytes_scanned,
            ranges: summary.ranges,
            elapsed_secs: summary.elapsed.as_secs_f64(),
        }
    }
}

/// Write a count summary as pretty-printed JSON followed by a newline
pub fn write_counts<W: Write>(
    out: &mut W,
    path: &Path,
    summary: &ScanSummary<Counts>,
) -> anyhow::Result<()> {
    let report = CountReport::new(path, summary);
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
