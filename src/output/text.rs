//! Human-readable text output

use crate::scan::Counts;
use std::io::{self, Write};

/// Header line of the counts table
pub const HEADER: &str = "Newlines\tNulls\tTabs";

/// Write the two-line tab-separated counts table
///
/// ```
/// use chunkscan::output::text::write_counts;
/// use chunkscan::scan::Counts;
///
/// let mut out = Vec::new();
/// write_counts(&mut out, &Counts::new(1, 0, 1)).unwrap();
/// assert_eq!(out, b"Newlines\tNulls\tTabs\n1\t0\t1\n");
/// ```
pub fn write_counts<W: Write>(out: &mut W, counts: &Counts) -> io::Result<()> {
    writeln!(out, "{}", HEADER)?;
    writeln!(out, "{}\t{}\t{}", counts.newlines, counts.nulls, counts.tabs)?;
    out.flush()
}
