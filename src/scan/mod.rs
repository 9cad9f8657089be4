//! Chunked parallel file scanning
//!
//! This module ties the pieces of a scan together:
//!
//! - [`crate::chunk`] plans shuffled byte ranges
//! - [`worker`] reads and classifies one range
//! - [`engine`] runs one worker per range on a bounded pool
//! - [`aggregate`] merges the per-range results
//!
//! Two scans are provided: [`count_file`] tallies newline, null and tab
//! bytes, and [`validate_file`] fails on the first null byte.
//!
//! # Example
//!
//! ```no_run
//! use chunkscan::config::ScanConfig;
//! use chunkscan::scan;
//! use std::path::Path;
//!
//! let config = ScanConfig::default();
//! let summary = scan::count_file(Path::new("big.log"), &config)?;
//! println!("{} newlines", summary.value.newlines);
//!
//! scan::validate_file(Path::new("big.log"), &config)?;
//! # Ok::<(), chunkscan::scan::ScanError>(())
//! ```

pub mod aggregate;
pub mod classify;
pub mod counts;
pub mod engine;
pub mod error;
pub mod worker;

pub use classify::{ByteCounter, Classifier, NullValidator, Partial};
pub use counts::Counts;
pub use engine::ScanEngine;
pub use error::ScanError;
pub use worker::WorkerOptions;

use crate::chunk::ChunkPlanner;
use crate::config::ScanConfig;
use crate::util::time::{calculate_throughput, format_bytes, format_duration, format_throughput};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Result of a complete scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSummary<P> {
    /// Merged partial result ([`Counts`] or `()` for validation)
    pub value: P,
    /// File size when the scan was planned
    pub file_size: u64,
    /// Number of ranges (and workers) dispatched
    pub ranges: usize,
    /// Bytes actually read across all ranges
    pub bytes_scanned: u64,
    /// Wall time from planning to the last result
    pub elapsed: Duration,
}

impl<P> ScanSummary<P> {
    /// Scan throughput in bytes per second
    pub fn throughput(&self) -> f64 {
        calculate_throughput(self.bytes_scanned, self.elapsed)
    }
}

/// Count newline, null and tab bytes in `path`
pub fn count_file(path: &Path, config: &ScanConfig) -> Result<ScanSummary<Counts>, ScanError> {
    scan_file(path, config, &ByteCounter)
}

/// Check `path` for null bytes
///
/// # Errors
///
/// [`ScanError::NullByte`] if any null byte is present, or any IO error.
pub fn validate_file(path: &Path, config: &ScanConfig) -> Result<ScanSummary<()>, ScanError> {
    scan_file(path, config, &NullValidator)
}

/// Plan, dispatch and aggregate a scan of `path` with any classifier
pub fn scan_file<C: Classifier>(
    path: &Path,
    config: &ScanConfig,
    classifier: &C,
) -> Result<ScanSummary<C::Partial>, ScanError> {
    let started = Instant::now();

    let plan = ChunkPlanner::from_seed(config.seed).plan(path, config.batches)?;
    let file_size = plan.file_size;

    let engine = ScanEngine::new(config.threads, config.worker_options());
    let aggregate = engine.run(plan.ranges, classifier)?;

    let summary = ScanSummary {
        value: aggregate.value,
        file_size,
        ranges: aggregate.ranges,
        bytes_scanned: aggregate.bytes_scanned,
        elapsed: started.elapsed(),
    };

    if summary.bytes_scanned != file_size {
        warn!(
            file = %path.display(),
            expected = file_size,
            scanned = summary.bytes_scanned,
            "file size changed during scan"
        );
    }

    debug!(
        classifier = classifier.name(),
        file = %path.display(),
        size = %format_bytes(summary.bytes_scanned),
        ranges = summary.ranges,
        elapsed = %format_duration(summary.elapsed),
        throughput = %format_throughput(summary.throughput()),
        "scan complete"
    );

    Ok(summary)
}
