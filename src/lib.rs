//! chunkscan - parallel chunked file scanner
//!
//! chunkscan splits a file into byte ranges, scans every range on its own
//! worker and merges the results. It answers two questions about large files:
//! how many newline, tab and null bytes they contain, and whether they contain
//! any null byte at all.
//!
//! # Architecture
//!
//! - **Chunk planning**: contiguous ranges covering the file, dispatched in shuffled order
//! - **Range workers**: independent file handles, bounded read buffers, pluggable classifiers
//! - **Engine**: explicit concurrency ceiling, bounded result channel, first-error cancellation
//! - **Aggregation**: order-independent merge of per-range results

pub mod chunk;
pub mod config;
pub mod logging;
pub mod output;
pub mod scan;
pub mod util;

// Re-export commonly used types
pub use config::Config;
pub use scan::{Counts, ScanError};

/// Result type used by the configuration and CLI layers
pub type Result<T> = anyhow::Result<T>;
