//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//!
//! Settings are resolved in three layers: built-in defaults, then an optional
//! TOML file (`--config`), then flags given on the command line.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::scan::WorkerOptions;
use serde::{Deserialize, Serialize};

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Scan engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Concurrency ceiling: ranges scanned at the same time
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Number of byte ranges the file is split into
    #[serde(default = "default_batches")]
    pub batches: usize,
    /// Per-worker read buffer size in bytes
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Fixed seed for the dispatch-order shuffle (random when unset)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Issue posix_fadvise(SEQUENTIAL) for each range
    #[serde(default = "default_fadvise")]
    pub fadvise: bool,
}

fn default_threads() -> usize {
    crate::scan::engine::DEFAULT_THREADS
}

fn default_batches() -> usize {
    64
}

fn default_buffer_size() -> usize {
    crate::scan::worker::DEFAULT_BUFFER_SIZE
}

fn default_fadvise() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            batches: default_batches(),
            buffer_size: default_buffer_size(),
            seed: None,
            fadvise: default_fadvise(),
        }
    }
}

impl ScanConfig {
    /// Worker IO settings derived from this configuration
    pub fn worker_options(&self) -> WorkerOptions {
        WorkerOptions {
            buffer_size: self.buffer_size,
            fadvise: self.fadvise,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for count results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table
    #[default]
    Text,
    /// JSON object
    Json,
}
