//! Configuration validation

use super::*;
use anyhow::Result;
use tracing::debug;

/// Smallest accepted read buffer
pub const MIN_BUFFER_SIZE: usize = 4 * 1024;

/// Largest accepted read buffer
pub const MAX_BUFFER_SIZE: usize = 1024 * 1024 * 1024;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_scan(&config.scan)?;
    Ok(())
}

/// Validate scan configuration
pub fn validate_scan(scan: &ScanConfig) -> Result<()> {
    if scan.threads == 0 {
        anyhow::bail!("threads must be at least 1");
    }

    if scan.batches == 0 {
        anyhow::bail!("batches must be at least 1");
    }

    if scan.buffer_size < MIN_BUFFER_SIZE || scan.buffer_size > MAX_BUFFER_SIZE {
        anyhow::bail!(
            "buffer_size must be between {} and {} bytes, got {}",
            MIN_BUFFER_SIZE,
            MAX_BUFFER_SIZE,
            scan.buffer_size
        );
    }

    let cpus = num_cpus::get();
    if scan.threads > cpus {
        debug!(
            threads = scan.threads,
            cpus,
            "threads exceeds available CPUs"
        );
    }

    if scan.threads > scan.batches {
        debug!(
            threads = scan.threads,
            batches = scan.batches,
            "more threads than batches; extra threads will idle"
        );
    }

    Ok(())
}
