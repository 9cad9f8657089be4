//! TOML configuration file parsing
//!
//! ```toml
//! [scan]
//! threads = 8
//! batches = 256
//! buffer_size = 262144
//! seed = 42
//! fadvise = false
//!
//! [output]
//! format = "json"
//! ```

use super::cli::{OutputFormat as CliOutputFormat, ScanArgs};
use super::cli_convert::{convert_output_format, parse_size};
use super::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(
    args: &ScanArgs,
    format: Option<CliOutputFormat>,
    mut config: Config,
) -> Result<Config> {
    if let Some(threads) = args.threads {
        config.scan.threads = threads;
    }
    if let Some(batches) = args.batches {
        config.scan.batches = batches;
    }
    if let Some(ref size) = args.buffer_size {
        let bytes = parse_size(size).context("Invalid buffer size")?;
        config.scan.buffer_size = usize::try_from(bytes)
            .with_context(|| format!("Buffer size too large: {}", size))?;
    }
    if args.seed.is_some() {
        config.scan.seed = args.seed;
    }
    if args.no_fadvise {
        config.scan.fadvise = false;
    }
    if let Some(format) = format {
        config.output.format = convert_output_format(format);
    }

    Ok(config)
}
