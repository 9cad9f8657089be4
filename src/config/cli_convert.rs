//! Convert CLI arguments to configuration structures

use super::cli::{OutputFormat as CliOutputFormat, ScanArgs};
use super::{toml, Config, OutputFormat};
use anyhow::{Context, Result};

/// Parse a size string (e.g., "4k", "1M", "1G") to bytes
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if s.ends_with("kb") || s.ends_with('k') {
        (s.trim_end_matches("kb").trim_end_matches('k'), 1024u64)
    } else if s.ends_with("mb") || s.ends_with('m') {
        (s.trim_end_matches("mb").trim_end_matches('m'), 1024 * 1024)
    } else if s.ends_with("gb") || s.ends_with('g') {
        (s.trim_end_matches("gb").trim_end_matches('g'), 1024 * 1024 * 1024)
    } else {
        (s.trim_end_matches('b'), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid size format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Size out of range: {}", s))
}

/// Convert the CLI output format to the configuration type
pub fn convert_output_format(format: CliOutputFormat) -> OutputFormat {
    match format {
        CliOutputFormat::Text => OutputFormat::Text,
        CliOutputFormat::Json => OutputFormat::Json,
    }
}

/// Build the run configuration for a subcommand
///
/// Loads `--config` if given (defaults otherwise) and applies the flags on
/// top of it.
pub fn build_config(args: &ScanArgs, format: Option<CliOutputFormat>) -> Result<Config> {
    let base = match &args.config {
        Some(path) => toml::parse_toml_file(path)?,
        None => Config::default(),
    };

    toml::merge_cli_with_config(args, format, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> ScanArgs {
        ScanArgs {
            file: PathBuf::from("input.txt"),
            threads: None,
            batches: None,
            buffer_size: None,
            seed: None,
            no_fadvise: false,
            config: None,
        }
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert_eq!(parse_size("4k").unwrap(), 4096);
        assert_eq!(parse_size("4KB").unwrap(), 4096);
        assert_eq!(parse_size("1M").unwrap(), 1024 * 1024);
        assert_eq!(parse_size(" 2mb ").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_size("1g").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("512b").unwrap(), 512);
    }

    #[test]
    fn test_parse_size_invalid() {
        assert!(parse_size("").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("-1k").is_err());
        assert!(parse_size("99999999999999999999g").is_err());
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&args(), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_build_config_flags() {
        let mut a = args();
        a.threads = Some(12);
        a.batches = Some(256);
        a.buffer_size = Some("64k".to_string());
        a.seed = Some(99);
        a.no_fadvise = true;

        let config = build_config(&a, Some(CliOutputFormat::Json)).unwrap();
        assert_eq!(config.scan.threads, 12);
        assert_eq!(config.scan.batches, 256);
        assert_eq!(config.scan.buffer_size, 65536);
        assert_eq!(config.scan.seed, Some(99));
        assert!(!config.scan.fadvise);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_build_config_missing_file() {
        let mut a = args();
        a.config = Some(PathBuf::from("/nonexistent/chunkscan.toml"));
        assert!(build_config(&a, None).is_err());
    }
}
