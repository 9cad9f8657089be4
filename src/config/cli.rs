//! CLI argument parsing using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// chunkscan - parallel byte statistics and null-byte validation for large files
#[derive(Parser, Debug)]
#[command(name = "chunkscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging on stderr (RUST_LOG overrides)
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count the number of newline, tab and null characters in a file
    #[command(visible_alias = "lnc")]
    Count {
        #[command(flatten)]
        scan: ScanArgs,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Check for the presence of null bytes in a file
    ///
    /// Silent on success. Exits non-zero as soon as any range finds a null byte.
    #[command(visible_alias = "null")]
    Validate {
        #[command(flatten)]
        scan: ScanArgs,
    },
}

impl Command {
    /// Scan arguments shared by every subcommand
    pub fn scan_args(&self) -> &ScanArgs {
        match self {
            Command::Count { scan, .. } | Command::Validate { scan } => scan,
        }
    }
}

/// Arguments shared by `count` and `validate`
///
/// Numeric options are optional so that values from `--config` are only
/// overridden by flags actually given.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// File to scan
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of ranges scanned concurrently [default: 4]
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Number of ranges the file is split into [default: 64]
    #[arg(short = 'b', long)]
    pub batches: Option<usize>,

    /// Read buffer size per worker (e.g., 64k, 1M) [default: 1M]
    #[arg(long)]
    pub buffer_size: Option<String>,

    /// Seed for the range dispatch order (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Do not issue posix_fadvise hints
    #[arg(long)]
    pub no_fadvise: bool,

    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated table
    Text,
    /// JSON object
    Json,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
