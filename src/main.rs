//! chunkscan CLI entry point

use anyhow::{Context, Result};
use chunkscan::config::cli::{Cli, Command, OutputFormat as CliOutputFormat, ScanArgs};
use chunkscan::config::{cli_convert, validator, Config, OutputFormat};
use chunkscan::{logging, output, scan};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init(cli.debug);

    match cli.command {
        Command::Count { scan: args, format } => run_count(&args, format),
        Command::Validate { scan: args } => run_validate(&args),
    }
}

/// Build and validate the configuration for one subcommand
fn load_config(args: &ScanArgs, format: Option<CliOutputFormat>) -> Result<Config> {
    let config = cli_convert::build_config(args, format)?;
    validator::validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

/// Count newline, null and tab bytes and print the table
fn run_count(args: &ScanArgs, format: Option<CliOutputFormat>) -> Result<()> {
    let config = load_config(args, format)?;
    let summary = scan::count_file(&args.file, &config.scan)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match config.output.format {
        OutputFormat::Text => output::text::write_counts(&mut out, &summary.value)?,
        OutputFormat::Json => output::json::write_counts(&mut out, &args.file, &summary)?,
    }

    Ok(())
}

/// Fail if the file contains a null byte; print nothing otherwise
fn run_validate(args: &ScanArgs) -> Result<()> {
    let config = load_config(args, None)?;
    scan::validate_file(&args.file, &config.scan)?;
    Ok(())
}
