//! Command line tools for the ONS hub importer.
//!
//! The `onshub` binary wraps the [`onshub`] library:
//! - Importing hub feeds into CKAN records, written as JSON lines
//! - Checking source agencies against the catalogue's publishers
//! - Clearing stray national statistic flags in the catalogue
//!
//! # Usage
//!
//! ```bash
//! # Import feeds offline, writing records to a file
//! onshub import "feeds/ons_data_*.xml" --output records.jsonl
//!
//! # Resolve publishers against a live catalogue
//! onshub import feeds/ons_data_7_days_to_2011-05-10.xml --catalog http://data.gov.uk/api
//!
//! # Check which producers have no publisher
//! onshub publishers http://data.gov.uk/api --feed feeds/ons_data_7_days_to_2011-05-10.xml
//!
//! # See which records would lose their national statistic flag
//! onshub filter-national-statistics http://data.gov.uk/api --dry-run
//! ```
//!
//! Logging goes to stderr. Use `-v` (repeatable) for more detail or set `RUST_LOG`.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  fs::File,
  io::{self, BufWriter, Write},
  path::{Path, PathBuf},
  process::ExitCode,
};

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use onshub::{
  batch,
  catalog::{CkanClient, InMemoryCatalog},
  config::Config,
  filter::NationalStatisticFilter,
  importer::{ImportSummary, OnsImporter},
  prelude::*,
};
use tracing::{debug, trace};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod commands;
pub mod error;

use crate::{commands::*, error::*};

/// Prefix for information messages
static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for warning messages
static WARNING_PREFIX: &str = "⚠️ ";
/// Prefix for error messages
static ERROR_PREFIX: &str = "✗ ";

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Import ONS publication hub feeds into CKAN")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Configuration file. Defaults to `onshub/config.toml` in the platform config directory.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// API key for catalogue writes, overriding the configured one
  #[arg(long, global = true)]
  api_key: Option<String>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,
}

impl Cli {
  /// Loads the configuration, applying command line overrides.
  fn load_config(&self) -> Result<Config> {
    let mut config = Config::load(self.config.as_deref())?;
    if let Some(api_key) = &self.api_key {
      config = config.with_api_key(api_key.clone());
    }
    trace!("Default catalogue from configuration: {:?}", config.catalog_url);
    Ok(config)
  }
}

/// Configures logging to stderr and, when `log_dir` is given, to `onshub.log` there.
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
///
/// The returned guard flushes the log file when dropped.
fn setup_logging(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  let stderr_layer = fmt::layer()
    .with_writer(io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true);

  let (file_layer, guard) = match log_dir {
    Some(dir) => {
      let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, "onshub.log"));
      (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
    },
    None => (None, None),
  };

  tracing_subscriber::registry().with(filter).with(stderr_layer).with(file_layer).init();
  guard
}

/// Entry point for the onshub CLI
///
/// Parses arguments, sets up logging and runs the requested command. Errors are
/// printed to stderr and turn into a failing exit code, as does an import in
/// which any item failed.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  let cli = Cli::parse();

  let log_dir = match &cli.command {
    Commands::Import(args) => args.log_dir.clone(),
    _ => None,
  };
  let _guard = setup_logging(cli.verbose, log_dir.as_deref());

  let result = match &cli.command {
    Commands::Import(args) => import(&cli, args).await,
    Commands::Publishers(args) => publishers(&cli, args).await,
    Commands::FilterNationalStatistics(args) => filter_national_statistics(&cli, args).await,
  };

  match result {
    Ok(code) => code,
    Err(e) => {
      eprintln!("{} {}", style(ERROR_PREFIX).red(), e);
      ExitCode::FAILURE
    },
  }
}
