//! ONS sources test tool.
//!
//! Checks that every ONS statistics producer can be translated into a publisher
//! of the catalogue at the given API URL. Run it against data.gov.uk or a test
//! CKAN server:
//!
//! ```bash
//! ons-test-publishers http://data.gov.uk/api
//! ```
//!
//! Asking for help, or passing no URL or more than one argument, prints usage and
//! exits with status 1.

use std::process::ExitCode;

use clap::Parser;
use onshub::{batch, catalog::CkanClient, config::Config};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// ONS sources test tool
#[derive(Parser)]
#[command(
  about = "ONS sources test tool",
  long_about = "Test tool to check that the ONS sources can be translated into actual publishers. \
                Run it against data.gov.uk or a test CKAN server.",
  after_help = "e.g. ons-test-publishers http://data.gov.uk/api"
)]
struct Args {
  /// CKAN API base URL
  #[arg(value_name = "CKAN_API_URL")]
  ckan_api_url: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  let args = match Args::try_parse() {
    Ok(args) => args,
    Err(e) => {
      // --help and -h exit with 1 as well
      let _ = e.print();
      return ExitCode::FAILURE;
    },
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

  let config = match Config::load(None) {
    Ok(config) => config,
    Err(e) => {
      error!("Could not load configuration: {}", e);
      return ExitCode::FAILURE;
    },
  };

  let client = match CkanClient::new(&args.ckan_api_url) {
    Ok(client) => client,
    Err(e) => {
      error!("Invalid CKAN API URL {:?}: {}", args.ckan_api_url, e);
      return ExitCode::FAILURE;
    },
  };

  match batch::check_publishers(batch::ONS_PRODUCERS, &client, &config).await {
    Ok(_) => ExitCode::SUCCESS,
    Err(e) => {
      error!("Publisher check failed: {}", e);
      ExitCode::FAILURE
    },
  }
}
