//! Subcommands of the `onshub` binary.

use super::*;

pub mod filter;
pub mod import;
pub mod publishers;

pub use filter::{filter_national_statistics, FilterArgs};
pub use import::{import, ImportArgs};
pub use publishers::{publishers, PublishersArgs};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Import hub feeds, writing one CKAN record per line as JSON
  Import(ImportArgs),

  /// Check that source agencies resolve to catalogue publishers
  Publishers(PublishersArgs),

  /// Clear the national statistic flag on records not imported from the hub
  FilterNationalStatistics(FilterArgs),
}

/// Client for the catalogue at `url`, authenticated with the configured API key.
fn ckan_client(url: &str, config: &Config) -> Result<CkanClient> {
  let client = CkanClient::new(url)?;
  debug!("Using catalogue at {}", client.base_url());
  Ok(match &config.api_key {
    Some(api_key) => client.with_api_key(api_key.clone()),
    None => client,
  })
}
