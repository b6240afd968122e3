//! Module for the "publishers" command, a QA check of publisher resolution.

use super::*;

/// Arguments that can be used for the [`Commands::Publishers`]
#[derive(Args, Clone)]
pub struct PublishersArgs {
  /// Catalogue API base URL, e.g. http://data.gov.uk/api
  pub url: String,

  /// Check the source agencies found in this feed instead of the built-in list of
  /// ONS producers. May be repeated.
  #[arg(long)]
  pub feed: Vec<PathBuf>,
}

/// Function for the [`Commands::Publishers`] in the CLI.
pub async fn publishers(cli: &Cli, args: &PublishersArgs) -> Result<ExitCode> {
  let config = cli.load_config()?;
  let client = ckan_client(&args.url, &config)?;

  let names: Vec<String> = if args.feed.is_empty() {
    batch::ONS_PRODUCERS.iter().map(|name| name.to_string()).collect()
  } else {
    let mut names: Vec<String> = Vec::new();
    for feed in &args.feed {
      for agency in batch::source_agencies(feed)? {
        if !names.contains(&agency) {
          names.push(agency);
        }
      }
    }
    names
  };

  println!(
    "{} Checking {} sources against {}",
    style(INFO_PREFIX).cyan(),
    names.len(),
    style(client.base_url()).yellow()
  );
  let report = batch::check_publishers(&names, &client, &config).await?;

  if report.is_clean() {
    println!("{} All {} sources have a publisher", style(SUCCESS_PREFIX).green(), report.total);
  } else {
    println!(
      "{} Completed with {} errors from {} sources",
      style(WARNING_PREFIX).yellow(),
      report.errors,
      report.total
    );
  }
  Ok(ExitCode::SUCCESS)
}
