//! Module for the "filter-national-statistics" command.

use super::*;

/// Arguments that can be used for the [`Commands::FilterNationalStatistics`]
#[derive(Args, Clone)]
pub struct FilterArgs {
  /// Catalogue API base URL, e.g. http://data.gov.uk/api
  pub url: String,

  /// Report the records that would change without writing anything
  #[arg(long)]
  pub dry_run: bool,

  /// Skip the confirmation prompt
  #[arg(long, short)]
  pub yes: bool,
}

/// Function for the [`Commands::FilterNationalStatistics`] in the CLI.
pub async fn filter_national_statistics(cli: &Cli, args: &FilterArgs) -> Result<ExitCode> {
  let config = cli.load_config()?;
  let client = ckan_client(&args.url, &config)?;

  if !args.dry_run
    && !args.yes
    && !dialoguer::Confirm::new()
      .with_prompt(format!(
        "Clear the national statistic flag on records in {} not imported from the hub?",
        client.base_url()
      ))
      .default(false)
      .interact()?
  {
    println!("{} Operation cancelled", style("✖").red());
    return Ok(ExitCode::SUCCESS);
  }

  let summary = NationalStatisticFilter::new(client)
    .dry_run(args.dry_run)
    .source_prefix(config.import_source_prefix.clone())
    .run()
    .await?;

  if args.dry_run {
    println!(
      "{} {} of {} national statistics would be demoted",
      style(INFO_PREFIX).cyan(),
      summary.demoted,
      summary.checked
    );
  } else {
    println!(
      "{} Demoted {} of {} national statistics",
      style(SUCCESS_PREFIX).green(),
      summary.demoted,
      summary.checked
    );
  }
  Ok(ExitCode::SUCCESS)
}
