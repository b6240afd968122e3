//! Module for the "import" command, turning hub feeds into CKAN records.

use super::*;

/// Arguments that can be used for the [`Commands::Import`]
#[derive(Args, Clone)]
pub struct ImportArgs {
  /// Feed files or glob patterns, e.g. "feeds/ons_data_*.xml"
  #[arg(required = true)]
  pub feeds: Vec<String>,

  /// Catalogue API base URL used to resolve publishers. Without one, records get
  /// no publisher.
  #[arg(long)]
  pub catalog: Option<String>,

  /// Write records to this file instead of stdout
  #[arg(long, short)]
  pub output: Option<PathBuf>,

  /// Also write logs to `onshub.log` in this directory
  #[arg(long)]
  pub log_dir: Option<PathBuf>,
}

/// Function for the [`Commands::Import`] in the CLI.
///
/// Fails the process when any item could not be imported.
pub async fn import(cli: &Cli, args: &ImportArgs) -> Result<ExitCode> {
  let config = cli.load_config()?;
  let paths = expand_feeds(&args.feeds)?;

  let mut out: Box<dyn Write> = match &args.output {
    Some(path) => Box::new(BufWriter::new(File::create(path)?)),
    None => Box::new(BufWriter::new(io::stdout().lock())),
  };

  let summaries = match args.catalog.clone().or_else(|| config.catalog_url.clone()) {
    Some(url) => {
      let client = ckan_client(&url, &config)?;
      import_feeds(&OnsImporter::new(client, config), &paths, &mut out).await?
    },
    None => {
      eprintln!(
        "{} No catalogue given, records will have no publisher",
        style(INFO_PREFIX).cyan()
      );
      import_feeds(&OnsImporter::new(InMemoryCatalog::new(), config), &paths, &mut out).await?
    },
  };
  out.flush()?;

  let mut failed = 0;
  for summary in &summaries {
    let prefix = if summary.failed == 0 {
      style(SUCCESS_PREFIX).green()
    } else {
      style(WARNING_PREFIX).yellow()
    };
    eprintln!(
      "{} {}: {} of {} items imported, {} failed",
      prefix,
      style(&summary.file).yellow(),
      summary.imported,
      summary.items,
      summary.failed
    );
    failed += summary.failed;
  }

  Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Imports each feed in turn, writing every record as a JSON line.
async fn import_feeds<C: CatalogClient>(
  importer: &OnsImporter<C>,
  paths: &[PathBuf],
  out: &mut dyn Write,
) -> Result<Vec<ImportSummary>> {
  let mut summaries = Vec::with_capacity(paths.len());
  for path in paths {
    let summary = importer
      .import_file(path, |record| {
        match record {
          Ok(record) => {
            serde_json::to_writer(&mut *out, &record)?;
            writeln!(out)?;
          },
          Err(e) => eprintln!("{} {}: {}", style(ERROR_PREFIX).red(), path.display(), e),
        }
        Ok(())
      })
      .await?;
    summaries.push(summary);
  }
  Ok(summaries)
}

/// Expands glob patterns into feed paths, in pattern order.
///
/// A pattern matching nothing is kept as a literal path so that a missing feed is
/// reported when it is opened.
fn expand_feeds(patterns: &[String]) -> Result<Vec<PathBuf>> {
  let mut paths = Vec::new();
  for pattern in patterns {
    let matched: Vec<PathBuf> = glob::glob(pattern)?.flatten().collect();
    if matched.is_empty() {
      paths.push(PathBuf::from(pattern));
    } else {
      paths.extend(matched);
    }
  }
  debug!("Feeds to import: {:?}", paths);
  Ok(paths)
}
