//! Clears the national statistic flag from records that did not come from the hub.
//!
//! Only the ONS hub designates National Statistics, so a flagged record whose
//! `import_source` does not start with `ONS` was flagged by mistake.

use super::*;

/// Query matching every flagged record.
const FLAGGED_QUERY: &str = "national_statistic:yes";

/// Records fetched per search request.
pub const PAGE_SIZE: usize = 100;

/// Outcome of a filter run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
  /// Flagged records inspected
  pub checked: usize,
  /// Records whose flag was (or in a dry run, would be) cleared
  pub demoted: usize,
}

/// Resets `national_statistic` to "no" on flagged records not imported from the hub.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use onshub::{
///   catalog::{InMemoryCatalog, Package},
///   filter::NationalStatisticFilter,
/// };
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let extras = BTreeMap::from([("national_statistic".to_string(), "yes".to_string())]);
/// let catalog = InMemoryCatalog::new().with_package(Package::new("spend-over-500", extras));
///
/// let summary = NationalStatisticFilter::new(&catalog).run().await?;
/// assert_eq!(summary.demoted, 1);
/// assert_eq!(catalog.package("spend-over-500").unwrap().extra("national_statistic"), "no");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NationalStatisticFilter<C> {
  client:        C,
  dry_run:       bool,
  source_prefix: String,
}

impl<C: CatalogClient> NationalStatisticFilter<C> {
  /// Creates a filter that writes its changes through `client`.
  pub fn new(client: C) -> Self {
    Self { client, dry_run: false, source_prefix: Config::default().import_source_prefix }
  }

  /// Only reports what would change, without writing.
  pub fn dry_run(mut self, dry_run: bool) -> Self {
    self.dry_run = dry_run;
    self
  }

  /// Sets the `import_source` prefix that marks hub records.
  pub fn source_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.source_prefix = prefix.into();
    self
  }

  /// Checks every flagged record and demotes the stray ones.
  ///
  /// All flagged records are fetched before any is updated, since demoting a
  /// record removes it from the search being paged through.
  pub async fn run(&self) -> Result<FilterSummary> {
    let flagged = self.flagged().await?;
    let mut summary = FilterSummary { checked: flagged.len(), demoted: 0 };

    for mut package in flagged {
      if !needs_demotion(&package, &self.source_prefix) {
        debug!("Keeping national statistic flag on {}", package.name);
        continue;
      }
      summary.demoted += 1;
      if self.dry_run {
        info!("Would demote {} (import source {:?})", package.name, package.extra("import_source"));
        continue;
      }
      info!("Demoting {} (import source {:?})", package.name, package.extra("import_source"));
      package.extras.insert("national_statistic".to_string(), "no".to_string());
      self.client.package_update(&package).await?;
    }

    info!(
      "Checked {} national statistics, {} {}",
      summary.checked,
      summary.demoted,
      if self.dry_run { "to demote" } else { "demoted" }
    );
    Ok(summary)
  }

  /// Pages through every flagged record.
  async fn flagged(&self) -> Result<Vec<Package>> {
    let mut packages = Vec::new();
    loop {
      let page = self.client.package_search(FLAGGED_QUERY, PAGE_SIZE, packages.len()).await?;
      trace!("Fetched {} of {} flagged records", page.results.len(), page.count);
      let fetched = page.results.len();
      packages.extend(page.results);
      if fetched == 0 || packages.len() >= page.count {
        break;
      }
    }
    Ok(packages)
  }
}

/// Whether a flagged record should lose its national statistic flag.
pub fn needs_demotion(package: &Package, source_prefix: &str) -> bool {
  package.extra("national_statistic") == "yes"
    && !package.extra("import_source").starts_with(source_prefix)
}
