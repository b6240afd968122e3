//! Batch check of hub producers against the catalogue's publishers.
//!
//! Run before an import against a new catalogue to see which statistics producers
//! would end up without a publisher.

use super::*;

/// Statistics producers listed on the ONS publication hub.
pub const ONS_PRODUCERS: [&str; 49] = [
  "Agri-Food and Biosciences Institute",
  "Agriculture and Rural Development (Northern Ireland)",
  "Business, Innovation and Skills",
  "Cabinet Office",
  "Child Maintenance and Enforcement Commission",
  "Communities and Local Government",
  "Culture, Media and Sport",
  "Defence",
  "Education",
  "Education (Northern Ireland)",
  "Employment and Learning (Northern Ireland)",
  "Energy and Climate Change",
  "Enterprise, Trade and Investment (Northern Ireland)",
  "Environment (Northern Ireland)",
  "Environment, Food and Rural Affairs",
  "Food Standards Agency",
  "Forestry Commission",
  "HM Revenue and Customs",
  "HM Treasury",
  "Health",
  "Health and Safety Executive",
  "Health and Social Care Information Centre",
  "Health Protection Agency",
  "Health, Social Service and Public Safety (Northern Ireland)",
  "Home Office",
  "ISD Scotland (part of NHS National Services Scotland)",
  "International Development",
  "Justice",
  "Justice (Northern Ireland)",
  "Marine Management Organisation",
  "National Records of Scotland",
  "National Treatment Agency",
  "Northern Ireland Statistics and Research Agency",
  "Office for National Statistics",
  "Office for Rail Regulation",
  "Office for Standards in Education, Children's Services and Skills",
  "Office of Qualifications and Examinations Regulation",
  "Office of the First and Deputy First Minister",
  "Passenger Focus",
  "Police Service of Northern Ireland (PSNI)",
  "Regional Development (Northern Ireland)",
  "Scottish Government",
  "Social Development (Northern Ireland)",
  "Transport",
  "Welsh Government",
  "Work and Pensions",
  "Civil Aviation Authority",
  "Higher Education Statistics Agency",
  "Eurostat",
];

/// Outcome of a publisher check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
  /// Names with no matching publisher
  pub errors: usize,
  /// Names checked
  pub total:  usize,
}

impl BatchReport {
  /// Whether every name resolved.
  pub fn is_clean(&self) -> bool { self.errors == 0 }
}

/// Resolves every non-blank name and counts the ones with no publisher.
///
/// Names are trimmed first; blank names are skipped and not counted. Catalogue
/// errors stop the check.
///
/// # Examples
///
/// ```
/// use onshub::{
///   batch::check_publishers,
///   catalog::{Group, InMemoryCatalog},
///   config::Config,
/// };
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = InMemoryCatalog::new().with_group(Group::new("hm-treasury", "HM Treasury"));
/// let report = check_publishers(["HM Treasury", "", "Eurostat"], &catalog, &Config::default()).await?;
/// assert_eq!((report.errors, report.total), (1, 2));
/// # Ok(())
/// # }
/// ```
pub async fn check_publishers<I, S, C>(names: I, client: &C, config: &Config) -> Result<BatchReport>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
  C: CatalogClient + ?Sized, {
  let mut report = BatchReport::default();
  for name in names {
    let name = name.as_ref().trim();
    if name.is_empty() {
      continue;
    }
    report.total += 1;
    if publisher::resolve_publisher(name, client, config).await?.is_none() {
      error!("Publisher not found: {}", name);
      report.errors += 1;
    }
  }
  info!("Completed with {} errors from {} sources", report.errors, report.total);
  Ok(report)
}

/// The distinct non-empty source agencies of a feed, in first-seen order.
///
/// Items the reader rejects are logged and skipped; XML and I/O errors are
/// returned.
pub fn source_agencies(feed: impl AsRef<Path>) -> Result<Vec<String>> {
  let feed = feed.as_ref();
  let mut seen = BTreeSet::new();
  let mut agencies = Vec::new();
  for item in FeedReader::from_path(feed)? {
    let item = match item {
      Ok(item) => item,
      Err(e) if e.is_item_error() => {
        warn!("Skipping item in {}: {}", feed.display(), e);
        continue;
      },
      Err(e) => return Err(e),
    };
    let agency = item.get(Field::SourceAgency).trim();
    if !agency.is_empty() && seen.insert(agency.to_string()) {
      agencies.push(agency.to_string());
    }
  }
  debug!("Found {} source agencies in {}", agencies.len(), feed.display());
  Ok(agencies)
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  #[test]
  fn test_producer_list() {
    assert!(ONS_PRODUCERS.iter().all(|name| !name.trim().is_empty()));
    let distinct: BTreeSet<_> = ONS_PRODUCERS.iter().collect();
    assert_eq!(distinct.len(), ONS_PRODUCERS.len());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_check_publishers_counts_misses() {
    let catalog = InMemoryCatalog::new()
      .with_group(Group::new("cabinet-office", "Cabinet Office"))
      .with_group(Group::new("home-office", "Home Office"));

    let report = check_publishers(
      ["Cabinet Office", "  ", "Home Office", "Passenger Focus", "Eurostat"],
      &catalog,
      &Config::default(),
    )
    .await
    .unwrap();

    assert_eq!(report, BatchReport { errors: 2, total: 4 });
    assert!(!report.is_clean());
    assert!(logs_contain("Publisher not found: Passenger Focus"));
    assert!(logs_contain("Completed with 2 errors from 4 sources"));
  }

  #[test]
  fn test_source_agencies_first_seen_order() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
      file,
      r#"<rss><channel>
        <item><title>A</title><hub:source-agency>Transport</hub:source-agency></item>
        <item><title>B</title><hub:source-agency>Defence</hub:source-agency></item>
        <item><title>C</title><hub:source-agency> Transport </hub:source-agency></item>
        <item><title>D</title><bogus>x</bogus></item>
        <item><title>E</title></item>
      </channel></rss>"#
    )
    .unwrap();

    let agencies = source_agencies(file.path()).unwrap();
    assert_eq!(agencies, vec!["Transport".to_string(), "Defence".to_string()]);
  }

  #[test]
  fn test_source_agencies_missing_file() {
    assert!(matches!(source_agencies("/no/such/feed.xml"), Err(OnsError::Path(_))));
  }
}
