//! Feed item to catalogue record transformation.
//!
//! [`OnsImporter`] turns each [`RawItem`] into a [`CatalogRecord`]:
//!
//! - the title is split into series and release ("Retail Sales - April 2011")
//! - notes collect the description and the labelled source details
//! - extras carry dates, coverage, update frequency and the national statistic flag
//! - the publisher comes from a catalogue group search
//! - tags combine suggestions with the item's vocabulary fields
//!
//! # Examples
//!
//! ```
//! use onshub::{
//!   catalog::InMemoryCatalog,
//!   config::Config,
//!   feed::{Field, RawItem},
//!   importer::OnsImporter,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let importer = OnsImporter::new(InMemoryCatalog::new(), Config::default());
//! let item = RawItem::new()
//!   .with(Field::Title, "Labour Market Statistics - May 2011")
//!   .with(Field::PubDate, "Tue, 10 May 2011")
//!   .with(Field::Guid, "http://www.statistics.gov.uk/hub/id/1234");
//!
//! let record = importer.transform(&item, "ONS-feed.xml").await?;
//! assert_eq!(record.title, "Labour Market Statistics");
//! assert_eq!(record.resources[0].description.as_deref(), Some("May 2011"));
//! # Ok(())
//! # }
//! ```

use crate::{dates::PublicationDate, geo::GeoCoverage, tags::TagSuggester};

use super::*;

lazy_static! {
  /// "Series - Release", split at the first " - "
  static ref TITLE_RE: Regex = Regex::new(r"^(.*?)\s-\s(.*)").unwrap();
}

/// Labels used for the source detail lines of the notes.
const NOTE_FIELDS: [(Field, &str); 4] = [
  (Field::SourceAgency, "Source agency"),
  (Field::Designation, "Designation"),
  (Field::Language, "Language"),
  (Field::AltTitle, "Alternative title"),
];

/// Counts from importing one feed file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
  /// Feed file name
  pub file:     String,
  /// Items read from the feed, including failed ones
  pub items:    usize,
  /// Records produced
  pub imported: usize,
  /// Items that failed with an item error
  pub failed:   usize,
}

/// Converts ONS hub feed items into catalogue records.
#[derive(Debug)]
pub struct OnsImporter<C> {
  /// Catalogue used for publisher lookups
  client:    C,
  /// Import settings
  config:    Config,
  /// Tag suggestions built from the configured vocabulary
  suggester: TagSuggester,
}

impl<C: CatalogClient> OnsImporter<C> {
  /// Creates an importer resolving publishers through `client`.
  pub fn new(client: C, config: Config) -> Self {
    let suggester = TagSuggester::from_config(&config);
    Self { client, config, suggester }
  }

  /// The catalogue client.
  pub fn client(&self) -> &C { &self.client }

  /// The import settings.
  pub fn config(&self) -> &Config { &self.config }

  /// Imports every item of one feed file.
  ///
  /// Each transformed item is handed to `sink`. Items that fail with an item error
  /// (see [`OnsError::is_item_error`]) are handed over as `Err` and counted; any
  /// other error, including catalogue failures, stops the import and is returned.
  pub async fn import_file<F>(&self, path: impl AsRef<Path>, mut sink: F) -> Result<ImportSummary>
  where F: FnMut(Result<CatalogRecord>) -> Result<()> {
    let path = path.as_ref();
    let file = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
    let import_source = format!("{}-{}", self.config.import_source_prefix, file);
    info!("Importing from file: {}", path.display());

    let mut summary = ImportSummary { file, ..Default::default() };
    for item in FeedReader::from_path(path)? {
      summary.items += 1;
      let record = match item {
        Ok(item) => {
          info!("Item {} {}", guid_tail(item.get(Field::Guid)), item.get(Field::PubDate));
          self.transform(&item, &import_source).await
        },
        Err(e) => Err(e),
      };

      match record {
        Ok(record) => {
          summary.imported += 1;
          sink(Ok(record))?;
        },
        Err(e) if e.is_item_error() => {
          error!("Skipping item {} of {}: {}", summary.items, summary.file, e);
          summary.failed += 1;
          sink(Err(e))?;
        },
        Err(e) => return Err(e),
      }
    }

    info!("{} records were imported from file: {}", summary.imported, path.display());
    Ok(summary)
  }

  /// Transforms one feed item into a catalogue record.
  ///
  /// `import_source` is stored in the `import_source` extra. Fails with an item
  /// error if the guid is malformed, or with the catalogue's error if the publisher
  /// lookup fails.
  pub async fn transform(&self, item: &RawItem, import_source: &str) -> Result<CatalogRecord> {
    let (title, release) = split_title(item.get(Field::Title));
    let hub_id = guid_to_hub_id(item.get(Field::Guid), &self.config.guid_prefix)?;

    let source = item.get(Field::SourceAgency);
    let groups = match publisher::resolve_publisher(source, &self.client, &self.config).await? {
      Some(publisher) => vec![publisher],
      None => {
        warn!("Did not find publisher for source-agency: {}", source);
        Vec::new()
      },
    };

    let date_released = parse_release_date(item.get(Field::PubDate));

    let extras = Extras {
      geographic_coverage: GeoCoverage::from_hub_coverage(item.get(Field::Coverage)).to_db(),
      external_reference: self.config.external_reference.clone(),
      national_statistic: if item.get(Field::Designation)
        == self.config.national_statistics_designation
      {
        "yes".to_string()
      } else {
        "no".to_string()
      },
      geographic_granularity: item.get(Field::GeographicBreakdown).to_string(),
      update_frequency: infer_update_frequency(
        item.get(Field::Title),
        item.get(Field::Description),
        &self.config.update_frequencies,
      )
      .unwrap_or_default(),
      date_released: date_released.map(|date| date.isoformat()).unwrap_or_default(),
      categories: item.get(Field::Theme).to_string(),
      series: if release.is_some() { title.clone() } else { String::new() },
      import_source: import_source.to_string(),
      ..Default::default()
    };

    let resource = Resource {
      url:          item.field(Field::Link).filter(|link| !link.is_empty()).map(String::from),
      description:  release,
      hub_id,
      publish_date: date_released.map(|date| date.as_date().format("%Y-%m-%d").to_string()),
    };

    let mut record = CatalogRecord {
      name: naming::name_munge(&title),
      title,
      version: None,
      url: None,
      maintainer: None,
      maintainer_email: None,
      notes: build_notes(item),
      license_id: self.config.license_id.clone(),
      tags: Vec::new(),
      groups,
      resources: vec![resource],
      extras,
    };

    let mut tags = self.suggester.suggest_for(&record);
    tags.extend(tags::keyword_tags([
      item.get(Field::Ipsv),
      item.get(Field::Keywords),
      item.get(Field::Nscl),
    ]));
    record.tags = tags.into_iter().collect();

    Ok(record)
  }
}

/// Splits "Series - Release" titles.
///
/// Returns the series and the release label, or the whole title and `None` (with a
/// warning) when the title has no " - " separator with text on both sides.
///
/// ```
/// use onshub::importer::split_title;
///
/// assert_eq!(
///   split_title("Labour Market Statistics - May 2011"),
///   ("Labour Market Statistics".to_string(), Some("May 2011".to_string()))
/// );
/// assert_eq!(split_title("Crime in England"), ("Crime in England".to_string(), None));
/// ```
pub fn split_title(title: &str) -> (String, Option<String>) {
  match TITLE_RE.captures(title) {
    Some(captures) if !captures[1].is_empty() && !captures[2].is_empty() =>
      (captures[1].to_string(), Some(captures[2].to_string())),
    _ => {
      warn!("Could not split title: {}", title);
      (title.to_string(), None)
    },
  }
}

/// Strips the hub prefix from an item guid.
///
/// An empty guid gives `None`. A guid without the prefix, or one that still
/// contains `http` once the prefix is gone, is an item error.
///
/// ```
/// use onshub::importer::guid_to_hub_id;
///
/// let prefix = "http://www.statistics.gov.uk/hub/id/";
/// assert_eq!(
///   guid_to_hub_id("http://www.statistics.gov.uk/hub/id/119-46440", prefix).unwrap(),
///   Some("119-46440".to_string())
/// );
/// assert_eq!(guid_to_hub_id("", prefix).unwrap(), None);
/// ```
pub fn guid_to_hub_id(guid: &str, prefix: &str) -> Result<Option<String>> {
  if guid.is_empty() {
    return Ok(None);
  }
  let Some(hub_id) = guid.strip_prefix(prefix) else {
    return Err(OnsError::GuidPrefix { prefix: prefix.to_string(), guid: guid.to_string() });
  };
  if hub_id.contains("http") {
    return Err(OnsError::GuidResidualUrl(hub_id.to_string()));
  }
  Ok(Some(hub_id.to_string()))
}

/// Guesses how often a dataset is updated from its title and description.
///
/// Keywords are checked in order against the lowercased text; a keyword ending in
/// "ly" also matches on its stem ("monthly" on "month"). The last keyword to match
/// wins.
///
/// ```
/// use onshub::importer::infer_update_frequency;
///
/// let options = ["annually", "quarterly", "monthly", "weekly", "daily"].map(String::from);
/// assert_eq!(
///   infer_update_frequency("Retail Sales - April 2011", "Monthly estimates", &options).as_deref(),
///   Some("monthly")
/// );
/// assert_eq!(infer_update_frequency("Census", "", &options), None);
/// ```
pub fn infer_update_frequency(
  title: &str,
  description: &str,
  options: &[String],
) -> Option<String> {
  let text = format!("{} {}", title, description).to_lowercase();
  let mut frequency = None;
  for option in options {
    if text.contains(option.as_str()) {
      frequency = Some(option.clone());
    } else if let Some(stem) = option.strip_suffix("ly") {
      if text.contains(stem) {
        frequency = Some(option.clone());
      }
    }
  }
  frequency
}

/// Description followed by the labelled source details, separated by blank lines.
pub fn build_notes(item: &RawItem) -> String {
  let description = item.get(Field::Description);
  let mut notes: Vec<String> = Vec::new();
  if !description.is_empty() {
    notes.push(description.to_string());
  }
  for (field, label) in NOTE_FIELDS {
    let value = item.get(field);
    if !value.is_empty() {
      notes.push(format!("{}: {}", label, value));
    }
  }
  notes.join("\n\n")
}

/// Parses the item publication date, warning when it is missing or imprecise.
fn parse_release_date(text: &str) -> Option<PublicationDate> {
  let date = PublicationDate::parse(text);
  match date {
    Some(date) if date.is_approximate() =>
      warn!("Could not read format of publication (release) date: {:?}", text),
    None => warn!("Could not read publication (release) date: {:?}", text),
    Some(_) => (),
  }
  date
}

/// The last nine characters of a guid, enough to tell items apart in the log.
fn guid_tail(guid: &str) -> &str {
  let start = guid.char_indices().rev().nth(8).map_or(0, |(index, _)| index);
  &guid[start..]
}

#[cfg(test)]
mod tests {
  use super::*;

  fn options() -> Vec<String> { Config::default().update_frequencies }

  #[traced_test]
  #[test]
  fn test_split_title_edge_cases() {
    assert_eq!(
      split_title("Travel Trends - 2010 - revised"),
      ("Travel Trends".to_string(), Some("2010 - revised".to_string()))
    );
    assert_eq!(split_title("Pre-school places"), ("Pre-school places".to_string(), None));
    assert_eq!(split_title("Trailing - "), ("Trailing - ".to_string(), None));
    assert_eq!(
      split_title("Labour Market Statistics - May 2011\n"),
      ("Labour Market Statistics".to_string(), Some("May 2011".to_string()))
    );
    assert!(logs_contain("Could not split title: Pre-school places"));
  }

  #[test]
  fn test_guid_errors() {
    let prefix = config::GUID_PREFIX;
    assert!(matches!(
      guid_to_hub_id("https://www.statistics.gov.uk/hub/id/1", prefix),
      Err(OnsError::GuidPrefix { .. })
    ));
    assert!(matches!(
      guid_to_hub_id("http://www.statistics.gov.uk/hub/id/http://x", prefix),
      Err(OnsError::GuidResidualUrl(id)) if id == "http://x"
    ));
  }

  #[test]
  fn test_update_frequency_last_match_wins() {
    // "monthly" matches first, the later "week" stem overrides it
    assert_eq!(
      infer_update_frequency("Monthly claimant count", "Figures for the week ending", &options())
        .as_deref(),
      Some("weekly")
    );
    assert_eq!(
      infer_update_frequency("Annual survey of hours", "", &options()).as_deref(),
      Some("annually")
    );
    assert_eq!(
      infer_update_frequency("QUARTERLY national accounts", "", &options()).as_deref(),
      Some("quarterly")
    );
  }

  #[test]
  fn test_notes_layout() {
    let item = RawItem::new()
      .with(Field::Description, "Headline figures.")
      .with(Field::SourceAgency, "Office for National Statistics")
      .with(Field::Designation, "")
      .with(Field::AltTitle, "LMS");
    assert_eq!(
      build_notes(&item),
      "Headline figures.\n\nSource agency: Office for National Statistics\n\nAlternative title: LMS"
    );
    assert_eq!(build_notes(&RawItem::new()), "");
  }

  #[test]
  fn test_guid_tail() {
    assert_eq!(guid_tail("http://www.statistics.gov.uk/hub/id/119-46440"), "119-46440");
    assert_eq!(guid_tail("1234"), "1234");
    assert_eq!(guid_tail(""), "");
  }

  #[traced_test]
  #[tokio::test]
  async fn test_transform_degrades_gracefully() {
    let importer = OnsImporter::new(InMemoryCatalog::new(), Config::default());
    let item = RawItem::new()
      .with(Field::Title, "Annual Population Survey")
      .with(Field::PubDate, "May 2011")
      .with(Field::Coverage, "International")
      .with(Field::SourceAgency, "Nobody");

    let record = importer.transform(&item, "ONS-test.xml").await.unwrap();
    assert_eq!(record.name, "annual-population-survey");
    assert!(record.groups.is_empty());
    assert_eq!(record.extras.series, "");
    assert_eq!(record.extras.date_released, "2011-05");
    assert_eq!(record.extras.geographic_coverage, "000001: Global");
    assert_eq!(record.extras.national_statistic, "no");
    assert_eq!(record.extras.update_frequency, "annually");
    assert_eq!(record.extras.import_source, "ONS-test.xml");
    assert_eq!(record.resources[0], Resource {
      url:          None,
      description:  None,
      hub_id:       None,
      publish_date: Some("2011-05-01".to_string()),
    });
    assert!(record.tags.contains(&"population".to_string()));
    assert!(logs_contain("Could not read format of publication (release) date"));
    assert!(logs_contain("Did not find publisher for source-agency: Nobody"));
  }

  #[tokio::test]
  async fn test_transform_rejects_bad_guid() {
    let importer = OnsImporter::new(InMemoryCatalog::new(), Config::default());
    let item = RawItem::new().with(Field::Title, "X - Y").with(Field::Guid, "urn:hub:1");
    let err = importer.transform(&item, "ONS-test.xml").await.unwrap_err();
    assert!(matches!(err, OnsError::GuidPrefix { .. }));
    // the guid is checked before the catalogue is consulted
    assert!(importer.client().group_searches().is_empty());
  }
}
