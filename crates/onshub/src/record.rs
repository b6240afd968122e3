//! CKAN dataset records produced by the importer.
//!
//! The types serialize to the package dictionary the catalogue's ingest expects,
//! including its hyphenated keys (`hub-id`, `publish-date`, `temporal_coverage-from`).

use super::*;

/// One dataset record, ready for ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
  /// URL-safe identifier derived from the title, never empty
  pub name:             String,
  /// Series title
  pub title:            String,
  /// Always unset for hub imports
  pub version:          Option<String>,
  /// Always unset for hub imports
  pub url:              Option<String>,
  /// Always unset for hub imports
  pub maintainer:       Option<String>,
  /// Always unset for hub imports
  pub maintainer_email: Option<String>,
  /// Description followed by labelled source details
  pub notes:            String,
  /// Licence identifier
  pub license_id:       String,
  /// Sorted, deduplicated tags of at least two characters
  pub tags:             Vec<String>,
  /// The publisher group, when one was found
  pub groups:           Vec<String>,
  /// The single downloadable release
  pub resources:        Vec<Resource>,
  /// Supplementary metadata
  pub extras:           Extras,
}

/// A downloadable release of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
  /// Download link
  pub url:          Option<String>,
  /// Release label, e.g. "May 2011"
  pub description:  Option<String>,
  /// Hub id, the item guid without its prefix
  #[serde(rename = "hub-id")]
  pub hub_id:       Option<String>,
  /// Publication date as `YYYY-MM-DD`
  #[serde(rename = "publish-date")]
  pub publish_date: Option<String>,
}

/// The fixed set of extras attached to every imported record.
///
/// Fields the hub has no data for stay empty strings, which is how the catalogue
/// expects unset extras.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extras {
  /// Coded coverage, see [`geo::GeoCoverage::to_db`](crate::geo::GeoCoverage::to_db)
  pub geographic_coverage:    String,
  /// Always the configured external reference, `ONSHUB` by default
  pub external_reference:     String,
  #[allow(missing_docs)]
  pub temporal_granularity:   String,
  #[allow(missing_docs)]
  pub date_updated:           String,
  #[allow(missing_docs)]
  pub precision:              String,
  /// Hub `geographic-breakdown`
  pub geographic_granularity: String,
  #[allow(missing_docs)]
  #[serde(rename = "temporal_coverage-from")]
  pub temporal_coverage_from: String,
  #[allow(missing_docs)]
  #[serde(rename = "temporal_coverage-to")]
  pub temporal_coverage_to:   String,
  /// "yes" or "no"
  pub national_statistic:     String,
  /// Inferred from title and description, may be empty
  pub update_frequency:       String,
  /// ISO date at the precision the feed gave
  pub date_released:          String,
  /// Hub theme
  pub categories:             String,
  /// Series title when the item title carried a release label, else empty
  pub series:                 String,
  /// `ONS-<feed file name>`
  pub import_source:          String,
}

impl Extras {
  /// The extras as a string map, the shape the catalogue stores them in.
  pub fn to_map(&self) -> BTreeMap<String, String> {
    let value = serde_json::to_value(self).unwrap_or_default();
    serde_json::from_value(value).unwrap_or_default()
  }
}

impl CatalogRecord {
  /// Whether the record is flagged as a National Statistic.
  pub fn is_national_statistic(&self) -> bool { self.extras.national_statistic == "yes" }
}
