use std::{
  error::Error,
  path::{Path, PathBuf},
};

use onshub::{
  batch::{self, BatchReport},
  catalog::{Group, InMemoryCatalog},
  config::Config,
  error::OnsError,
  feed::{FeedReader, Field},
  importer::{ImportSummary, OnsImporter},
  record::CatalogRecord,
};
use tracing_test::traced_test;

mod import;
mod tools;

pub type TestResult<T> = Result<T, Box<dyn Error>>;

pub const FEED: &str = "ons_data_7_days_to_2011-05-10.xml";

/// Path of a file under `tests/data`.
pub fn fixture(name: &str) -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

/// A catalogue with the publishers the fixture feed refers to.
pub fn create_test_catalog() -> InMemoryCatalog {
  InMemoryCatalog::new()
    .with_group(Group::new("office-for-national-statistics", "Office for National Statistics"))
    .with_group(Group::new("department-of-health", "Department of Health"))
    .with_group(Group::new("health-protection-agency", "Health Protection Agency"))
}

/// Imports the fixture feed, collecting records and item errors separately.
pub async fn import_fixture(
  catalog: &InMemoryCatalog,
  config: Config,
) -> TestResult<(ImportSummary, Vec<CatalogRecord>, Vec<OnsError>)> {
  let importer = OnsImporter::new(catalog, config);
  let mut records = Vec::new();
  let mut errors = Vec::new();
  let summary = importer
    .import_file(fixture(FEED), |record| {
      match record {
        Ok(record) => records.push(record),
        Err(e) => errors.push(e),
      }
      Ok(())
    })
    .await?;
  Ok((summary, records, errors))
}
