use std::collections::BTreeMap;

use onshub::{
  catalog::Package,
  filter::{FilterSummary, NationalStatisticFilter},
};

use super::*;

#[traced_test]
#[tokio::test]
async fn test_check_producers_against_catalog() -> TestResult<()> {
  let catalog = create_test_catalog();
  let report =
    batch::check_publishers(batch::ONS_PRODUCERS, &catalog, &Config::default()).await?;

  assert_eq!(report.total, batch::ONS_PRODUCERS.len());
  // "Office for National Statistics" matches exactly; every name containing
  // "Health" finds the health groups through the broad search
  assert!(report.errors < report.total);
  assert!(logs_contain("Publisher not found: Eurostat"));
  assert!(logs_contain(&format!(
    "Completed with {} errors from {} sources",
    report.errors, report.total
  )));
  Ok(())
}

#[tokio::test]
async fn test_check_feed_agencies() -> TestResult<()> {
  let catalog = create_test_catalog();
  let agencies = batch::source_agencies(fixture(FEED))?;
  assert_eq!(agencies, ["Office for National Statistics", "Health"]);

  let report = batch::check_publishers(&agencies, &catalog, &Config::default()).await?;
  assert_eq!(report, BatchReport { errors: 0, total: 2 });
  Ok(())
}

#[tokio::test]
async fn test_filter_after_import() -> TestResult<()> {
  let catalog = create_test_catalog();
  let (_, records, _) = import_fixture(&catalog, Config::default()).await?;

  let mut catalog = InMemoryCatalog::new();
  for record in &records {
    catalog = catalog.with_package(Package::new(record.name.clone(), record.extras.to_map()));
  }
  let manual = BTreeMap::from([
    ("national_statistic".to_string(), "yes".to_string()),
    ("import_source".to_string(), "spreadsheet".to_string()),
  ]);
  catalog = catalog.with_package(Package::new("hand-entered", manual));

  let summary = NationalStatisticFilter::new(&catalog).run().await?;
  assert_eq!(summary, FilterSummary { checked: 2, demoted: 1 });
  assert_eq!(catalog.package("labour-market-statistics").unwrap().extra("national_statistic"), "yes");
  assert_eq!(catalog.package("hand-entered").unwrap().extra("national_statistic"), "no");
  Ok(())
}
