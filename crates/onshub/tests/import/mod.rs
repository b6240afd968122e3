use super::*;

#[traced_test]
#[tokio::test]
async fn test_import_fixture_feed() -> TestResult<()> {
  let catalog = create_test_catalog();
  let (summary, records, errors) = import_fixture(&catalog, Config::default()).await?;

  assert_eq!(summary, ImportSummary {
    file:     FEED.to_string(),
    items:    4,
    imported: 2,
    failed:   2,
  });
  assert_eq!(
    records.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
    ["Labour Market Statistics", "Health Survey for England"]
  );
  assert_eq!(errors.len(), 2);
  assert!(logs_contain("Importing from file"));
  assert!(logs_contain("Item b/id/1234 Tue, 10 May 2011"));
  assert!(logs_contain("2 records were imported from file"));
  Ok(())
}

#[tokio::test]
async fn test_item_errors_arrive_in_document_order() -> TestResult<()> {
  let catalog = create_test_catalog();
  let (_, _, errors) = import_fixture(&catalog, Config::default()).await?;

  assert_eq!(errors.len(), 2);
  assert!(matches!(&errors[0], OnsError::GuidPrefix { guid, .. } if guid.contains("example.com")));
  assert!(
    matches!(&errors[1], OnsError::UnexpectedElement { name, level: 4 } if name == "hub:release-status")
  );
  assert!(errors.iter().all(OnsError::is_item_error));
  Ok(())
}

#[tokio::test]
async fn test_labour_market_record() -> TestResult<()> {
  let catalog = create_test_catalog();
  let (_, records, _) = import_fixture(&catalog, Config::default()).await?;
  let record = &records[0];

  assert_eq!(record.name, "labour-market-statistics");
  assert_eq!(record.title, "Labour Market Statistics");
  assert_eq!(record.license_id, "uk-ogl");
  assert_eq!(record.groups, ["office-for-national-statistics"]);
  assert_eq!(
    record.notes,
    "Monthly estimates of employment and unemployment.\n\n\
     Source agency: Office for National Statistics\n\n\
     Designation: National Statistics"
  );
  assert_eq!(record.tags, ["economy", "employment", "labour-market", "unemployment"]);

  assert_eq!(record.resources.len(), 1);
  let resource = &record.resources[0];
  assert_eq!(resource.description.as_deref(), Some("May 2011"));
  assert_eq!(resource.hub_id.as_deref(), Some("1234"));
  assert_eq!(resource.publish_date.as_deref(), Some("2011-05-10"));
  assert_eq!(
    resource.url.as_deref(),
    Some("http://www.ons.gov.uk/ons/rel/lms/labour-market-statistics/may-2011/index.html")
  );

  let extras = &record.extras;
  assert_eq!(extras.series, "Labour Market Statistics");
  assert_eq!(extras.national_statistic, "yes");
  assert!(record.is_national_statistic());
  assert_eq!(extras.external_reference, "ONSHUB");
  assert_eq!(extras.import_source, format!("ONS-{}", FEED));
  assert_eq!(extras.date_released, "2011-05-10");
  assert_eq!(extras.update_frequency, "monthly");
  assert_eq!(extras.categories, "Labour Market");
  assert_eq!(extras.geographic_granularity, "UK and GB");
  assert_eq!(extras.geographic_coverage, "111100: England, Scotland, Wales, Northern Ireland");
  assert_eq!(extras.temporal_coverage_from, "");
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_ambiguous_publisher_takes_first() -> TestResult<()> {
  let catalog = create_test_catalog();
  let (_, records, _) = import_fixture(&catalog, Config::default()).await?;
  let record = &records[1];

  assert_eq!(record.groups, ["department-of-health"]);
  assert!(logs_contain("Multiple publishers matched \"Health\""));
  assert_eq!(record.extras.national_statistic, "no");
  assert_eq!(record.extras.update_frequency, "annually");
  assert_eq!(record.extras.geographic_coverage, "100000: England");
  assert_eq!(record.resources[0].hub_id.as_deref(), Some("119-46440"));
  assert_eq!(record.resources[0].publish_date.as_deref(), Some("2011-05-11"));
  assert_eq!(record.tags, ["health", "population"]);
  assert!(record.notes.ends_with("Language: English"));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_config_alias_resolves_publisher() -> TestResult<()> {
  let catalog = create_test_catalog();
  let config = Config::from_path(fixture("onshub.toml"))?;
  let (_, records, _) = import_fixture(&catalog, config).await?;

  assert_eq!(records[1].groups, ["department-of-health"]);
  assert!(!logs_contain("Multiple publishers matched"));
  Ok(())
}

#[tokio::test]
async fn test_offline_import_has_no_publishers() -> TestResult<()> {
  let catalog = InMemoryCatalog::new();
  let (summary, records, _) = import_fixture(&catalog, Config::default()).await?;

  assert_eq!(summary.imported, 2);
  assert!(records.iter().all(|r| r.groups.is_empty()));
  // exact then broad for each transformed item
  assert_eq!(catalog.group_searches().len(), 4);
  Ok(())
}

#[tokio::test]
async fn test_sink_error_stops_import() {
  let importer = OnsImporter::new(create_test_catalog(), Config::default());
  let mut seen = 0;
  let result = importer
    .import_file(fixture(FEED), |_| {
      seen += 1;
      Err(OnsError::Config("output closed".into()))
    })
    .await;

  assert!(matches!(result, Err(OnsError::Config(_))));
  assert_eq!(seen, 1);
}

#[tokio::test]
async fn test_missing_feed_is_an_error() {
  let importer = OnsImporter::new(InMemoryCatalog::new(), Config::default());
  let result = importer.import_file(fixture("missing.xml"), |_| Ok(())).await;
  assert!(matches!(result, Err(OnsError::Path(_))));
}

#[test]
fn test_reader_yields_one_item_per_non_empty_item() -> TestResult<()> {
  let items: Vec<_> = FeedReader::from_path(fixture(FEED))?.collect();

  assert_eq!(items.len(), 4);
  let titles: Vec<String> = items
    .iter()
    .filter_map(|item| item.as_ref().ok())
    .map(|item| item.get(Field::Title).to_string())
    .collect();
  assert_eq!(titles, [
    "Labour Market Statistics - May 2011",
    "Regional Trends - 2011",
    "Health Survey for England - 2010"
  ]);
  Ok(())
}
