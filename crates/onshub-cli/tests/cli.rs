//! Integration tests for the onshub command line tools.

use std::{fs, path::PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

// Helper function to create a clean command instance
fn onshub() -> Command { Command::cargo_bin("onshub").unwrap() }

fn test_publishers() -> Command { Command::cargo_bin("ons-test-publishers").unwrap() }

// Fixtures shared with the library's integration tests
fn fixture(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../onshub/tests/data").join(name)
}

const FEED: &str = "ons_data_7_days_to_2011-05-10.xml";

const CLEAN_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:hub="http://www.statistics.gov.uk/hub">
  <channel>
    <item>
      <title>Retail Sales - April 2011</title>
      <pubDate>Thu, 19 May 2011</pubDate>
      <guid>http://www.statistics.gov.uk/hub/id/119-47117</guid>
      <hub:designation>National Statistics</hub:designation>
    </item>
  </channel>
</rss>"#;

#[test]
fn test_qa_tool_help_exits_non_zero() {
  test_publishers()
    .arg("--help")
    .assert()
    .failure()
    .code(1)
    .stdout(predicate::str::contains("CKAN_API_URL"));

  test_publishers().arg("-h").assert().failure().code(1);
}

#[test]
fn test_qa_tool_argument_count() {
  test_publishers().assert().failure().code(1).stderr(predicate::str::contains("CKAN_API_URL"));

  test_publishers()
    .args(["http://data.gov.uk/api", "http://test.ckan.net/api"])
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("unexpected argument"));
}

#[test]
fn test_qa_tool_rejects_invalid_url() {
  test_publishers()
    .arg("not a url")
    .env("RUST_LOG", "error")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid CKAN API URL"));
}

#[test]
fn test_import_offline_writes_json_lines() {
  let dir = tempdir().unwrap();
  let output = dir.path().join("records.jsonl");

  onshub()
    .arg("--config")
    .arg(fixture("onshub.toml"))
    .arg("import")
    .arg(fixture(FEED))
    .arg("--output")
    .arg(&output)
    .assert()
    .failure()
    .stderr(predicate::str::contains("2 of 4 items imported, 2 failed"))
    .stderr(predicate::str::contains("hub:release-status"));

  let written = fs::read_to_string(&output).unwrap();
  let lines: Vec<&str> = written.lines().collect();
  assert_eq!(lines.len(), 2);
  assert!(lines[0].starts_with("{\"name\":\"labour-market-statistics\""));
  assert!(lines[0].contains("\"hub-id\":\"1234\""));
  assert!(lines[0].contains("\"series\":\"Labour Market Statistics\""));
  assert!(lines[1].contains("\"groups\":[]"));
}

#[test]
fn test_import_glob_to_stdout() {
  let dir = tempdir().unwrap();
  fs::write(dir.path().join("ons_data_a.xml"), CLEAN_FEED).unwrap();
  fs::write(dir.path().join("ons_data_b.xml"), CLEAN_FEED).unwrap();
  fs::write(dir.path().join("notes.txt"), "not a feed").unwrap();

  let pattern = dir.path().join("ons_data_*.xml");
  onshub()
    .arg("--config")
    .arg(fixture("onshub.toml"))
    .arg("import")
    .arg(pattern.to_str().unwrap())
    .assert()
    .success()
    .stdout(predicate::str::contains("\"import_source\":\"ONS-ons_data_a.xml\""))
    .stdout(predicate::str::contains("\"import_source\":\"ONS-ons_data_b.xml\""))
    .stdout(predicate::str::contains("\"national_statistic\":\"yes\""))
    .stderr(predicate::str::contains("ons_data_a.xml: 1 of 1 items imported, 0 failed"));
}

#[test]
fn test_import_missing_feed_fails() {
  let dir = tempdir().unwrap();
  onshub()
    .arg("--config")
    .arg(fixture("onshub.toml"))
    .arg("import")
    .arg(dir.path().join("missing.xml"))
    .assert()
    .failure()
    .stdout(predicate::str::is_empty());
}

#[test]
fn test_import_writes_log_file() {
  let dir = tempdir().unwrap();
  let logs = dir.path().join("logs");
  fs::create_dir(&logs).unwrap();
  fs::write(dir.path().join("feed.xml"), CLEAN_FEED).unwrap();

  onshub()
    .args(["-vv", "--config"])
    .arg(fixture("onshub.toml"))
    .arg("import")
    .arg(dir.path().join("feed.xml"))
    .arg("--log-dir")
    .arg(&logs)
    .assert()
    .success();

  let log = fs::read_to_string(logs.join("onshub.log")).unwrap();
  assert!(log.contains("Importing from file"));
}

#[test]
fn test_import_requires_a_feed() {
  onshub().arg("import").assert().failure().stderr(predicate::str::contains("<FEEDS>..."));
}
