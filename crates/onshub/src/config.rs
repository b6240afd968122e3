//! Importer configuration.
//!
//! Every value has a default matching the ONS hub and the data.gov.uk catalogue, so
//! a configuration file only needs to list what differs. Files are TOML:
//!
//! ```toml
//! license_id = "uk-ogl"
//! update_frequencies = ["annually", "quarterly", "monthly", "weekly", "daily"]
//!
//! [organisation_aliases]
//! "Health" = "Department of Health"
//! ```

use super::*;

/// Prefix carried by every ONS hub item guid.
pub const GUID_PREFIX: &str = "http://www.statistics.gov.uk/hub/id/";

/// Designation label that marks an item as a National Statistic.
pub const NATIONAL_STATISTICS: &str = "National Statistics";

/// Settings shared by the importer, the publisher resolver and the tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Licence attached to every imported record
  pub license_id:                      String,
  /// Prefix stripped from item guids to form the resource hub id
  pub guid_prefix:                     String,
  /// Value of the `external_reference` extra
  pub external_reference:              String,
  /// Designation value that sets `national_statistic` to "yes"
  pub national_statistics_designation: String,
  /// Prefix of the `import_source` extra, followed by `-<feed file name>`
  pub import_source_prefix:            String,
  /// Update frequency keywords, checked in order; the last match wins
  pub update_frequencies:              Vec<String>,
  /// Keywords the tag suggester looks for in titles and notes
  pub suggested_tags:                  Vec<String>,
  /// Source agency spellings mapped onto catalogue publisher names
  pub organisation_aliases:            BTreeMap<String, String>,
  /// Default catalogue API base URL for the command line tools
  pub catalog_url:                     Option<String>,
  /// API key sent with write requests
  pub api_key:                         Option<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      license_id:                      "uk-ogl".to_string(),
      guid_prefix:                     GUID_PREFIX.to_string(),
      external_reference:              "ONSHUB".to_string(),
      national_statistics_designation: NATIONAL_STATISTICS.to_string(),
      import_source_prefix:            "ONS".to_string(),
      update_frequencies:              ["annually", "quarterly", "monthly", "weekly", "daily"]
        .into_iter()
        .map(String::from)
        .collect(),
      suggested_tags:                  [
        "agriculture",
        "benefits",
        "births",
        "census",
        "crime",
        "deaths",
        "economy",
        "education",
        "employment",
        "energy",
        "environment",
        "health",
        "housing",
        "income",
        "inflation",
        "labour market",
        "migration",
        "population",
        "prices",
        "tourism",
        "trade",
        "transport",
      ]
      .into_iter()
      .map(String::from)
      .collect(),
      organisation_aliases:            BTreeMap::new(),
      catalog_url:                     None,
      api_key:                         None,
    }
  }
}

impl Config {
  /// Parses a configuration from a TOML string. Missing keys take their defaults.
  pub fn from_toml(toml_str: &str) -> Result<Self> { Ok(toml::from_str(toml_str)?) }

  /// Reads a configuration from a TOML file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    Self::from_toml(&content)
  }

  /// Returns the platform default location of the configuration file.
  ///
  /// - On Unix: `~/.config/onshub/config.toml`
  /// - On macOS: `~/Library/Application Support/onshub/config.toml`
  /// - On Windows: `%APPDATA%\onshub\config.toml`
  /// - Fallback: `./onshub/config.toml`
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("onshub").join("config.toml")
  }

  /// Loads `path` if given, else the default file if it exists, else the defaults.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    match path {
      Some(path) => Self::from_path(path),
      None => {
        let default = Self::default_path();
        if default.is_file() {
          Self::from_path(default)
        } else {
          trace!("No configuration at {}, using defaults", default.display());
          Ok(Self::default())
        }
      },
    }
  }

  /// Sets the API key used for catalogue writes.
  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = Some(api_key.into());
    self
  }

  /// Sets the catalogue base URL.
  pub fn with_catalog_url(mut self, url: impl Into<String>) -> Self {
    self.catalog_url = Some(url.into());
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_partial_toml_keeps_defaults() {
    let config = Config::from_toml(
      r#"
      license_id = "cc-by"

      [organisation_aliases]
      "Health" = "Department of Health"
      "#,
    )
    .unwrap();

    assert_eq!(config.license_id, "cc-by");
    assert_eq!(config.guid_prefix, GUID_PREFIX);
    assert_eq!(config.update_frequencies.last().unwrap(), "daily");
    assert_eq!(config.organisation_aliases.get("Health").unwrap(), "Department of Health");
  }

  #[test]
  fn test_load_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "catalog_url = \"http://localhost:5000/api\"\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.catalog_url.as_deref(), Some("http://localhost:5000/api"));
  }

  #[test]
  fn test_invalid_toml() {
    assert!(matches!(Config::from_toml("license_id = ["), Err(OnsError::TomlDe(_))));
  }
}
