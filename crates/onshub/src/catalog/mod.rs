//! The catalogue client capability.
//!
//! Everything the importer and the tools need from CKAN goes through
//! [`CatalogClient`]: searching publisher groups, and searching and updating
//! dataset records. Two implementations ship with the crate:
//!
//! - [`CkanClient`] talks to a live catalogue through the CKAN action API
//! - [`InMemoryCatalog`] keeps groups and packages in memory, for offline runs and tests
//!
//! # Examples
//!
//! ```
//! use onshub::catalog::{CatalogClient, Group, InMemoryCatalog};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = InMemoryCatalog::new().with_group(Group::new("ons", "Office for National Statistics"));
//!
//! let found = catalog.group_search("office for national statistics", true).await?;
//! assert_eq!(found.count, 1);
//! assert_eq!(found.results[0].name, "ons");
//! # Ok(())
//! # }
//! ```

use super::*;

mod ckan;
mod memory;

pub use ckan::CkanClient;
pub use memory::InMemoryCatalog;

/// A publisher group as returned by a group search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  /// Group identifier, used in record `groups`
  pub name:  String,
  /// Display name
  #[serde(default)]
  pub title: String,
}

impl Group {
  /// Creates a group from its identifier and display name.
  pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
    Self { name: name.into(), title: title.into() }
  }
}

/// Result of a group search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSearch {
  /// Number of groups matched
  pub count:   usize,
  /// Matched groups, in the catalogue's order
  #[serde(default)]
  pub results: Vec<Group>,
}

/// A dataset record as stored in the catalogue.
///
/// Only the fields the tools inspect are typed. Everything else is kept in
/// `other` so that an update writes the record back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
  /// Record identifier
  pub name:   String,
  /// Supplementary metadata, sent as a list of `{"key", "value"}` pairs
  #[serde(default, with = "extras_list")]
  pub extras: BTreeMap<String, String>,
  /// All remaining record fields, passed through untouched
  #[serde(flatten)]
  pub other:  serde_json::Map<String, serde_json::Value>,
}

impl Package {
  /// Creates a package with the given name and extras.
  pub fn new(name: impl Into<String>, extras: BTreeMap<String, String>) -> Self {
    Self { name: name.into(), extras, other: serde_json::Map::new() }
  }

  /// The value of an extra, or `""` if it is not set.
  pub fn extra(&self, key: &str) -> &str { self.extras.get(key).map_or("", String::as_str) }
}

/// CKAN extras wire forms.
///
/// Current CKAN sends `[{"key": .., "value": ..}]`, older releases a plain object.
/// Both are read; the list form is written. Non-string values keep their JSON text.
mod extras_list {
  use serde::{ser::SerializeSeq, Deserializer, Serializer};
  use serde_json::Value;

  use super::*;

  #[derive(Serialize)]
  struct EntryRef<'a> {
    key:   &'a str,
    value: &'a str,
  }

  #[derive(Deserialize)]
  struct Entry {
    key:   String,
    #[serde(default)]
    value: Value,
  }

  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Shape {
    List(Vec<Entry>),
    Map(BTreeMap<String, Value>),
  }

  fn text(value: Value) -> String {
    match value {
      Value::String(s) => s,
      Value::Null => String::new(),
      other => other.to_string(),
    }
  }

  pub fn serialize<S: Serializer>(
    extras: &BTreeMap<String, String>,
    serializer: S,
  ) -> std::result::Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(extras.len()))?;
    for (key, value) in extras {
      seq.serialize_element(&EntryRef { key, value })?;
    }
    seq.end()
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> std::result::Result<BTreeMap<String, String>, D::Error> {
    Ok(match Option::<Shape>::deserialize(deserializer)? {
      Some(Shape::List(entries)) => {
        entries.into_iter().map(|entry| (entry.key, text(entry.value))).collect()
      },
      Some(Shape::Map(map)) => map.into_iter().map(|(key, value)| (key, text(value))).collect(),
      None => BTreeMap::new(),
    })
  }
}

/// Result of a package search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageSearch {
  /// Total number of matching packages, across all pages
  pub count:   usize,
  /// The requested page of packages
  #[serde(default)]
  pub results: Vec<Package>,
}

/// Read and write access to a CKAN catalogue.
///
/// Implementations report transport problems as errors and never retry; callers
/// decide whether a failure ends the run.
#[async_trait]
pub trait CatalogClient: Send + Sync {
  /// Searches publisher groups.
  ///
  /// With `exact` set only groups whose name or title equals `query` match;
  /// otherwise the catalogue's broader text match applies.
  async fn group_search(&self, query: &str, exact: bool) -> Result<GroupSearch>;

  /// Searches dataset records, returning `rows` results starting at `start`.
  async fn package_search(&self, query: &str, rows: usize, start: usize) -> Result<PackageSearch>;

  /// Writes a dataset record back to the catalogue.
  async fn package_update(&self, package: &Package) -> Result<()>;
}

#[async_trait]
impl<C: CatalogClient + ?Sized> CatalogClient for &C {
  async fn group_search(&self, query: &str, exact: bool) -> Result<GroupSearch> {
    (**self).group_search(query, exact).await
  }

  async fn package_search(&self, query: &str, rows: usize, start: usize) -> Result<PackageSearch> {
    (**self).package_search(query, rows, start).await
  }

  async fn package_update(&self, package: &Package) -> Result<()> {
    (**self).package_update(package).await
  }
}
