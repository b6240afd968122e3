use std::sync::{Mutex, MutexGuard, PoisonError};

use super::*;

/// A catalogue held entirely in memory.
///
/// Groups and packages keep their insertion order, which is the order searches
/// return them in. Every group search is recorded and can be inspected with
/// [`InMemoryCatalog::group_searches`].
///
/// An empty `InMemoryCatalog` stands in for the catalogue when importing offline:
/// every publisher lookup comes back empty.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
  groups:   Vec<Group>,
  packages: Mutex<Vec<Package>>,
  searches: Mutex<Vec<(String, bool)>>,
}

impl InMemoryCatalog {
  /// Creates an empty catalogue.
  pub fn new() -> Self { Self::default() }

  /// Adds a publisher group.
  pub fn with_group(mut self, group: Group) -> Self {
    self.groups.push(group);
    self
  }

  /// Adds a dataset record.
  pub fn with_package(self, package: Package) -> Self {
    lock(&self.packages).push(package);
    self
  }

  /// A snapshot of the stored dataset records.
  pub fn packages(&self) -> Vec<Package> { lock(&self.packages).clone() }

  /// A stored dataset record by name.
  pub fn package(&self, name: &str) -> Option<Package> {
    lock(&self.packages).iter().find(|p| p.name == name).cloned()
  }

  /// Every group search made so far, as `(query, exact)`.
  pub fn group_searches(&self) -> Vec<(String, bool)> { lock(&self.searches).clone() }
}

/// Takes a lock, carrying on with the data even if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Whether a package matches a search query.
///
/// `key:value` queries compare an extra exactly; anything else is a
/// case-insensitive substring match on the package name.
fn package_matches(package: &Package, query: &str) -> bool {
  match query.split_once(':') {
    Some((key, value)) => package.extra(key) == value,
    None => package.name.to_lowercase().contains(&query.to_lowercase()),
  }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
  async fn group_search(&self, query: &str, exact: bool) -> Result<GroupSearch> {
    lock(&self.searches).push((query.to_string(), exact));

    let needle = query.to_lowercase();
    let results: Vec<Group> = self
      .groups
      .iter()
      .filter(|group| {
        let (name, title) = (group.name.to_lowercase(), group.title.to_lowercase());
        if exact {
          name == needle || title == needle
        } else {
          !needle.is_empty() && (name.contains(&needle) || title.contains(&needle))
        }
      })
      .cloned()
      .collect();

    Ok(GroupSearch { count: results.len(), results })
  }

  async fn package_search(&self, query: &str, rows: usize, start: usize) -> Result<PackageSearch> {
    let packages = lock(&self.packages);
    let matching: Vec<&Package> = packages.iter().filter(|p| package_matches(p, query)).collect();
    Ok(PackageSearch {
      count:   matching.len(),
      results: matching.into_iter().skip(start).take(rows).cloned().collect(),
    })
  }

  async fn package_update(&self, package: &Package) -> Result<()> {
    let mut packages = lock(&self.packages);
    match packages.iter_mut().find(|p| p.name == package.name) {
      Some(existing) => {
        *existing = package.clone();
        Ok(())
      },
      None => Err(OnsError::Api(format!("Package not found: {}", package.name))),
    }
  }
}
