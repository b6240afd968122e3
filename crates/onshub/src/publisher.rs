//! Source agency to publisher resolution.
//!
//! Hub items name their producer in free text ("Health", "HM Treasury"). The
//! catalogue knows publishers as groups. [`resolve_publisher`] canonicalizes the
//! name, tries an exact group search and falls back to a broad one.

use super::*;

/// Finds the catalogue publisher for a hub source agency.
///
/// Returns the group name, or `None` when neither search finds anything. When the
/// search returns several groups, all candidates are logged and the first one (in
/// the catalogue's order) is used. Catalogue errors are returned as they are.
///
/// # Examples
///
/// ```
/// use onshub::{
///   catalog::{Group, InMemoryCatalog},
///   config::Config,
///   publisher::resolve_publisher,
/// };
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = InMemoryCatalog::new().with_group(Group::new("hm-treasury", "HM Treasury"));
/// let publisher = resolve_publisher("HM  Treasury", &catalog, &Config::default()).await?;
/// assert_eq!(publisher.as_deref(), Some("hm-treasury"));
/// # Ok(())
/// # }
/// ```
pub async fn resolve_publisher<C: CatalogClient + ?Sized>(
  source: &str,
  client: &C,
  config: &Config,
) -> Result<Option<String>> {
  let publisher_name = naming::canonise_organisation_name(source, &config.organisation_aliases);

  let mut result = client.group_search(&publisher_name, true).await?;
  if result.count == 0 {
    debug!("No exact publisher match for {:?}, broadening the search", publisher_name);
    result = client.group_search(&publisher_name, false).await?;
  }

  let Some(first) = result.results.first() else {
    warn!(
      "Could not find source in publishers: \"{}\" (mapped from \"{}\")",
      publisher_name, source
    );
    return Ok(None);
  };

  if result.count > 1 {
    let candidates: Vec<(&str, &str)> =
      result.results.iter().map(|group| (group.name.as_str(), group.title.as_str())).collect();
    warn!(
      "Multiple publishers matched \"{}\" (mapped from \"{}\"): {:?}",
      publisher_name, source, candidates
    );
  } else {
    info!("..Publisher found: {}", first.name);
  }

  Ok(Some(first.name.clone()))
}
