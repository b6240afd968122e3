//! Tag derivation.
//!
//! A record's tags come from two places: keywords spotted in its title and notes by
//! [`TagSuggester`], and the `;` separated vocabulary fields of the feed item,
//! collected with [`keyword_tags`].

use super::*;

/// Tags shorter than this are discarded.
pub const MIN_TAG_LENGTH: usize = 2;

/// Suggests tags for a record from a keyword vocabulary.
///
/// A keyword is suggested when it appears as a whole word (or phrase) in the
/// record's title or notes, ignoring case.
///
/// # Examples
///
/// ```
/// use onshub::tags::TagSuggester;
///
/// let suggester = TagSuggester::new(["labour market", "prices"]);
/// let tags = suggester.suggest("Labour Market Statistics", "Monthly labour market update");
/// assert_eq!(tags.into_iter().collect::<Vec<_>>(), ["labour-market"]);
/// ```
#[derive(Debug, Clone)]
pub struct TagSuggester {
  keywords: Vec<(Regex, String)>,
}

impl TagSuggester {
  /// Builds a suggester for the given keywords.
  pub fn new<I, S>(keywords: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>, {
    let keywords = keywords
      .into_iter()
      .filter_map(|keyword| {
        let keyword = keyword.as_ref().trim();
        let tag = naming::tag_munge(keyword);
        if tag.len() < MIN_TAG_LENGTH {
          return None;
        }
        let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
        Regex::new(&pattern).ok().map(|re| (re, tag))
      })
      .collect();
    Self { keywords }
  }

  /// Builds a suggester from the configured vocabulary.
  pub fn from_config(config: &Config) -> Self { Self::new(&config.suggested_tags) }

  /// Tags whose keyword appears in the title or notes.
  pub fn suggest(&self, title: &str, notes: &str) -> BTreeSet<String> {
    self
      .keywords
      .iter()
      .filter(|(pattern, _)| pattern.is_match(title) || pattern.is_match(notes))
      .map(|(_, tag)| tag.clone())
      .collect()
  }

  /// Tags suggested for a record.
  pub fn suggest_for(&self, record: &CatalogRecord) -> BTreeSet<String> {
    self.suggest(&record.title, &record.notes)
  }
}

/// Tags from `;` separated vocabulary fields.
///
/// Each token is normalized with [`naming::tag_munge`]; empty and one-character
/// results are dropped.
///
/// ```
/// use onshub::tags::keyword_tags;
///
/// let tags = keyword_tags(["Economy;Labour Market", "", "a; Economy "]);
/// assert_eq!(tags.into_iter().collect::<Vec<_>>(), ["economy", "labour-market"]);
/// ```
pub fn keyword_tags<'a>(fields: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
  fields
    .into_iter()
    .flat_map(|field| field.split(';'))
    .map(naming::tag_munge)
    .filter(|tag| tag.len() >= MIN_TAG_LENGTH)
    .collect()
}
