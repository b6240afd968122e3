//! Name, tag and organisation normalization.
//!
//! These follow the catalogue's own conventions so that imported records line up
//! with records created through the web interface.

use super::*;

/// Longest dataset name the catalogue accepts.
pub const MAX_NAME_LENGTH: usize = 100;
/// Shortest dataset name the catalogue accepts.
pub const MIN_NAME_LENGTH: usize = 2;

lazy_static! {
  static ref NAME_SEPARATORS: Regex = Regex::new(r"[ .:/]").unwrap();
  static ref NAME_DISALLOWED: Regex = Regex::new(r"[^a-z0-9_-]").unwrap();
  static ref TAG_DISALLOWED: Regex = Regex::new(r"[^a-z0-9_.-]").unwrap();
  static ref REPEATED_DASHES: Regex = Regex::new(r"-+").unwrap();
  static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Turns a title into a URL-safe dataset name.
///
/// The result is lowercase, uses `-` between words, is at most
/// [`MAX_NAME_LENGTH`] long and is padded with `_` to [`MIN_NAME_LENGTH`], so it is
/// never empty.
///
/// # Examples
///
/// ```
/// use onshub::naming::name_munge;
///
/// assert_eq!(name_munge("Labour Market Statistics"), "labour-market-statistics");
/// assert_eq!(name_munge("Crime: England & Wales"), "crime-england-wales");
/// assert_eq!(name_munge(""), "__");
/// ```
pub fn name_munge(title: &str) -> String {
  let name = ascii_fold(title).to_lowercase();
  let name = NAME_SEPARATORS.replace_all(&name, "-");
  let name = NAME_DISALLOWED.replace_all(&name, "");
  let name = REPEATED_DASHES.replace_all(&name, "-");
  let mut name: String = name.trim_matches('-').chars().take(MAX_NAME_LENGTH).collect();
  while name.len() < MIN_NAME_LENGTH {
    name.push('_');
  }
  name
}

/// Normalizes a keyword into a tag.
///
/// May return an empty or one-character string; callers decide what to keep.
///
/// ```
/// use onshub::naming::tag_munge;
///
/// assert_eq!(tag_munge(" Labour Market "), "labour-market");
/// assert_eq!(tag_munge("Prices (CPI)"), "prices-cpi");
/// ```
pub fn tag_munge(keyword: &str) -> String {
  let tag = ascii_fold(keyword.trim()).to_lowercase().replace(' ', "-");
  let tag = TAG_DISALLOWED.replace_all(&tag, "");
  let tag = REPEATED_DASHES.replace_all(&tag, "-");
  tag.trim_matches('-').to_string()
}

/// Canonical spelling of an organisation name, as used for publisher lookup.
///
/// Collapses whitespace, spells out `&`, straightens apostrophes and drops a
/// trailing full stop, then applies the configured alias table (matched without
/// regard to case).
///
/// ```
/// use std::collections::BTreeMap;
///
/// use onshub::naming::canonise_organisation_name;
///
/// let aliases = BTreeMap::from([("Health".to_string(), "Department of Health".to_string())]);
/// assert_eq!(canonise_organisation_name("  Health ", &aliases), "Department of Health");
/// assert_eq!(
///   canonise_organisation_name("Environment,  Food & Rural Affairs.", &aliases),
///   "Environment, Food and Rural Affairs"
/// );
/// ```
pub fn canonise_organisation_name(name: &str, aliases: &BTreeMap<String, String>) -> String {
  let name = WHITESPACE.replace_all(name.trim(), " ");
  let name = name.replace(" & ", " and ").replace(['\u{2018}', '\u{2019}'], "'");
  let name = name.trim_end_matches('.').trim().to_string();

  aliases
    .iter()
    .find(|(alias, _)| alias.eq_ignore_ascii_case(&name))
    .map(|(_, canonical)| canonical.clone())
    .unwrap_or(name)
}

/// Replaces common accented Latin letters with their ASCII base letter.
fn ascii_fold(text: &str) -> String {
  text
    .chars()
    .map(|c| match c {
      'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
      'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
      'ç' => 'c',
      'Ç' => 'C',
      'è' | 'é' | 'ê' | 'ë' => 'e',
      'È' | 'É' | 'Ê' | 'Ë' => 'E',
      'ì' | 'í' | 'î' | 'ï' => 'i',
      'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
      'ñ' => 'n',
      'Ñ' => 'N',
      'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
      'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => 'O',
      'ù' | 'ú' | 'û' | 'ü' => 'u',
      'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
      'ý' | 'ÿ' => 'y',
      'Ý' => 'Y',
      c => c,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_name_munge_rules() {
    assert_eq!(name_munge("Café Prices 2011/12"), "cafe-prices-2011-12");
    assert_eq!(name_munge("--Trade -- Balance--"), "trade-balance");
    assert_eq!(name_munge("£"), "__");
    assert_eq!(name_munge("x"), "x_");
    assert_eq!(name_munge(&"a".repeat(150)).len(), MAX_NAME_LENGTH);
  }

  #[test]
  fn test_tag_munge_may_be_short() {
    assert_eq!(tag_munge(""), "");
    assert_eq!(tag_munge(" - "), "");
    assert_eq!(tag_munge("A"), "a");
    assert_eq!(tag_munge("GDP 2.0"), "gdp-2.0");
  }

  #[test]
  fn test_canonise_without_alias() {
    let aliases = BTreeMap::new();
    assert_eq!(
      canonise_organisation_name("Office for Standards in Education, Children\u{2019}s Services", &aliases),
      "Office for Standards in Education, Children's Services"
    );
    assert_eq!(canonise_organisation_name("HM  Treasury", &aliases), "HM Treasury");
  }
}
