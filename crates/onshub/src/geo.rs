//! Geographic coverage coding.
//!
//! The catalogue stores coverage as a fixed-width region bitmask followed by the
//! region names, e.g. `"111100: England, Scotland, Wales, Northern Ireland"`.

use super::*;

/// Regions of the coverage bitmask, in bit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Region {
  #[allow(missing_docs)]
  England,
  #[allow(missing_docs)]
  Scotland,
  #[allow(missing_docs)]
  Wales,
  #[allow(missing_docs)]
  NorthernIreland,
  /// Overseas territories
  Overseas,
  /// Worldwide coverage
  Global,
}

impl Region {
  /// Every region, in bitmask order.
  pub const ALL: [Region; 6] = [
    Region::England,
    Region::Scotland,
    Region::Wales,
    Region::NorthernIreland,
    Region::Overseas,
    Region::Global,
  ];

  /// Display name of the region.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::England => "England",
      Self::Scotland => "Scotland",
      Self::Wales => "Wales",
      Self::NorthernIreland => "Northern Ireland",
      Self::Overseas => "Overseas",
      Self::Global => "Global",
    }
  }
}

/// Regions of the United Kingdom.
const UNITED_KINGDOM: &[Region] =
  &[Region::England, Region::Scotland, Region::Wales, Region::NorthernIreland];
/// Regions of Great Britain.
const GREAT_BRITAIN: &[Region] = &[Region::England, Region::Scotland, Region::Wales];

lazy_static! {
  /// Phrases recognised in coverage text and the regions each stands for.
  static ref REGION_PATTERNS: Vec<(Regex, Vec<Region>)> = vec![
    (Regex::new(r"(?i)\b(uk|united kingdom)\b").unwrap(), UNITED_KINGDOM.to_vec()),
    (Regex::new(r"(?i)\b(gb|great britain)\b").unwrap(), GREAT_BRITAIN.to_vec()),
    (Regex::new(r"(?i)\bengland\b").unwrap(), vec![Region::England]),
    (Regex::new(r"(?i)\bscotland\b").unwrap(), vec![Region::Scotland]),
    (Regex::new(r"(?i)\bwales\b").unwrap(), vec![Region::Wales]),
    (Regex::new(r"(?i)\bnorthern ireland\b").unwrap(), vec![Region::NorthernIreland]),
    (Regex::new(r"(?i)\boverseas\b").unwrap(), vec![Region::Overseas]),
    (Regex::new(r"(?i)\b(global|worldwide)\b").unwrap(), vec![Region::Global]),
  ];
}

/// A set of covered regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoCoverage {
  regions: BTreeSet<Region>,
}

impl GeoCoverage {
  /// Recognises region names and common groupings in free text.
  ///
  /// # Examples
  ///
  /// ```
  /// use onshub::geo::GeoCoverage;
  ///
  /// assert_eq!(GeoCoverage::from_text("England and Wales").to_db(), "101000: England, Wales");
  /// assert_eq!(GeoCoverage::from_text("").to_db(), "000000: ");
  /// ```
  pub fn from_text(text: &str) -> Self {
    let regions = REGION_PATTERNS
      .iter()
      .filter(|(pattern, _)| pattern.is_match(text))
      .flat_map(|(_, regions)| regions.iter().copied())
      .collect();
    Self { regions }
  }

  /// Codes the hub coverage text, reading "International" as "Global".
  pub fn from_hub_coverage(text: &str) -> Self {
    Self::from_text(&text.replace("International", "Global"))
  }

  /// Whether `region` is covered.
  pub fn contains(&self, region: Region) -> bool { self.regions.contains(&region) }

  /// The catalogue representation: bitmask, `": "`, then the region names.
  pub fn to_db(&self) -> String {
    let bits: String =
      Region::ALL.iter().map(|region| if self.contains(*region) { '1' } else { '0' }).collect();
    let names: Vec<&str> = self.regions.iter().map(Region::as_str).collect();
    format!("{}: {}", bits, names.join(", "))
  }
}
