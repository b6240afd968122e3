//! Publication date parsing.
//!
//! Hub feeds carry dates as free text, usually RFC 2822 (`Tue, 10 May 2011 09:30:00 GMT`)
//! but sometimes with the time missing or with only a month or year. [`PublicationDate`]
//! keeps track of how precise the text was so the record can say `2011-05` rather than
//! inventing a day.

use chrono::DateTime;

use super::*;

lazy_static! {
  /// "May 2011", "Sept 2011"
  static ref MONTH_YEAR: Regex = Regex::new(r"^(?i)([a-z]+)\.?,?\s+(\d{4})$").unwrap();
  /// "2011-05"
  static ref ISO_MONTH: Regex = Regex::new(r"^(\d{4})-(\d{1,2})$").unwrap();
  /// "2011"
  static ref YEAR: Regex = Regex::new(r"^(\d{4})$").unwrap();
  /// A leading weekday, "Tue, " or "Tuesday "
  static ref WEEKDAY: Regex =
    Regex::new(r"^(?i)(mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+").unwrap();
}

/// Day-level formats tried after RFC 2822, in order.
const DAY_FORMATS: [&str; 6] =
  ["%d %b %Y", "%d %B %Y", "%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// How much of a date the source text pinned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precision {
  /// Only the year
  Year,
  /// Year and month
  Month,
  /// A full calendar date
  Day,
}

/// A date parsed from feed text, at the precision the text allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicationDate {
  /// The date, with unknown month or day set to 1
  date:      NaiveDate,
  /// What the source text actually specified
  precision: Precision,
}

impl PublicationDate {
  /// Parses free text into a date, or `None` if nothing date-like was found.
  ///
  /// # Examples
  ///
  /// ```
  /// use onshub::dates::{Precision, PublicationDate};
  ///
  /// let date = PublicationDate::parse("Tue, 10 May 2011 09:30:00 GMT").unwrap();
  /// assert_eq!(date.isoformat(), "2011-05-10");
  ///
  /// let month = PublicationDate::parse("May 2011").unwrap();
  /// assert_eq!(month.precision(), Precision::Month);
  /// assert_eq!(month.isoformat(), "2011-05");
  /// assert_eq!(month.as_date().to_string(), "2011-05-01");
  /// ```
  pub fn parse(text: &str) -> Option<Self> {
    let text = text.trim();
    if text.is_empty() {
      return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc2822(text) {
      return Some(Self::day(datetime.date_naive()));
    }

    let without_weekday = WEEKDAY.replace(text, "");
    for format in DAY_FORMATS {
      if let Ok(date) = NaiveDate::parse_from_str(&without_weekday, format) {
        return Some(Self::day(date));
      }
    }
    // RFC 2822 dates with a time but an unusual zone, e.g. "10 May 2011 09:30 BST"
    let leading = without_weekday.split_whitespace().take(3).collect::<Vec<_>>().join(" ");
    if let Some(date) = parse_day_month_year(&leading) {
      return Some(Self::day(date));
    }

    if let Some(captures) = MONTH_YEAR.captures(&without_weekday) {
      let month = month_number(&captures[1])?;
      let year = captures[2].parse().ok()?;
      return NaiveDate::from_ymd_opt(year, month, 1)
        .map(|date| Self { date, precision: Precision::Month });
    }
    if let Some(captures) = ISO_MONTH.captures(text) {
      let year = captures[1].parse().ok()?;
      let month = captures[2].parse().ok()?;
      return NaiveDate::from_ymd_opt(year, month, 1)
        .map(|date| Self { date, precision: Precision::Month });
    }
    if let Some(captures) = YEAR.captures(text) {
      let year = captures[1].parse().ok()?;
      return NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|date| Self { date, precision: Precision::Year });
    }
    None
  }

  /// A date known to the day.
  fn day(date: NaiveDate) -> Self { Self { date, precision: Precision::Day } }

  /// The precision the source text carried.
  pub fn precision(&self) -> Precision { self.precision }

  /// Whether the text gave less than a full calendar date.
  pub fn is_approximate(&self) -> bool { self.precision < Precision::Day }

  /// The calendar date, with unknown parts defaulted to the first.
  pub fn as_date(&self) -> NaiveDate { self.date }

  /// ISO 8601 text at the parsed precision: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
  pub fn isoformat(&self) -> String {
    match self.precision {
      Precision::Year => format!("{:04}", self.date.year()),
      Precision::Month => format!("{:04}-{:02}", self.date.year(), self.date.month()),
      Precision::Day => self.date.format("%Y-%m-%d").to_string(),
    }
  }
}

impl Display for PublicationDate {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.isoformat())
  }
}

/// Parses "10 May 2011" or "10 September 2011".
fn parse_day_month_year(text: &str) -> Option<NaiveDate> {
  ["%d %b %Y", "%d %B %Y"]
    .into_iter()
    .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Month number from an English month name or an abbreviation of at least three letters.
fn month_number(name: &str) -> Option<u32> {
  const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
  ];
  let name = name.to_lowercase();
  if name.len() < 3 {
    return None;
  }
  MONTHS.iter().position(|month| month.starts_with(&name)).map(|index| index as u32 + 1)
}
