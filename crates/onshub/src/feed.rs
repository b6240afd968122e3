//! ONS hub RSS feed reading.
//!
//! The hub publishes an RSS document per period:
//!
//! ```xml
//! <rss xmlns:hub="http://www.statistics.gov.uk/hub">
//!   <channel>
//!     <title>ONS hub</title>
//!     <item>
//!       <title>Labour Market Statistics - May 2011</title>
//!       <pubDate>Tue, 10 May 2011</pubDate>
//!       <guid>http://www.statistics.gov.uk/hub/id/1234</guid>
//!       <hub:source-agency>Office for National Statistics</hub:source-agency>
//!     </item>
//!   </channel>
//! </rss>
//! ```
//!
//! [`FeedReader`] pulls events from `quick-xml` and yields one [`RawItem`] per
//! non-empty `item` element, in document order.

use std::{
  fs::File,
  io::{BufRead, BufReader},
};

use quick_xml::{
  events::{BytesStart, Event},
  Reader,
};

use super::*;

/// Depth of the `item` elements below the root.
const ITEM_LEVEL: usize = 3;
/// Depth of the item field elements.
const FIELD_LEVEL: usize = 4;

/// The fixed vocabulary of item fields.
///
/// Fields are matched on the element's local name, so `hub:source-agency` and
/// `source-agency` are the same field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
  /// Item title, usually "Series - Release"
  Title,
  /// Download link
  Link,
  /// Free text description
  Description,
  /// Publication date text
  PubDate,
  /// Hub guid URL
  Guid,
  /// Producing department or agency
  #[serde(rename = "source-agency")]
  SourceAgency,
  /// Hub theme, used as the record categories
  Theme,
  /// Geographic coverage text
  Coverage,
  /// Designation, e.g. "National Statistics"
  Designation,
  /// Geographic granularity text
  #[serde(rename = "geographic-breakdown")]
  GeographicBreakdown,
  /// Integrated Public Sector Vocabulary terms, `;` separated
  Ipsv,
  /// Free keywords, `;` separated
  Keywords,
  /// Alternative title
  AltTitle,
  /// Publication language
  Language,
  /// National Statistics Classification terms, `;` separated
  Nscl,
}

impl Field {
  /// Every field, in feed order.
  pub const ALL: [Field; 15] = [
    Field::Title,
    Field::Link,
    Field::Description,
    Field::PubDate,
    Field::Guid,
    Field::SourceAgency,
    Field::Theme,
    Field::Coverage,
    Field::Designation,
    Field::GeographicBreakdown,
    Field::Ipsv,
    Field::Keywords,
    Field::AltTitle,
    Field::Language,
    Field::Nscl,
  ];

  /// The element local name for this field.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Title => "title",
      Self::Link => "link",
      Self::Description => "description",
      Self::PubDate => "pubDate",
      Self::Guid => "guid",
      Self::SourceAgency => "source-agency",
      Self::Theme => "theme",
      Self::Coverage => "coverage",
      Self::Designation => "designation",
      Self::GeographicBreakdown => "geographic-breakdown",
      Self::Ipsv => "ipsv",
      Self::Keywords => "keywords",
      Self::AltTitle => "altTitle",
      Self::Language => "language",
      Self::Nscl => "nscl",
    }
  }
}

impl Display for Field {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Field {
  type Err = ();

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    Self::ALL.into_iter().find(|field| field.as_str() == s).ok_or(())
  }
}

/// The text fields of one feed item.
///
/// Fields missing from the feed read as the empty string through [`RawItem::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawItem {
  fields: BTreeMap<Field, String>,
}

impl RawItem {
  /// Creates an empty item.
  pub fn new() -> Self { Self::default() }

  /// Builder-style setter, mostly for tests and fixtures.
  pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
    self.insert(field, value);
    self
  }

  /// Sets a field, replacing any previous value.
  pub fn insert(&mut self, field: Field, value: impl Into<String>) {
    self.fields.insert(field, value.into());
  }

  /// The field text, or `""` when the feed did not carry the field.
  pub fn get(&self, field: Field) -> &str { self.fields.get(&field).map_or("", String::as_str) }

  /// The field text if the feed carried the field at all.
  pub fn field(&self, field: Field) -> Option<&str> { self.fields.get(&field).map(String::as_str) }

  /// Number of fields collected.
  pub fn len(&self) -> usize { self.fields.len() }

  /// Whether no field was collected.
  pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

/// Lazy reader over the items of one feed document.
///
/// The reader tracks the element depth and the field being collected. Structure
/// problems outside items are logged and skipped. An unknown element inside an
/// item yields [`OnsError::UnexpectedElement`] and drops that item only. XML
/// syntax and I/O errors end the iteration after being yielded once.
///
/// # Examples
///
/// ```
/// use onshub::feed::{Field, FeedReader};
///
/// let xml = r#"<rss><channel>
///   <item><title>Retail Sales - April 2011</title></item>
///   <item></item>
///   <item><title>Crime in England and Wales</title></item>
/// </channel></rss>"#;
///
/// let titles: Vec<String> = FeedReader::from_str(xml)
///   .map(|item| item.unwrap().get(Field::Title).to_string())
///   .collect();
/// assert_eq!(titles, ["Retail Sales - April 2011", "Crime in England and Wales"]);
/// ```
pub struct FeedReader<R> {
  /// Underlying pull parser
  reader:   Reader<R>,
  /// Event buffer reused between reads
  buf:      Vec<u8>,
  /// Current element depth, the root element being 1
  level:    usize,
  /// Whether the current level 3 element is an `item`
  in_item:  bool,
  /// Set once the current item hit an unexpected element
  skipping: bool,
  /// Fields collected so far for the current item
  item:     RawItem,
  /// Field being collected and its text so far
  current:  Option<(Field, String)>,
  /// Set after end of document or a fatal error
  finished: bool,
}

/// One parser step with the event data copied out of the buffer.
enum Step {
  Open(String, String),
  Close,
  Empty(String, String),
  Text(String),
  Skip,
  Eof,
  Fail(OnsError),
}

impl FeedReader<BufReader<File>> {
  /// Opens a feed file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let file = File::open(path)?;
    Ok(Self::new(BufReader::new(file)))
  }
}

impl<'a> FeedReader<&'a [u8]> {
  /// Reads a feed held in memory.
  #[allow(clippy::should_implement_trait)]
  pub fn from_str(xml: &'a str) -> Self { Self::new(xml.as_bytes()) }
}

impl<R: BufRead> FeedReader<R> {
  /// Wraps any buffered reader holding a feed document.
  pub fn new(source: R) -> Self {
    Self {
      reader:   Reader::from_reader(source),
      buf:      Vec::new(),
      level:    0,
      in_item:  false,
      skipping: false,
      item:     RawItem::new(),
      current:  None,
      finished: false,
    }
  }

  /// Reads the next event, copying what we need out of the shared buffer.
  fn step(&mut self) -> Step {
    let collecting = self.current.is_some();
    let step = match self.reader.read_event_into(&mut self.buf) {
      Ok(Event::Start(e)) => {
        let (local, qualified) = names(&e);
        Step::Open(local, qualified)
      },
      Ok(Event::Empty(e)) => {
        let (local, qualified) = names(&e);
        Step::Empty(local, qualified)
      },
      Ok(Event::End(_)) => Step::Close,
      Ok(Event::Text(e)) if collecting => match e.unescape() {
        Ok(text) => Step::Text(text.into_owned()),
        Err(e) => Step::Fail(quick_xml::Error::from(e).into()),
      },
      Ok(Event::CData(e)) if collecting => Step::Text(String::from_utf8_lossy(&e).into_owned()),
      Ok(Event::Eof) => Step::Eof,
      Ok(_) => Step::Skip,
      Err(e) => Step::Fail(e.into()),
    };
    self.buf.clear();
    step
  }

  /// Handles an element start.
  fn open(&mut self, local: &str, qualified: &str) -> Result<()> {
    self.level += 1;
    match self.level {
      1 if local != "rss" => warn!("Not expecting element {} at level {}", qualified, self.level),
      2 if local != "channel" => {
        warn!("Not expecting element {} at level {}", qualified, self.level)
      },
      ITEM_LEVEL => {
        self.in_item = local == "item";
        self.skipping = false;
        self.item = RawItem::new();
      },
      FIELD_LEVEL if self.in_item && !self.skipping => match local.parse::<Field>() {
        Ok(field) => self.current = Some((field, String::new())),
        Err(()) => {
          self.skipping = true;
          return Err(OnsError::UnexpectedElement {
            name:  qualified.to_string(),
            level: self.level,
          });
        },
      },
      _ => trace!("Ignoring element {} at level {}", qualified, self.level),
    }
    Ok(())
  }

  /// Handles an element end, returning a finished item when one closes.
  fn close(&mut self) -> Option<RawItem> {
    let mut finished = None;
    match self.level {
      ITEM_LEVEL => {
        let item = std::mem::take(&mut self.item);
        if self.in_item && !self.skipping && !item.is_empty() {
          finished = Some(item);
        }
        self.in_item = false;
        self.skipping = false;
      },
      FIELD_LEVEL =>
        if let Some((field, text)) = self.current.take() {
          self.item.insert(field, text);
        },
      _ => (),
    }
    self.level = self.level.saturating_sub(1);
    finished
  }
}

impl<R: BufRead> Iterator for FeedReader<R> {
  type Item = Result<RawItem>;

  fn next(&mut self) -> Option<Self::Item> {
    while !self.finished {
      match self.step() {
        Step::Open(local, qualified) =>
          if let Err(e) = self.open(&local, &qualified) {
            return Some(Err(e));
          },
        Step::Empty(local, qualified) => {
          let opened = self.open(&local, &qualified);
          let closed = self.close();
          if let Err(e) = opened {
            return Some(Err(e));
          }
          if let Some(item) = closed {
            return Some(Ok(item));
          }
        },
        Step::Close =>
          if let Some(item) = self.close() {
            return Some(Ok(item));
          },
        Step::Text(text) =>
          if self.level == FIELD_LEVEL {
            if let Some((_, buffer)) = self.current.as_mut() {
              buffer.push_str(&text);
            }
          },
        Step::Skip => (),
        Step::Eof => self.finished = true,
        Step::Fail(e) => {
          self.finished = true;
          return Some(Err(e));
        },
      }
    }
    None
  }
}

/// Local and qualified names of an element.
fn names(e: &BytesStart) -> (String, String) {
  (
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
    String::from_utf8_lossy(e.name().as_ref()).into_owned(),
  )
}
