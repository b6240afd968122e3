//! Error types for the onshub library.
//!
//! Errors fall into three groups:
//! - Item errors, which abort a single feed item but not the feed
//! - Transport and catalogue errors, which are handed back to the caller untouched
//! - Local failures reading feeds and configuration
//!
//! Data-quality problems (odd dates, unsplittable titles, unknown publishers) are
//! not errors at all; they are logged with `tracing::warn!` and the record degrades.
//!
//! # Examples
//!
//! ```
//! use onshub::{error::OnsError, importer::guid_to_hub_id};
//!
//! let err = guid_to_hub_id("urn:1234", "http://www.statistics.gov.uk/hub/id/").unwrap_err();
//! assert!(matches!(err, OnsError::GuidPrefix { .. }));
//! assert!(err.is_item_error());
//! ```

use thiserror::Error;

/// Error type alias used for the [`onshub`](crate) crate.
pub type Result<T> = core::result::Result<T, OnsError>;

/// Errors that can occur while importing ONS hub feeds.
#[derive(Error, Debug)]
pub enum OnsError {
  /// An element outside the item field vocabulary appeared inside an `item`.
  ///
  /// The offending item is skipped; the feed reader carries on with the next one.
  #[error("Not expecting element {name} at level {level}")]
  UnexpectedElement {
    /// Qualified element name as it appeared in the feed
    name:  String,
    /// Nesting depth, where the root element is level 1
    level: usize,
  },

  /// An item guid did not start with the hub id prefix.
  #[error("GUID did not start with prefix {prefix:?}: {guid:?}")]
  GuidPrefix {
    /// The prefix every hub guid must carry
    prefix: String,
    /// The guid as found in the feed
    guid:   String,
  },

  /// An item guid still looked like a URL once the prefix was removed.
  #[error("GUID de-prefixed should not have 'http' in it still: {0:?}")]
  GuidResidualUrl(String),

  /// A network request to the catalogue failed.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The catalogue answered, but reported a failure.
  ///
  /// The string holds the error the CKAN action API returned.
  #[error("Catalog API error: {0}")]
  Api(String),

  /// The feed was not well-formed XML.
  #[error(transparent)]
  Xml(#[from] quick_xml::Error),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// A catalogue response or record could not be (de)serialized.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// A configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The catalogue base URL could not be parsed.
  #[error(transparent)]
  Url(#[from] url::ParseError),

  #[error("{0}")]
  #[allow(missing_docs)]
  Config(String),
}

impl OnsError {
  /// Whether this error only invalidates the item being processed.
  ///
  /// Item errors are reported and the import moves on to the next item. Every
  /// other error stops the import of the current feed.
  pub fn is_item_error(&self) -> bool {
    matches!(
      self,
      Self::UnexpectedElement { .. } | Self::GuidPrefix { .. } | Self::GuidResidualUrl(_)
    )
  }
}
