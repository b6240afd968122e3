//! ONS hub feed importer for CKAN catalogues.
//!
//! `onshub` reads the RSS feeds published by the Office for National Statistics
//! publication hub and turns every feed item into a CKAN dataset record:
//!
//! - Streaming feed parsing into [`feed::RawItem`]s
//! - Title, notes, tag and extras derivation in [`importer`]
//! - Publisher lookup against the live catalogue in [`publisher`]
//! - Publication date and geographic coverage normalization
//! - A batch check of the known ONS producers in [`batch`]
//! - A filter that resets stray "national statistic" flags in [`filter`]
//!
//! # Getting Started
//!
//! ```no_run
//! use onshub::{catalog::CkanClient, config::Config, importer::OnsImporter, prelude::*};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let client = CkanClient::new("https://data.gov.uk/api")?;
//!   let importer = OnsImporter::new(client, Config::default());
//!
//!   let summary = importer
//!     .import_file("ons_data_7_days_to_2011-05-10.xml", |record| {
//!       match record {
//!         Ok(record) => println!("{}", record.name),
//!         Err(e) => eprintln!("skipped item: {e}"),
//!       }
//!       Ok(())
//!     })
//!     .await?;
//!   println!("{} of {} items imported", summary.imported, summary.items);
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`feed`]: XML feed reading
//! - [`importer`]: item to record transformation
//! - [`record`]: the CKAN record types produced
//! - [`catalog`]: the catalogue client capability and its implementations
//! - [`publisher`]: source agency to publisher resolution
//! - [`dates`], [`geo`], [`naming`], [`tags`]: controlled vocabularies
//! - [`batch`], [`filter`]: QA and maintenance tools
//! - [`config`], [`error`]: ambient configuration and error types

#![warn(missing_docs)]

use std::{
  collections::{BTreeMap, BTreeSet},
  fmt::Display,
  path::{Path, PathBuf},
  str::FromStr,
};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};
#[cfg(test)] use tracing_test::traced_test;

pub mod batch;
pub mod catalog;
pub mod config;
pub mod dates;
pub mod error;
pub mod feed;
pub mod filter;
pub mod geo;
pub mod importer;
pub mod naming;
pub mod publisher;
pub mod record;
pub mod tags;

use crate::{catalog::*, config::Config, error::*, feed::*, record::*};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use onshub::prelude::*;
///
/// async fn groups(client: &impl CatalogClient) -> Result<usize, OnsError> {
///   Ok(client.group_search("Office for National Statistics", true).await?.count)
/// }
/// ```
pub mod prelude {
  pub use crate::{catalog::CatalogClient, error::OnsError};
}
