//! Errors raised by the command line tools.

use thiserror::Error;

/// Result alias for CLI operations.
pub type Result<T> = core::result::Result<T, CliError>;

/// Everything that can stop a command.
#[derive(Error, Debug)]
pub enum CliError {
  /// An import, lookup or catalogue call failed.
  #[error(transparent)]
  Onshub(#[from] onshub::error::OnsError),

  /// A confirmation prompt could not be shown.
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),

  /// A feed path pattern was malformed.
  #[error(transparent)]
  Glob(#[from] glob::PatternError),

  /// Reading or writing a local file failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}
