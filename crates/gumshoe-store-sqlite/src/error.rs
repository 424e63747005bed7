//! Error type for `gumshoe-store-sqlite`.

use gumshoe_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain failure (guard violation, missing entity, bad input). The
  /// surrounding transaction has been rolled back.
  #[error(transparent)]
  Core(#[from] gumshoe_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("stored difficulty out of range: {0}")]
  DifficultyRange(i64),
}

impl Error {
  /// The recoverable category, for the presentation layer. Database and
  /// decode failures are opaque internals.
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::Database(_)
      | Self::Uuid(_)
      | Self::DateParse(_)
      | Self::DifficultyRange(_) => ErrorKind::Internal,
    }
  }
}

impl gumshoe_core::Classify for Error {
  fn kind(&self) -> ErrorKind { Error::kind(self) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
