//! Error type for `teledok-store-sqlite`.

use teledok_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain failure: validation, missing record or the founder limit.
  #[error(transparent)]
  Core(teledok_core::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),
}

impl From<teledok_core::Error> for Error {
  fn from(e: teledok_core::Error) -> Self { Self::Core(e) }
}

/// Domain errors raised inside a connection closure travel through
/// `tokio_rusqlite::Error::Other`; unwrap them back into [`Error::Core`].
impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Other(inner) => match inner.downcast::<teledok_core::Error>() {
        Ok(core) => Self::Core(*core),
        Err(other) => Self::Database(tokio_rusqlite::Error::Other(other)),
      },
      other => Self::Database(other),
    }
  }
}

impl StoreError for Error {
  fn into_domain(self) -> std::result::Result<teledok_core::Error, Self> {
    match self {
      Self::Core(e) => Ok(e),
      other => Err(other),
    }
  }
}

/// Wrap a domain error so it can be returned from a connection closure.
pub(crate) fn domain(e: teledok_core::Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
