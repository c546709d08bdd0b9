//! Error type for `doorlist-store-sqlite`.

use doorlist_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain rejection: unknown host, duplicate name, missing guest, or an
  /// unparseable enum column.
  #[error(transparent)]
  Core(#[from] doorlist_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl StoreError for Error {
  fn rejection(&self) -> Option<&doorlist_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
