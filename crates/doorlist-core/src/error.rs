//! Error types for `doorlist-core`.

use thiserror::Error;

use crate::guest::CheckInStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// A required input was blank after trimming.
  #[error("required field missing: {0}")]
  MissingField(&'static str),

  /// The named host is not in the host directory.
  #[error("host not found: {0}")]
  HostNotFound(String),

  #[error("guest not found: {0}")]
  GuestNotFound(String),

  #[error("guest already exists: {0}")]
  DuplicateName(String),

  /// A guarded toggle saw a different status than the caller expected.
  #[error("guest {name} is {actual}, expected {expected}")]
  StaleStatus {
    name:     String,
    expected: CheckInStatus,
    actual:   CheckInStatus,
  },

  #[error("unknown {kind} value: {value:?}")]
  UnknownVariant { kind: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
