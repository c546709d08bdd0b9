//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use doorlist_core::{
  Error as Rejection,
  roster::RosterError,
  store::StoreError,
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// A domain rule refused the request.
  #[error(transparent)]
  Rejected(Rejection),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend error, surfacing any domain rejection it carries.
  pub fn store<E: StoreError>(e: E) -> Self {
    match e.rejection() {
      Some(rejection) => Self::Rejected(rejection.clone()),
      None => Self::Store(Box::new(e)),
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Rejected(r) => match r {
        Rejection::MissingField(_)
        | Rejection::HostNotFound(_)
        | Rejection::UnknownVariant { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Rejection::GuestNotFound(_) => StatusCode::NOT_FOUND,
        Rejection::DuplicateName(_) | Rejection::StaleStatus { .. } => {
          StatusCode::CONFLICT
        }
      },
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<Rejection> for ApiError {
  fn from(e: Rejection) -> Self { Self::Rejected(e) }
}

impl<E: StoreError> From<RosterError<E>> for ApiError {
  fn from(e: RosterError<E>) -> Self {
    match e {
      RosterError::Invalid(e) => Self::Rejected(e),
      RosterError::Store(e) => Self::store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::debug!(error = %self, %status, "request rejected");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
