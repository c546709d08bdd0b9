//! Request extractors that reject with [`ApiError`].

use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::error::ApiError;

/// A JSON request body. Malformed or mistyped bodies become
/// [`ApiError::BadRequest`], so clients always get an `{"error": ..}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}
