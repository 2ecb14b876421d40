//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Not-found renders as `{"message": ...}` with 404; everything else —
/// constraint violations included — as `{"error": ...}` with 500.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("No user with that ID")]
  UserNotFound,

  #[error("No thought with that ID")]
  ThoughtNotFound,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match &self {
      ApiError::UserNotFound | ApiError::ThoughtNotFound => (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": self.to_string() })),
      )
        .into_response(),
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response(),
    }
  }
}
