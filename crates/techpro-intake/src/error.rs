//! Error types and axum `IntoResponse` implementation.
//!
//! Every failure is reported as `{"ok": false, "error": "<code>"}` so the
//! site's submission pipeline treats it as a failed delivery.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("request body is not valid JSON")]
  InvalidJson,
  #[error("name, details and message are required")]
  MissingFields,
  #[error("unauthorized")]
  Unauthorized,
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Machine-readable code placed in the `error` field.
  pub fn code(&self) -> &'static str {
    match self {
      Error::InvalidJson => "invalid_json",
      Error::MissingFields => "missing_fields",
      Error::Unauthorized => "unauthorized",
      Error::Store(_) => "store_error",
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      Error::InvalidJson | Error::MissingFields => StatusCode::BAD_REQUEST,
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    if let Error::Store(e) = &self {
      tracing::error!(error = %e, "inbox failure");
    }
    (self.status(), Json(json!({ "ok": false, "error": self.code() }))).into_response()
  }
}
