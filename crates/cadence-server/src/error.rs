//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The configured source cannot serve data.
  #[error("data source unavailable: {0}")]
  Unavailable(String),

  #[error("dataset error: {0}")]
  Dataset(#[source] cadence_core::Error),
}

impl From<cadence_core::Error> for ApiError {
  fn from(error: cadence_core::Error) -> Self {
    match error {
      cadence_core::Error::Source(inner)
        if inner.downcast_ref::<cadence_jira::Error>().is_some() =>
      {
        ApiError::Unavailable(inner.to_string())
      }
      cadence_core::Error::Quarter(e) => ApiError::BadRequest(e.to_string()),
      other => ApiError::Dataset(other),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, m.clone()),
      ApiError::Dataset(e) => {
        tracing::error!(error = %e, "dataset error");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
