//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use teledok_core::{Error as DomainError, FieldError, store::StoreError};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Every violated rule of a rejected command.
  #[error("validation failed: {} rule(s) violated", .0.len())]
  Validation(Vec<FieldError>),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unsupported API version: {0}")]
  UnsupportedVersion(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error: domain failures keep their meaning, anything
  /// else is a server error.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    match e.into_domain() {
      Ok(domain) => domain.into(),
      Err(other) => Self::Store(Box::new(other)),
    }
  }
}

impl From<DomainError> for ApiError {
  fn from(e: DomainError) -> Self {
    match e {
      DomainError::Validation(errors) => Self::Validation(errors),
      e @ DomainError::NotFound { .. } => Self::NotFound(e.to_string()),
      e @ DomainError::LimitExceeded => Self::BadRequest(e.to_string()),
      other => Self::Store(Box::new(other)),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::Validation(errors) => {
        return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      e @ ApiError::UnsupportedVersion(_) => (StatusCode::BAD_REQUEST, e.to_string()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(message)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use teledok_core::Entity;

  use super::*;

  #[test]
  fn domain_errors_keep_their_status() {
    let cases = [
      (DomainError::Validation(vec![FieldError::new("Name", "required")]), StatusCode::BAD_REQUEST),
      (DomainError::not_found(Entity::Client, 4), StatusCode::NOT_FOUND),
      (DomainError::LimitExceeded, StatusCode::BAD_REQUEST),
      (DomainError::UnknownClientType(7), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).into_response().status(), status);
    }
  }

  #[test]
  fn unsupported_version_is_bad_request() {
    let resp = ApiError::UnsupportedVersion("9.0".into()).into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }
}
