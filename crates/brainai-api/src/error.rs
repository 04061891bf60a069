//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("payload too large: {0}")]
  PayloadTooLarge(String),

  #[error("unsupported media type: {0}")]
  UnsupportedMediaType(String),

  #[error("not implemented: {0}")]
  NotImplemented(String),

  #[error("internal error: {0}")]
  Internal(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a store failure, logging it on the way out.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    tracing::error!(error = %e, "store error");
    ApiError::Store(Box::new(e))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
      ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
      ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
      ApiError::Internal(_) | ApiError::Io(_) | ApiError::Store(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }
}

impl From<brainai_core::Error> for ApiError {
  fn from(e: brainai_core::Error) -> Self {
    use brainai_core::Error as Core;
    match e {
      Core::AvatarTooLarge { .. } => ApiError::PayloadTooLarge(e.to_string()),
      Core::UnsupportedMediaType(_) => ApiError::UnsupportedMediaType(e.to_string()),
      e if e.is_validation() => ApiError::BadRequest(e.to_string()),
      e => ApiError::Internal(e.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      ApiError::BadRequest(m)
      | ApiError::NotFound(m)
      | ApiError::Conflict(m)
      | ApiError::PayloadTooLarge(m)
      | ApiError::UnsupportedMediaType(m)
      | ApiError::NotImplemented(m)
      | ApiError::Internal(m) => m.clone(),
      ApiError::Unauthorized => "sign in required".to_string(),
      ApiError::Io(e) => {
        tracing::error!(error = %e, "io error");
        "internal server error".to_string()
      }
      // Already logged by `ApiError::store`.
      ApiError::Store(_) => "internal server error".to_string(),
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if matches!(self, ApiError::Unauthorized) {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn core_errors_map_to_statuses() {
    use brainai_core::Error as Core;
    let cases = [
      (Core::EmptyField("title"), StatusCode::BAD_REQUEST),
      (Core::PasswordTooShort { min: 6 }, StatusCode::BAD_REQUEST),
      (Core::EmptyUpload, StatusCode::BAD_REQUEST),
      (Core::AvatarTooLarge { size: 3, max: 2 }, StatusCode::PAYLOAD_TOO_LARGE),
      (Core::UnsupportedMediaType("text/plain".into()), StatusCode::UNSUPPORTED_MEDIA_TYPE),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).status(), status);
    }
  }

  #[tokio::test]
  async fn store_failures_do_not_leak_details() {
    let err = ApiError::store(std::io::Error::other("UNIQUE constraint failed: accounts.email"));
    let res = err.into_response();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "internal server error");
  }

  #[test]
  fn unauthorized_carries_challenge() {
    let res = ApiError::Unauthorized.into_response();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
  }
}
