//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use wishlist_core::account::AccountError;

/// A [`ServerConfig`](crate::ServerConfig) value that cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("token_ttl_hours must be a positive number of hours, got {0}")]
  TokenTtl(i64),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed authorization header")]
  MalformedAuthorization,
  #[error("invalid or expired token")]
  InvalidToken,
  #[error(transparent)]
  Account(#[from] AccountError),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::MalformedAuthorization | Error::InvalidToken => StatusCode::UNAUTHORIZED,
      Error::Account(e) => match e {
        AccountError::Invalid(_) => StatusCode::BAD_REQUEST,
        AccountError::LoginTaken | AccountError::EmailTaken => StatusCode::CONFLICT,
        AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AccountError::UserNotFound(_) => StatusCode::NOT_FOUND,
        AccountError::Backend(_) => {
          tracing::error!(error = %e, "account store failure");
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
    };

    let mut res = (status, Json(json!({ "error": self.to_string() }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}
