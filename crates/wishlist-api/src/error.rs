//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use wishlist_core::store::Outcome;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("authentication required")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] wishlist_core::Error),
}

impl From<wishlist_core::Error> for ApiError {
  fn from(e: wishlist_core::Error) -> Self {
    use wishlist_core::Error as E;
    match e {
      E::DuplicateWishlistId(_) | E::DuplicateGiftId(_) | E::DuplicatePublicLink(_) => {
        ApiError::Conflict(e.to_string())
      }
      E::GiftWishlistMismatch { .. } => ApiError::BadRequest(e.to_string()),
      E::IdsExhausted(_) | E::Backend(_) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}

/// Turn a store [`Outcome`] into a handler result; every no-op becomes an
/// error response naming its cause.
pub(crate) fn applied(outcome: Outcome) -> Result<(), ApiError> {
  match outcome {
    Outcome::Applied => Ok(()),
    Outcome::WishlistNotFound(id) => {
      Err(ApiError::NotFound(format!("wishlist {id} not found")))
    }
    Outcome::GiftNotFound(id) => Err(ApiError::NotFound(format!("gift {id} not found"))),
    Outcome::AlreadyReserved { gift_id, .. } => {
      Err(ApiError::Conflict(format!("gift {gift_id} is already reserved")))
    }
  }
}
