//! Bearer-token middleware.
//!
//! Requests without an `Authorization` header pass through anonymously.
//! A `Bearer` token that resolves to a user attaches a [`Caller`] (and the
//! full [`User`]) to the request extensions; any other header is rejected.

use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::Response,
};
use wishlist_api::Caller;
use wishlist_core::{account::AccountStore, store::WishlistStore};

use crate::{AppState, error::Error};

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// `Ok(None)` means no header was sent at all.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, Error> {
  let Some(value) = headers.get(header::AUTHORIZATION) else {
    return Ok(None);
  };
  let value = value.to_str().map_err(|_| Error::MalformedAuthorization)?;

  let (scheme, token) = value
    .split_once(' ')
    .ok_or(Error::MalformedAuthorization)?;
  let token = token.trim();
  if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
    return Err(Error::MalformedAuthorization);
  }
  Ok(Some(token))
}

pub async fn bearer<S, A>(
  State(state): State<AppState<S, A>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error>
where
  S: WishlistStore + 'static,
  A: AccountStore + 'static,
{
  let token = bearer_token(req.headers())?.map(str::to_owned);

  if let Some(token) = token {
    let user = state
      .accounts
      .resolve_token(&token)
      .await?
      .ok_or(Error::InvalidToken)?;
    tracing::debug!(user_id = user.user_id, login = %user.login, "bearer accepted");
    req.extensions_mut().insert(Caller {
      user_id: user.user_id,
      login:   user.login.clone(),
    });
    req.extensions_mut().insert(user);
  }

  Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn no_header_is_anonymous() {
    assert!(matches!(bearer_token(&HeaderMap::new()), Ok(None)));
  }

  #[test]
  fn bearer_scheme_any_case() {
    assert_eq!(bearer_token(&headers("Bearer abc")).unwrap(), Some("abc"));
    assert_eq!(bearer_token(&headers("bearer  abc ")).unwrap(), Some("abc"));
  }

  #[test]
  fn other_schemes_rejected() {
    assert!(bearer_token(&headers("Basic dXNlcjpwYXNz")).is_err());
    assert!(bearer_token(&headers("Bearer")).is_err());
    assert!(bearer_token(&headers("Bearer   ")).is_err());
  }
}
