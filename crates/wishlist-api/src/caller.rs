//! The authenticated caller, and who may see what.
//!
//! This crate does not authenticate anyone. An outer layer resolves the
//! request's credentials and inserts a [`Caller`] into the request
//! extensions; handlers pick it up with the extractors below.

use std::convert::Infallible;

use axum::{
  extract::{FromRequestParts, OptionalFromRequestParts},
  http::request::Parts,
};
use wishlist_core::{
  store::WishlistStore,
  wishlist::{Wishlist, WishlistId},
};

use crate::error::ApiError;

/// The user a request was made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
  pub user_id: i64,
  /// Matches `Wishlist::owner_name` and `GiftStatus::Reserved::reserved_by`.
  pub login:   String,
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Caller>()
      .cloned()
      .ok_or(ApiError::Unauthorized)
  }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for Caller {
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _: &S,
  ) -> Result<Option<Self>, Self::Rejection> {
    Ok(parts.extensions.get::<Caller>().cloned())
  }
}

/// Public wishlists are visible to everyone; private ones only to their owner.
pub fn can_view(caller: Option<&Caller>, wishlist: &Wishlist) -> bool {
  !wishlist.is_private() || caller.is_some_and(|c| wishlist.is_owned_by(&c.login))
}

/// Fetch a wishlist the caller may see. Invisible wishlists are reported as
/// missing rather than forbidden, so their existence does not leak.
pub(crate) fn visible_wishlist<S: WishlistStore>(
  store: &S,
  id: WishlistId,
  caller: Option<&Caller>,
) -> Result<Wishlist, ApiError> {
  store
    .get_wishlist(id)?
    .filter(|w| can_view(caller, w))
    .ok_or_else(|| ApiError::NotFound(format!("wishlist {id} not found")))
}

/// Fetch a wishlist the caller owns.
pub(crate) fn owned_wishlist<S: WishlistStore>(
  store: &S,
  id: WishlistId,
  caller: &Caller,
) -> Result<Wishlist, ApiError> {
  let wishlist = visible_wishlist(store, id, Some(caller))?;
  if !wishlist.is_owned_by(&caller.login) {
    return Err(ApiError::Forbidden(format!(
      "wishlist {id} belongs to another user"
    )));
  }
  Ok(wishlist)
}
