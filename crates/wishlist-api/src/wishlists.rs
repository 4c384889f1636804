//! Handlers for `/wishlists` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/wishlists` | Visible wishlists; optional `?owner=<login>` |
//! | `POST`   | `/wishlists` | Body: [`NewWishlistBody`]; returns 201 + stored wishlist |
//! | `GET`    | `/wishlists/by-link` | `?link=<public link>`; 404 if none |
//! | `GET`    | `/wishlists/:id` | 404 if missing or private to someone else |
//! | `PUT`    | `/wishlists/:id` | Body: [`UpdateWishlistBody`]; owner only |
//! | `DELETE` | `/wishlists/:id` | Owner only; removes its gifts too |
//! | `POST`   | `/wishlists/:id/regenerate-link` | Owner only; public wishlists only |
//! | `GET`    | `/wishlists/:id/gifts` | Gifts in display order |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use rand_core::{OsRng, RngCore};
use serde::Deserialize;
use tracing::info;
use wishlist_core::{
  gift::Gift,
  store::WishlistStore,
  wishlist::{Visibility, Wishlist, WishlistId},
};

use crate::{
  caller::{Caller, can_view, owned_wishlist, visible_wishlist},
  error::{ApiError, applied},
  validate,
};

/// How many fresh public links to try before giving up.
const LINK_ATTEMPTS: usize = 8;

/// A shareable link of the form `https://wishlistapp.com/share/NNNNNN`.
fn generate_public_link() -> String {
  let n = 100_000 + OsRng.next_u32() % 900_000;
  format!("https://wishlistapp.com/share/{n}")
}

/// Run `save` with fresh public links until one is not already taken.
fn with_fresh_link<R>(
  mut save: impl FnMut(Visibility) -> wishlist_core::Result<R>,
) -> Result<R, ApiError> {
  for _ in 0..LINK_ATTEMPTS {
    match save(Visibility::Public { public_link: generate_public_link() }) {
      Err(wishlist_core::Error::DuplicatePublicLink(_)) => continue,
      other => return Ok(other?),
    }
  }
  Err(ApiError::Conflict("could not allocate a unique public link".into()))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Only wishlists owned by this login.
  pub owner: Option<String>,
}

/// `GET /wishlists[?owner=<login>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  caller: Option<Caller>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Wishlist>>, ApiError>
where
  S: WishlistStore,
{
  let mut wishlists = store.list_wishlists()?;
  wishlists.retain(|w| can_view(caller.as_ref(), w));
  if let Some(owner) = &params.owner {
    wishlists.retain(|w| w.is_owned_by(owner));
  }
  Ok(Json(wishlists))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /wishlists`. The owner is always the caller.
#[derive(Debug, Deserialize)]
pub struct NewWishlistBody {
  pub title:       String,
  #[serde(default)]
  pub description: String,
  pub event_date:  NaiveDate,
  #[serde(default)]
  pub is_private:  bool,
}

impl NewWishlistBody {
  fn validate(&self) -> Result<(), ApiError> {
    validate::length("title", &self.title, 1, 100)?;
    validate::length("description", &self.description, 0, 2000)
  }
}

/// `POST /wishlists` — returns 201 + the stored [`Wishlist`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<NewWishlistBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WishlistStore,
{
  body.validate()?;
  let id = store.next_wishlist_id()?;
  let build = |visibility| Wishlist {
    id,
    title: body.title.trim().to_owned(),
    owner_name: caller.login.clone(),
    event_date: body.event_date,
    description: body.description.trim().to_owned(),
    visibility,
    gifts: Vec::new(),
  };

  let wishlist = if body.is_private {
    let wishlist = build(Visibility::Private);
    store.add_wishlist(wishlist.clone())?;
    wishlist
  } else {
    with_fresh_link(|visibility| {
      let wishlist = build(visibility);
      store.add_wishlist(wishlist.clone()).map(|()| wishlist)
    })?
  };

  info!(wishlist_id = %id, owner = %caller.login, "wishlist created");
  Ok((StatusCode::CREATED, Json(wishlist)))
}

// ─── Lookup by public link ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LinkParams {
  pub link: String,
}

/// `GET /wishlists/by-link?link=<public link>` — no authentication needed; the
/// link itself grants read access.
pub async fn by_link<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<LinkParams>,
) -> Result<Json<Wishlist>, ApiError>
where
  S: WishlistStore,
{
  let link = params.link.trim();
  store
    .find_wishlist_by_public_link(link)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("no wishlist is shared as {link:?}")))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /wishlists/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  caller: Option<Caller>,
  Path(id): Path<WishlistId>,
) -> Result<Json<Wishlist>, ApiError>
where
  S: WishlistStore,
{
  Ok(Json(visible_wishlist(store.as_ref(), id, caller.as_ref())?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /wishlists/:id`. Absent fields keep their value.
///
/// Turning a private wishlist public gives it a fresh link; turning a public
/// one private drops its link.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWishlistBody {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub event_date:  Option<NaiveDate>,
  pub is_private:  Option<bool>,
}

impl UpdateWishlistBody {
  fn validate(&self) -> Result<(), ApiError> {
    if let Some(title) = &self.title {
      validate::length("title", title, 1, 100)?;
    }
    if let Some(description) = &self.description {
      validate::length("description", description, 0, 2000)?;
    }
    Ok(())
  }
}

/// `PUT /wishlists/:id` — returns the updated wishlist.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<WishlistId>,
  Json(body): Json<UpdateWishlistBody>,
) -> Result<Json<Wishlist>, ApiError>
where
  S: WishlistStore,
{
  body.validate()?;
  let current = owned_wishlist(store.as_ref(), id, &caller)?;

  let mut next = current.clone();
  if let Some(title) = &body.title {
    next.title = title.trim().to_owned();
  }
  if let Some(description) = &body.description {
    next.description = description.trim().to_owned();
  }
  if let Some(event_date) = body.event_date {
    next.event_date = event_date;
  }

  let outcome = match body.is_private {
    Some(true) => store.update_wishlist(Wishlist { visibility: Visibility::Private, ..next })?,
    Some(false) if current.is_private() => with_fresh_link(|visibility| {
      store.update_wishlist(Wishlist { visibility, ..next.clone() })
    })?,
    _ => store.update_wishlist(next)?,
  };
  applied(outcome)?;

  info!(wishlist_id = %id, owner = %caller.login, "wishlist updated");
  Ok(Json(visible_wishlist(store.as_ref(), id, Some(&caller))?))
}

// ─── Regenerate link ──────────────────────────────────────────────────────────

/// `POST /wishlists/:id/regenerate-link` — replaces the public link, so the
/// old one stops resolving. Returns the updated wishlist.
pub async fn regenerate_link<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<WishlistId>,
) -> Result<Json<Wishlist>, ApiError>
where
  S: WishlistStore,
{
  let current = owned_wishlist(store.as_ref(), id, &caller)?;
  if current.is_private() {
    return Err(ApiError::BadRequest(format!(
      "wishlist {id} is private and has no public link"
    )));
  }

  applied(with_fresh_link(|visibility| {
    store.update_wishlist(Wishlist { visibility, ..current.clone() })
  })?)?;

  info!(wishlist_id = %id, "public link regenerated");
  Ok(Json(visible_wishlist(store.as_ref(), id, Some(&caller))?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /wishlists/:id` — 204 on success.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<WishlistId>,
) -> Result<StatusCode, ApiError>
where
  S: WishlistStore,
{
  owned_wishlist(store.as_ref(), id, &caller)?;
  applied(store.delete_wishlist(id)?)?;
  info!(wishlist_id = %id, owner = %caller.login, "wishlist deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Gifts of a wishlist ──────────────────────────────────────────────────────

/// `GET /wishlists/:id/gifts`
pub async fn gifts<S>(
  State(store): State<Arc<S>>,
  caller: Option<Caller>,
  Path(id): Path<WishlistId>,
) -> Result<Json<Vec<Gift>>, ApiError>
where
  S: WishlistStore,
{
  visible_wishlist(store.as_ref(), id, caller.as_ref())?;
  Ok(Json(store.list_gifts_of(id)?))
}
