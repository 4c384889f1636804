//! Handlers for `/gifts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/gifts` | Every visible gift; optional `?status=available\|reserved` |
//! | `POST`   | `/gifts` | Body: [`NewGiftBody`]; owner of the wishlist only; 201 |
//! | `GET`    | `/gifts/:id` | 404 if missing or in a private wishlist of someone else |
//! | `PUT`    | `/gifts/:id` | Body: [`UpdateGiftBody`]; owner only |
//! | `DELETE` | `/gifts/:id` | Owner only |

use std::{collections::HashSet, sync::Arc};

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use wishlist_core::{
  gift::{Gift, GiftId, GiftStatus, StatusKind},
  store::WishlistStore,
  wishlist::WishlistId,
};

use crate::{
  caller::{Caller, can_view, owned_wishlist, visible_wishlist},
  error::{ApiError, applied},
  validate,
};

/// Fetch a gift whose wishlist the caller may see.
pub(crate) fn visible_gift<S: WishlistStore>(
  store: &S,
  id: GiftId,
  caller: Option<&Caller>,
) -> Result<Gift, ApiError> {
  let not_found = || ApiError::NotFound(format!("gift {id} not found"));
  let gift = store.get_gift(id)?.ok_or_else(not_found)?;
  visible_wishlist(store, gift.wishlist_id, caller).map_err(|_| not_found())?;
  Ok(gift)
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<StatusKind>,
}

/// `GET /gifts[?status=<available|reserved>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  caller: Option<Caller>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Gift>>, ApiError>
where
  S: WishlistStore,
{
  let visible: HashSet<WishlistId> = store
    .list_wishlists()?
    .iter()
    .filter(|w| can_view(caller.as_ref(), w))
    .map(|w| w.id)
    .collect();

  let mut gifts = store.list_all_gifts()?;
  gifts.retain(|g| visible.contains(&g.wishlist_id));
  if let Some(kind) = params.status {
    gifts.retain(|g| g.status.kind() == kind);
  }
  Ok(Json(gifts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /gifts`.
#[derive(Debug, Deserialize)]
pub struct NewGiftBody {
  pub wishlist_id: WishlistId,
  pub name:        String,
  /// Free text, e.g. "1 990 ₽".
  #[serde(default)]
  pub price:       String,
  #[serde(default)]
  pub description: String,
  pub link:        Option<String>,
}

impl NewGiftBody {
  fn validate(&self) -> Result<(), ApiError> {
    validate::length("name", &self.name, 1, 150)?;
    validate::length("price", &self.price, 0, 50)?;
    validate::length("description", &self.description, 0, 2000)?;
    validate::link(self.link.as_deref())
  }
}

/// `POST /gifts` — returns 201 + the stored [`Gift`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Json(body): Json<NewGiftBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WishlistStore,
{
  body.validate()?;
  let wishlist = owned_wishlist(store.as_ref(), body.wishlist_id, &caller)?;

  let gift = Gift {
    id:          store.next_gift_id()?,
    wishlist_id: wishlist.id,
    name:        body.name.trim().to_owned(),
    price:       body.price.trim().to_owned(),
    description: body.description.trim().to_owned(),
    link:        body.link.map(|l| l.trim().to_owned()),
    owner_name:  wishlist.owner_name,
    created:     Utc::now().date_naive(),
    status:      GiftStatus::Available,
  };

  applied(store.add_gift(gift.clone())?)?;
  info!(gift_id = %gift.id, wishlist_id = %gift.wishlist_id, "gift added");
  Ok((StatusCode::CREATED, Json(gift)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /gifts/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  caller: Option<Caller>,
  Path(id): Path<GiftId>,
) -> Result<Json<Gift>, ApiError>
where
  S: WishlistStore,
{
  Ok(Json(visible_gift(store.as_ref(), id, caller.as_ref())?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /gifts/:id`. Absent fields keep their value; a
/// blank `link` removes the link.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGiftBody {
  pub name:        Option<String>,
  pub price:       Option<String>,
  pub description: Option<String>,
  pub link:        Option<String>,
}

impl UpdateGiftBody {
  fn validate(&self) -> Result<(), ApiError> {
    if let Some(name) = &self.name {
      validate::length("name", name, 1, 150)?;
    }
    if let Some(price) = &self.price {
      validate::length("price", price, 0, 50)?;
    }
    if let Some(description) = &self.description {
      validate::length("description", description, 0, 2000)?;
    }
    validate::link(self.link.as_deref().filter(|l| !l.trim().is_empty()))
  }
}

/// `PUT /gifts/:id` — returns the updated gift. The reservation is untouched.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<GiftId>,
  Json(body): Json<UpdateGiftBody>,
) -> Result<Json<Gift>, ApiError>
where
  S: WishlistStore,
{
  body.validate()?;
  let mut gift = visible_gift(store.as_ref(), id, Some(&caller))?;
  owned_wishlist(store.as_ref(), gift.wishlist_id, &caller)?;

  if let Some(name) = body.name {
    gift.name = name.trim().to_owned();
  }
  if let Some(price) = body.price {
    gift.price = price.trim().to_owned();
  }
  if let Some(description) = body.description {
    gift.description = description.trim().to_owned();
  }
  if let Some(link) = body.link {
    let link = link.trim();
    gift.link = (!link.is_empty()).then(|| link.to_owned());
  }

  applied(store.update_gift(gift)?)?;
  info!(gift_id = %id, "gift updated");
  Ok(Json(visible_gift(store.as_ref(), id, Some(&caller))?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /gifts/:id` — 204 on success.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(id): Path<GiftId>,
) -> Result<StatusCode, ApiError>
where
  S: WishlistStore,
{
  let gift = visible_gift(store.as_ref(), id, Some(&caller))?;
  owned_wishlist(store.as_ref(), gift.wishlist_id, &caller)?;
  applied(store.delete_gift(id)?)?;
  info!(gift_id = %id, "gift deleted");
  Ok(StatusCode::NO_CONTENT)
}
