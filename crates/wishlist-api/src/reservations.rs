//! Reservation endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/wishlists/:id/gifts/:gift_id/reserve` | Claim an available gift; 409 if taken |
//! | `POST` | `/gifts/:id/cancel` | Reserver or wishlist owner; idempotent |
//! | `GET`  | `/reservations` | Gifts the caller currently holds |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use tracing::info;
use wishlist_core::{
  gift::{Gift, GiftId},
  store::WishlistStore,
  wishlist::WishlistId,
};

use crate::{
  caller::{Caller, visible_wishlist},
  error::{ApiError, applied},
  gifts::visible_gift,
};

// ─── Reserve ──────────────────────────────────────────────────────────────────

/// `POST /wishlists/:id/gifts/:gift_id/reserve` — returns the reserved gift.
pub async fn reserve<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path((wishlist_id, gift_id)): Path<(WishlistId, GiftId)>,
) -> Result<Json<Gift>, ApiError>
where
  S: WishlistStore,
{
  let wishlist = visible_wishlist(store.as_ref(), wishlist_id, Some(&caller))?;
  if wishlist.is_owned_by(&caller.login) {
    return Err(ApiError::Forbidden("cannot reserve your own gift".into()));
  }

  applied(store.reserve_gift(wishlist_id, gift_id, &caller.login)?)?;
  info!(%wishlist_id, %gift_id, by = %caller.login, "gift reserved");
  Ok(Json(visible_gift(store.as_ref(), gift_id, Some(&caller))?))
}

// ─── Cancel ───────────────────────────────────────────────────────────────────

/// `POST /gifts/:id/cancel` — returns the (now available) gift.
pub async fn cancel<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  Path(gift_id): Path<GiftId>,
) -> Result<Json<Gift>, ApiError>
where
  S: WishlistStore,
{
  let gift = visible_gift(store.as_ref(), gift_id, Some(&caller))?;
  let allowed = match gift.status.reserved_by() {
    Some(holder) => holder == caller.login || gift.owner_name == caller.login,
    None => true,
  };
  if !allowed {
    return Err(ApiError::Forbidden(format!(
      "gift {gift_id} is reserved by another user"
    )));
  }

  applied(store.cancel_reservation(gift_id)?)?;
  info!(%gift_id, by = %caller.login, "reservation cancelled");
  Ok(Json(visible_gift(store.as_ref(), gift_id, Some(&caller))?))
}

// ─── Mine ─────────────────────────────────────────────────────────────────────

/// `GET /reservations`
pub async fn mine<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
) -> Result<Json<Vec<Gift>>, ApiError>
where
  S: WishlistStore,
{
  let mut gifts = store.list_all_gifts()?;
  gifts.retain(|g| g.status.reserved_by() == Some(caller.login.as_str()));
  Ok(Json(gifts))
}
