//! Error types for `wishlist-core`.

use thiserror::Error;

use crate::{gift::GiftId, wishlist::WishlistId};

/// Failures raised by a [`WishlistStore`](crate::store::WishlistStore).
///
/// Missing entities and unmet preconditions are not errors; they are reported
/// through [`Outcome`](crate::store::Outcome). These variants cover the
/// uniqueness invariants the store refuses to break.
#[derive(Debug, Error)]
pub enum Error {
  #[error("wishlist id {0} is already in use")]
  DuplicateWishlistId(WishlistId),

  #[error("gift id {0} is already in use")]
  DuplicateGiftId(GiftId),

  #[error("public link {0:?} is already in use")]
  DuplicatePublicLink(String),

  #[error("gift {gift_id} names wishlist {claimed} but is listed under wishlist {owner}")]
  GiftWishlistMismatch {
    gift_id: GiftId,
    claimed: WishlistId,
    owner:   WishlistId,
  },

  #[error("no {0} ids are left to allocate")]
  IdsExhausted(&'static str),

  #[error("backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
