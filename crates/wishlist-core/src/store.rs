//! The `WishlistStore` trait and the [`Outcome`] of its mutations.
//!
//! The trait is implemented by storage backends (e.g. `wishlist-store-memory`).
//! Presentation layers (`wishlist-api`, and through it the server) depend on
//! this abstraction, never on a concrete backend.

use crate::{
  Result,
  gift::{Gift, GiftId},
  wishlist::{Wishlist, WishlistId},
};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// What a mutation did.
///
/// Anything other than [`Outcome::Applied`] means the store was left exactly
/// as it was. None of these are errors: callers that only care whether the
/// call returned can ignore the distinction.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// The mutation was carried out.
  Applied,
  /// No wishlist with this id exists.
  WishlistNotFound(WishlistId),
  /// No gift with this id exists (within the addressed wishlist, if any).
  GiftNotFound(GiftId),
  /// Reservation refused: the gift is already claimed.
  AlreadyReserved {
    gift_id:     GiftId,
    reserved_by: String,
  },
}

impl Outcome {
  pub fn is_applied(&self) -> bool { matches!(self, Self::Applied) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the aggregate store holding every wishlist and its gifts.
///
/// Every operation is synchronous and bounded: nothing here blocks on I/O.
/// Implementations must serialise writers so the store behaves as if it had a
/// single owner.
///
/// Read operations return owned snapshots; later mutations never show through
/// a value that was already returned.
pub trait WishlistStore: Send + Sync {
  // ── Wishlists ─────────────────────────────────────────────────────────

  /// All wishlists in creation order (newest last).
  fn list_wishlists(&self) -> Result<Vec<Wishlist>>;

  /// Look a wishlist up by id. `None` means "not found".
  fn get_wishlist(&self, id: WishlistId) -> Result<Option<Wishlist>>;

  /// Resolve a public link back to its wishlist. Private wishlists are never
  /// returned.
  fn find_wishlist_by_public_link(&self, link: &str) -> Result<Option<Wishlist>>;

  /// Append a wishlist (with any gifts it already holds).
  ///
  /// Returns an error if the wishlist id, its public link, or any of its gift
  /// ids is already in use, or if a gift names a different wishlist.
  fn add_wishlist(&self, wishlist: Wishlist) -> Result<()>;

  /// Remove a wishlist together with all of its gifts.
  fn delete_wishlist(&self, id: WishlistId) -> Result<Outcome>;

  /// Overwrite the editable fields of the stored wishlist with the same id:
  /// title, description, event date and visibility. Owner and gifts stay as
  /// stored.
  ///
  /// Returns an error if the new public link already belongs to another
  /// wishlist. Going private releases the old link.
  fn update_wishlist(&self, wishlist: Wishlist) -> Result<Outcome>;

  // ── Gifts ─────────────────────────────────────────────────────────────

  /// Every gift, in wishlist order and then gift order within each wishlist.
  fn list_all_gifts(&self) -> Result<Vec<Gift>>;

  fn get_gift(&self, id: GiftId) -> Result<Option<Gift>>;

  /// The gifts of one wishlist; empty if the wishlist does not exist.
  fn list_gifts_of(&self, wishlist_id: WishlistId) -> Result<Vec<Gift>>;

  /// Append `gift` to the wishlist named by `gift.wishlist_id`.
  ///
  /// Returns [`Outcome::WishlistNotFound`] if that wishlist does not exist and
  /// an error if the gift id is already in use.
  fn add_gift(&self, gift: Gift) -> Result<Outcome>;

  /// Overwrite the editable fields of the stored gift with the same id: name,
  /// price, description and link. Its wishlist, owner, creation date and
  /// reservation stay as stored.
  fn update_gift(&self, gift: Gift) -> Result<Outcome>;

  fn delete_gift(&self, id: GiftId) -> Result<Outcome>;

  // ── Reservations ──────────────────────────────────────────────────────

  /// Reserve an available gift of `wishlist_id` on behalf of `reserved_by`.
  ///
  /// A gift that is already reserved keeps its original claimant and the
  /// call reports [`Outcome::AlreadyReserved`].
  fn reserve_gift(
    &self,
    wishlist_id: WishlistId,
    gift_id: GiftId,
    reserved_by: &str,
  ) -> Result<Outcome>;

  /// Return a gift to the available state, whoever held it.
  ///
  /// Idempotent: cancelling an available gift is [`Outcome::Applied`].
  fn cancel_reservation(&self, gift_id: GiftId) -> Result<Outcome>;

  // ── Identifiers ───────────────────────────────────────────────────────

  /// A wishlist id that no wishlist in the store uses.
  fn next_wishlist_id(&self) -> Result<WishlistId>;

  /// A gift id that no gift in the store uses.
  fn next_gift_id(&self) -> Result<GiftId>;
}
