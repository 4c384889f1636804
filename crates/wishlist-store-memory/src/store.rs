//! [`MemoryStore`] — the in-process implementation of [`WishlistStore`].

use std::{
  collections::{HashMap, HashSet},
  sync::Arc,
};

use parking_lot::RwLock;
use tracing::debug;

use wishlist_core::{
  Error, Result,
  gift::{Gift, GiftId, GiftStatus},
  seed,
  store::{Outcome, WishlistStore},
  wishlist::{Wishlist, WishlistId},
};

// ─── State ───────────────────────────────────────────────────────────────────

/// Everything behind the lock.
///
/// `wishlists` is the source of truth. The two maps are indexes over it and
/// are updated in the same critical section as every mutation.
#[derive(Default)]
struct Inner {
  wishlists:        Vec<Wishlist>,
  /// Owning wishlist of every gift in the store.
  gift_owners:      HashMap<GiftId, WishlistId>,
  /// Public link of every public wishlist.
  links:            HashMap<String, WishlistId>,
  /// Highest id ever added or handed out.
  last_wishlist_id: i64,
  last_gift_id:     i64,
}

impl Inner {
  fn wishlist_index(&self, id: WishlistId) -> Option<usize> {
    self.wishlists.iter().position(|w| w.id == id)
  }

  /// `(wishlist index, gift index)` of a gift anywhere in the store.
  fn locate_gift(&self, id: GiftId) -> Option<(usize, usize)> {
    let owner = *self.gift_owners.get(&id)?;
    let wi = self.wishlist_index(owner)?;
    let gi = self.wishlists[wi].gifts.iter().position(|g| g.id == id)?;
    Some((wi, gi))
  }

  /// Reject a wishlist that would break a uniqueness or ownership invariant.
  fn check_insertable(&self, wishlist: &Wishlist) -> Result<()> {
    if self.wishlist_index(wishlist.id).is_some() {
      return Err(Error::DuplicateWishlistId(wishlist.id));
    }
    if let Some(link) = wishlist.public_link()
      && self.links.contains_key(link)
    {
      return Err(Error::DuplicatePublicLink(link.to_owned()));
    }

    let mut seen = HashSet::with_capacity(wishlist.gifts.len());
    for gift in &wishlist.gifts {
      if gift.wishlist_id != wishlist.id {
        return Err(Error::GiftWishlistMismatch {
          gift_id: gift.id,
          claimed: gift.wishlist_id,
          owner:   wishlist.id,
        });
      }
      if self.gift_owners.contains_key(&gift.id) || !seen.insert(gift.id) {
        return Err(Error::DuplicateGiftId(gift.id));
      }
    }
    Ok(())
  }

  fn insert_wishlist(&mut self, wishlist: Wishlist) -> Result<()> {
    self.check_insertable(&wishlist)?;

    for gift in &wishlist.gifts {
      self.gift_owners.insert(gift.id, wishlist.id);
      self.last_gift_id = self.last_gift_id.max(gift.id.0);
    }
    if let Some(link) = wishlist.public_link() {
      self.links.insert(link.to_owned(), wishlist.id);
    }
    self.last_wishlist_id = self.last_wishlist_id.max(wishlist.id.0);

    debug!(
      wishlist_id = %wishlist.id,
      gifts = wishlist.gifts.len(),
      "wishlist added"
    );
    self.wishlists.push(wishlist);
    Ok(())
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The aggregate store: every wishlist and its gifts, held in memory.
///
/// Cloning is cheap and yields a handle onto the same state. Writers take an
/// exclusive lock for the duration of one operation, so concurrent callers
/// observe the operations in some serial order.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
  /// An empty store.
  pub fn new() -> Self { Self::default() }

  /// A store pre-populated with `wishlists`, in order.
  pub fn from_wishlists(wishlists: impl IntoIterator<Item = Wishlist>) -> Result<Self> {
    let store = Self::new();
    {
      let mut inner = store.inner.write();
      for wishlist in wishlists {
        inner.insert_wishlist(wishlist)?;
      }
    }
    Ok(store)
  }

  /// A store loaded with [`seed::demo_wishlists`].
  pub fn seeded() -> Result<Self> { Self::from_wishlists(seed::demo_wishlists()) }
}

// ─── WishlistStore impl ──────────────────────────────────────────────────────

impl WishlistStore for MemoryStore {
  // ── Wishlists ─────────────────────────────────────────────────────────────

  fn list_wishlists(&self) -> Result<Vec<Wishlist>> {
    Ok(self.inner.read().wishlists.clone())
  }

  fn get_wishlist(&self, id: WishlistId) -> Result<Option<Wishlist>> {
    let inner = self.inner.read();
    Ok(inner.wishlist_index(id).map(|i| inner.wishlists[i].clone()))
  }

  fn find_wishlist_by_public_link(&self, link: &str) -> Result<Option<Wishlist>> {
    let inner = self.inner.read();
    Ok(
      inner
        .links
        .get(link)
        .and_then(|id| inner.wishlist_index(*id))
        .map(|i| inner.wishlists[i].clone()),
    )
  }

  fn add_wishlist(&self, wishlist: Wishlist) -> Result<()> {
    self.inner.write().insert_wishlist(wishlist)
  }

  fn delete_wishlist(&self, id: WishlistId) -> Result<Outcome> {
    let mut inner = self.inner.write();
    let Some(index) = inner.wishlist_index(id) else {
      return Ok(Outcome::WishlistNotFound(id));
    };

    let removed = inner.wishlists.remove(index);
    for gift in &removed.gifts {
      inner.gift_owners.remove(&gift.id);
    }
    if let Some(link) = removed.public_link() {
      inner.links.remove(link);
    }

    debug!(wishlist_id = %id, gifts = removed.gifts.len(), "wishlist deleted");
    Ok(Outcome::Applied)
  }

  fn update_wishlist(&self, changes: Wishlist) -> Result<Outcome> {
    let mut inner = self.inner.write();
    let Some(index) = inner.wishlist_index(changes.id) else {
      return Ok(Outcome::WishlistNotFound(changes.id));
    };
    if let Some(link) = changes.public_link()
      && inner.links.get(link).is_some_and(|owner| *owner != changes.id)
    {
      return Err(Error::DuplicatePublicLink(link.to_owned()));
    }

    if let Some(old) = inner.wishlists[index].public_link().map(str::to_owned) {
      inner.links.remove(&old);
    }
    if let Some(link) = changes.public_link() {
      inner.links.insert(link.to_owned(), changes.id);
    }

    let stored = &mut inner.wishlists[index];
    stored.title = changes.title;
    stored.description = changes.description;
    stored.event_date = changes.event_date;
    stored.visibility = changes.visibility;
    debug!(wishlist_id = %changes.id, private = stored.is_private(), "wishlist updated");
    Ok(Outcome::Applied)
  }

  // ── Gifts ─────────────────────────────────────────────────────────────────

  fn list_all_gifts(&self) -> Result<Vec<Gift>> {
    let inner = self.inner.read();
    Ok(
      inner
        .wishlists
        .iter()
        .flat_map(|w| w.gifts.iter().cloned())
        .collect(),
    )
  }

  fn get_gift(&self, id: GiftId) -> Result<Option<Gift>> {
    let inner = self.inner.read();
    Ok(
      inner
        .locate_gift(id)
        .map(|(wi, gi)| inner.wishlists[wi].gifts[gi].clone()),
    )
  }

  fn list_gifts_of(&self, wishlist_id: WishlistId) -> Result<Vec<Gift>> {
    let inner = self.inner.read();
    Ok(
      inner
        .wishlist_index(wishlist_id)
        .map(|i| inner.wishlists[i].gifts.clone())
        .unwrap_or_default(),
    )
  }

  fn add_gift(&self, gift: Gift) -> Result<Outcome> {
    let mut inner = self.inner.write();
    let Some(index) = inner.wishlist_index(gift.wishlist_id) else {
      return Ok(Outcome::WishlistNotFound(gift.wishlist_id));
    };
    if inner.gift_owners.contains_key(&gift.id) {
      return Err(Error::DuplicateGiftId(gift.id));
    }

    inner.gift_owners.insert(gift.id, gift.wishlist_id);
    inner.last_gift_id = inner.last_gift_id.max(gift.id.0);
    debug!(gift_id = %gift.id, wishlist_id = %gift.wishlist_id, "gift added");
    inner.wishlists[index].gifts.push(gift);
    Ok(Outcome::Applied)
  }

  fn delete_gift(&self, id: GiftId) -> Result<Outcome> {
    let mut inner = self.inner.write();
    let Some((wi, gi)) = inner.locate_gift(id) else {
      return Ok(Outcome::GiftNotFound(id));
    };

    inner.wishlists[wi].gifts.remove(gi);
    inner.gift_owners.remove(&id);
    debug!(gift_id = %id, "gift deleted");
    Ok(Outcome::Applied)
  }

  fn update_gift(&self, changes: Gift) -> Result<Outcome> {
    let mut inner = self.inner.write();
    let Some((wi, gi)) = inner.locate_gift(changes.id) else {
      return Ok(Outcome::GiftNotFound(changes.id));
    };

    let stored = &mut inner.wishlists[wi].gifts[gi];
    stored.name = changes.name;
    stored.price = changes.price;
    stored.description = changes.description;
    stored.link = changes.link;
    debug!(gift_id = %changes.id, "gift updated");
    Ok(Outcome::Applied)
  }

  // ── Reservations ──────────────────────────────────────────────────────────

  fn reserve_gift(
    &self,
    wishlist_id: WishlistId,
    gift_id: GiftId,
    reserved_by: &str,
  ) -> Result<Outcome> {
    let mut inner = self.inner.write();
    let Some(wi) = inner.wishlist_index(wishlist_id) else {
      return Ok(Outcome::WishlistNotFound(wishlist_id));
    };
    let Some(gift) = inner.wishlists[wi]
      .gifts
      .iter_mut()
      .find(|g| g.id == gift_id)
    else {
      return Ok(Outcome::GiftNotFound(gift_id));
    };

    if let GiftStatus::Reserved { reserved_by: holder } = &gift.status {
      return Ok(Outcome::AlreadyReserved {
        gift_id,
        reserved_by: holder.clone(),
      });
    }

    gift.status = GiftStatus::Reserved {
      reserved_by: reserved_by.to_owned(),
    };
    debug!(%wishlist_id, %gift_id, reserved_by, "gift reserved");
    Ok(Outcome::Applied)
  }

  fn cancel_reservation(&self, gift_id: GiftId) -> Result<Outcome> {
    let mut inner = self.inner.write();
    let Some((wi, gi)) = inner.locate_gift(gift_id) else {
      return Ok(Outcome::GiftNotFound(gift_id));
    };

    inner.wishlists[wi].gifts[gi].status = GiftStatus::Available;
    debug!(%gift_id, "reservation cancelled");
    Ok(Outcome::Applied)
  }

  // ── Identifiers ───────────────────────────────────────────────────────────

  fn next_wishlist_id(&self) -> Result<WishlistId> {
    let mut inner = self.inner.write();
    inner.last_wishlist_id = inner
      .last_wishlist_id
      .checked_add(1)
      .ok_or(Error::IdsExhausted("wishlist"))?;
    Ok(WishlistId(inner.last_wishlist_id))
  }

  fn next_gift_id(&self) -> Result<GiftId> {
    let mut inner = self.inner.write();
    inner.last_gift_id = inner
      .last_gift_id
      .checked_add(1)
      .ok_or(Error::IdsExhausted("gift"))?;
    Ok(GiftId(inner.last_gift_id))
  }
}
