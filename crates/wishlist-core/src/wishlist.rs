//! Wishlist — a named, dated collection of gifts owned by one user.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::gift::Gift;

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-wide unique wishlist identifier. Immutable once assigned.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WishlistId(pub i64);

impl fmt::Display for WishlistId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Visibility ──────────────────────────────────────────────────────────────

/// Whether a wishlist can be discovered through a public link.
///
/// A private wishlist has no link at all, so "private with a link" cannot be
/// expressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "visibility", rename_all = "snake_case")]
pub enum Visibility {
  Private,
  Public {
    /// Opaque token granting read access without authentication.
    public_link: String,
  },
}

// ─── Wishlist ────────────────────────────────────────────────────────────────

/// A wishlist aggregate. It owns its gifts; insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
  pub id:          WishlistId,
  pub title:       String,
  pub owner_name:  String,
  pub event_date:  NaiveDate,
  pub description: String,
  #[serde(flatten)]
  pub visibility:  Visibility,
  #[serde(default)]
  pub gifts:       Vec<Gift>,
}

impl Wishlist {
  pub fn is_private(&self) -> bool {
    matches!(self.visibility, Visibility::Private)
  }

  /// The public link, or `None` for a private wishlist.
  pub fn public_link(&self) -> Option<&str> {
    match &self.visibility {
      Visibility::Private => None,
      Visibility::Public { public_link } => Some(public_link),
    }
  }

  /// True if `login` owns this wishlist.
  pub fn is_owned_by(&self, login: &str) -> bool { self.owner_name == login }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample(visibility: Visibility) -> Wishlist {
    Wishlist {
      id: WishlistId(7),
      title: "Birthday".into(),
      owner_name: "kate_rosan".into(),
      event_date: NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
      description: String::new(),
      visibility,
      gifts: Vec::new(),
    }
  }

  #[test]
  fn public_wishlist_serialises_link_inline() {
    let w = sample(Visibility::Public {
      public_link: "wishlist.app/53291".into(),
    });
    let json = serde_json::to_value(&w).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["visibility"], "public");
    assert_eq!(json["public_link"], "wishlist.app/53291");
    assert_eq!(json["event_date"], "2025-12-15");

    let back: Wishlist = serde_json::from_value(json).unwrap();
    assert_eq!(back, w);
  }

  #[test]
  fn private_wishlist_has_no_link() {
    let w = sample(Visibility::Private);
    assert!(w.is_private());
    assert_eq!(w.public_link(), None);

    let json = serde_json::to_value(&w).unwrap();
    assert_eq!(json["visibility"], "private");
    assert!(json.get("public_link").is_none());
  }
}
