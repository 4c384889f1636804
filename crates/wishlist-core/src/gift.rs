//! Gift — a wishable item that belongs to exactly one wishlist and carries a
//! reservation status.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::wishlist::WishlistId;

// ─── Identity ────────────────────────────────────────────────────────────────

/// Gift identifier, unique across the whole store.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GiftId(pub i64);

impl fmt::Display for GiftId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Reservation state of a gift.
///
/// The claimant is carried by the `Reserved` variant, so a gift cannot be
/// reserved without a claimant or available with one.
///
/// ```text
/// Available --reserve--> Reserved
/// Reserved  --cancel---> Available
/// Available --cancel---> Available
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GiftStatus {
  #[default]
  Available,
  Reserved {
    reserved_by: String,
  },
}

impl GiftStatus {
  pub fn kind(&self) -> StatusKind {
    match self {
      Self::Available => StatusKind::Available,
      Self::Reserved { .. } => StatusKind::Reserved,
    }
  }

  pub fn is_reserved(&self) -> bool { matches!(self, Self::Reserved { .. }) }

  pub fn reserved_by(&self) -> Option<&str> {
    match self {
      Self::Available => None,
      Self::Reserved { reserved_by } => Some(reserved_by),
    }
  }
}

/// The field-less discriminant of [`GiftStatus`], used for filtering.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
  Available,
  Reserved,
}

// ─── Gift ────────────────────────────────────────────────────────────────────

/// A gift entity. Lives inside its owning [`Wishlist`](crate::wishlist::Wishlist).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gift {
  pub id:          GiftId,
  /// The owning wishlist; must resolve for the gift's whole lifetime.
  pub wishlist_id: WishlistId,
  pub name:        String,
  /// Free text, e.g. "4 990 ₽". Not a validated amount.
  pub price:       String,
  pub description: String,
  pub link:        Option<String>,
  pub owner_name:  String,
  pub created:     NaiveDate,
  #[serde(flatten)]
  pub status:      GiftStatus,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  fn gift(status: GiftStatus) -> Gift {
    Gift {
      id: GiftId(2),
      wishlist_id: WishlistId(1),
      name: "Wuthering Heights".into(),
      price: "990 ₽".into(),
      description: "Hardcover edition".into(),
      link: None,
      owner_name: "aleksandra_petrova".into(),
      created: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
      status,
    }
  }

  #[test]
  fn reserved_gift_serialises_claimant_inline() {
    let g = gift(GiftStatus::Reserved {
      reserved_by: "kate_rosan".into(),
    });
    let json = serde_json::to_value(&g).unwrap();
    assert_eq!(json["status"], "reserved");
    assert_eq!(json["reserved_by"], "kate_rosan");
    assert_eq!(json["wishlist_id"], 1);

    let back: Gift = serde_json::from_value(json).unwrap();
    assert_eq!(back, g);
  }

  #[test]
  fn available_gift_omits_claimant() {
    let json = serde_json::to_value(gift(GiftStatus::Available)).unwrap();
    assert_eq!(json["status"], "available");
    assert!(json.get("reserved_by").is_none());
  }

  #[test]
  fn reserved_without_claimant_is_rejected() {
    let mut json = serde_json::to_value(gift(GiftStatus::Available)).unwrap();
    json["status"] = "reserved".into();
    assert!(serde_json::from_value::<Gift>(json).is_err());
  }

  #[test]
  fn status_kind_round_trips_through_strings() {
    assert_eq!(StatusKind::Reserved.to_string(), "reserved");
    assert_eq!(StatusKind::from_str("AVAILABLE").unwrap(), StatusKind::Available);
    assert!(StatusKind::from_str("lost").is_err());
    assert_eq!(
      GiftStatus::Reserved { reserved_by: "u".into() }.kind(),
      StatusKind::Reserved
    );
  }
}
