//! Plain-text rendering of wishlists and gifts for the terminal.

use wishlist_core::{gift::Gift, wishlist::Wishlist};

/// One line per wishlist: id, title, owner, date, and where to find it.
pub fn wishlist_line(w: &Wishlist) -> String {
  let shared = match w.public_link() {
    Some(link) => link.to_owned(),
    None => "private".into(),
  };
  format!(
    "#{:<4} {}  ({}, {})  [{}]",
    w.id, w.title, w.owner_name, w.event_date, shared
  )
}

pub fn gift_line(g: &Gift) -> String {
  let status = match g.status.reserved_by() {
    Some(by) => format!("reserved by {by}"),
    None => "available".into(),
  };
  let price = if g.price.is_empty() { "—" } else { g.price.as_str() };
  format!("  #{:<4} {}  {}  [{}]", g.id, g.name, price, status)
}

/// A wishlist header followed by its gifts and their details.
pub fn wishlist_detail(w: &Wishlist) -> String {
  let mut out = wishlist_line(w);
  if !w.description.is_empty() {
    out.push_str(&format!("\n  {}", w.description));
  }
  if w.gifts.is_empty() {
    out.push_str("\n  (no gifts yet)");
  }
  for g in &w.gifts {
    out.push('\n');
    out.push_str(&gift_line(g));
    if let Some(link) = &g.link {
      out.push_str(&format!("\n         {link}"));
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use wishlist_core::seed::demo_wishlists;

  use super::*;

  #[test]
  fn lines_mention_link_and_claimant() {
    let wishlists = demo_wishlists();
    let first = &wishlists[0];
    assert!(wishlist_line(first).contains("wishlist.app/53291"));

    let reserved = first.gifts.iter().find(|g| g.status.is_reserved()).unwrap();
    assert!(gift_line(reserved).contains("reserved by kate_rosan"));
  }

  #[test]
  fn detail_lists_every_gift() {
    let wishlists = demo_wishlists();
    let detail = wishlist_detail(&wishlists[1]);
    for g in &wishlists[1].gifts {
      assert!(detail.contains(&g.name), "missing {}", g.name);
    }
  }
}
