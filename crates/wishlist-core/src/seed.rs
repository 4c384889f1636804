//! Demo data shipped with the service: four wishlists belonging to two users.
//!
//! Every gift id is unique across the collection so the set can be loaded
//! into a store that enforces store-wide uniqueness.

use chrono::NaiveDate;

use crate::{
  gift::{Gift, GiftId, GiftStatus},
  wishlist::{Visibility, Wishlist, WishlistId},
};

pub const ALEKSANDRA: &str = "aleksandra_petrova";
pub const KATE: &str = "kate_rosan";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  // Constant inputs; every call below names a real calendar date.
  NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

struct Row {
  id:          i64,
  name:        &'static str,
  price:       &'static str,
  description: &'static str,
  link:        &'static str,
  created:     NaiveDate,
  reserved_by: Option<&'static str>,
}

fn gifts(wishlist_id: i64, owner: &str, rows: Vec<Row>) -> Vec<Gift> {
  rows
    .into_iter()
    .map(|r| Gift {
      id:          GiftId(r.id),
      wishlist_id: WishlistId(wishlist_id),
      name:        r.name.to_owned(),
      price:       r.price.to_owned(),
      description: r.description.to_owned(),
      link:        Some(r.link.to_owned()),
      owner_name:  owner.to_owned(),
      created:     r.created,
      status:      match r.reserved_by {
        Some(by) => GiftStatus::Reserved { reserved_by: by.to_owned() },
        None => GiftStatus::Available,
      },
    })
    .collect()
}

fn public(link: &str) -> Visibility {
  Visibility::Public { public_link: link.to_owned() }
}

/// Christmas-season gifts shared by wishlists 3 and 4, starting at `first_id`.
fn new_year_rows(first_id: i64) -> Vec<Row> {
  vec![
    Row {
      id:          first_id,
      name:        "Hatber 1000-piece puzzle",
      price:       "1 290 ₽",
      description: "A beautiful puzzle for long winter evenings",
      link:        "https://www.wildberries.ru/catalog/260452179/detail.aspx?size=404859863",
      created:     date(2025, 11, 15),
      reserved_by: None,
    },
    Row {
      id:          first_id + 1,
      name:        "Paint-by-numbers kit",
      price:       "2 190 ₽",
      description: "Canvas by numbers with brushes and paints",
      link:        "https://www.wildberries.ru/catalog/237988113/detail.aspx?size=374504646",
      created:     date(2025, 11, 20),
      reserved_by: None,
    },
    Row {
      id:          first_id + 2,
      name:        "Lindt premium chocolate",
      price:       "1 590 ₽",
      description: "Assorted chocolates in a gift box",
      link:        "https://www.wildberries.ru/catalog/321921587/detail.aspx?size=484412787",
      created:     date(2025, 11, 25),
      reserved_by: None,
    },
    Row {
      id:          first_id + 3,
      name:        "\"World of Embroidery\" kit",
      price:       "1 790 ₽",
      description: "Complete cross-stitch kit with a lovely design",
      link:        "https://www.wildberries.ru/catalog/267640834/detail.aspx?size=414622313",
      created:     date(2025, 12, 1),
      reserved_by: None,
    },
    Row {
      id:          first_id + 4,
      name:        "\"Malevich\" embroidery canvas",
      price:       "990 ₽",
      description: "Quality canvas with a printed pattern",
      link:        "https://www.wildberries.ru/catalog/82464813/detail.aspx?size=135901932",
      created:     date(2025, 12, 5),
      reserved_by: None,
    },
  ]
}

/// The demo collection, in display order.
pub fn demo_wishlists() -> Vec<Wishlist> {
  vec![
    Wishlist {
      id:          WishlistId(1),
      title:       "Birthday!".into(),
      owner_name:  ALEKSANDRA.into(),
      event_date:  date(2025, 12, 15),
      description: "My birthday! Happy with anything on the list. I like practical things and gadgets, and 19th-century classics.".into(),
      visibility:  public("wishlist.app/53291"),
      gifts:       gifts(1, ALEKSANDRA, vec![
        Row {
          id:          1,
          name:        "AirPods or similar",
          price:       "4 990 ₽",
          description: "Ideally with noise cancelling",
          link:        "https://www.wildberries.ru/catalog/123456789/detail.aspx",
          created:     date(2025, 10, 1),
          reserved_by: None,
        },
        Row {
          id:          2,
          name:        "A book about love",
          price:       "1 990 ₽",
          description: "Classic literature",
          link:        "https://www.wildberries.ru/catalog/143592972/detail.aspx?size=242472035",
          created:     date(2025, 10, 5),
          reserved_by: Some(KATE),
        },
        Row {
          id:          3,
          name:        "SKYPHOS teapot",
          price:       "1 990 ₽",
          description: "Ceramic teapot with a removable strainer, ideal for herbal tea",
          link:        "https://www.wildberries.ru/catalog/111109236/detail.aspx?size=201414280",
          created:     date(2025, 10, 6),
          reserved_by: None,
        },
        Row {
          id:          4,
          name:        "\"Wuthering Heights\", Eksmo edition",
          price:       "990 ₽",
          description: "A classic in a beautiful binding",
          link:        "https://www.wildberries.ru/catalog/143592972/detail.aspx?size=242472035",
          created:     date(2025, 11, 3),
          reserved_by: Some(KATE),
        },
        Row {
          id:          5,
          name:        "Paragraph Collection scented candles",
          price:       "1 490 ₽",
          description: "Decorative candles in several scents",
          link:        "https://www.wildberries.ru/catalog/217899612/detail.aspx?size=347009447",
          created:     date(2025, 11, 10),
          reserved_by: None,
        },
      ]),
    },
    Wishlist {
      id:          WishlistId(2),
      title:       "Anniversary 💕".into(),
      owner_name:  ALEKSANDRA.into(),
      event_date:  date(2025, 7, 20),
      description: "Our anniversary! Something romantic and memorable. I love board games and cosy things for the home.".into(),
      visibility:  public("wishlist.app/74291"),
      gifts:       gifts(2, ALEKSANDRA, vec![
        Row {
          id:          6,
          name:        "MineLife bracelets",
          price:       "2 490 ₽",
          description: "Engraved bracelets, a lovely keepsake",
          link:        "https://www.wildberries.ru/catalog/259768946/detail.aspx?size=403890636",
          created:     date(2025, 6, 15),
          reserved_by: None,
        },
        Row {
          id:          7,
          name:        "CupCraft designer mug",
          price:       "890 ₽",
          description: "Hand-painted ceramic mug for evening tea",
          link:        "https://www.wildberries.ru/catalog/324335042/detail.aspx?size=487195946",
          created:     date(2025, 6, 20),
          reserved_by: None,
        },
        Row {
          id:          8,
          name:        "Time Lider pocket watch",
          price:       "3 990 ₽",
          description: "Classic mechanical watch in a retro style",
          link:        "https://www.wildberries.ru/catalog/486116606/detail.aspx?size=677923636",
          created:     date(2025, 6, 25),
          reserved_by: None,
        },
        Row {
          id:          9,
          name:        "Board game for two",
          price:       "2 590 ₽",
          description: "A strategy game for cosy evenings together",
          link:        "https://www.wildberries.ru/catalog/232553104/detail.aspx?size=366819059",
          created:     date(2025, 7, 1),
          reserved_by: None,
        },
      ]),
    },
    Wishlist {
      id:          WishlistId(3),
      title:       "New Year 2026! 🎄✨".into(),
      owner_name:  ALEKSANDRA.into(),
      event_date:  date(2025, 12, 31),
      description: "New Year presents! Craft kits, puzzles and sweets for the holiday mood 🎅".into(),
      visibility:  public("wishlist.app/98342"),
      gifts:       gifts(3, ALEKSANDRA, new_year_rows(10)),
    },
    Wishlist {
      id:          WishlistId(4),
      title:       "New Year 2026".into(),
      owner_name:  KATE.into(),
      event_date:  date(2025, 12, 31),
      description: "New Year presents! Craft kits, puzzles and sweets for the holiday mood 🎅".into(),
      visibility:  public("wishlist.app/56739"),
      gifts:       gifts(4, KATE, new_year_rows(15)),
    },
  ]
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn gift_ids_are_unique_across_wishlists() {
    let all: Vec<_> = demo_wishlists()
      .into_iter()
      .flat_map(|w| w.gifts)
      .map(|g| g.id)
      .collect();
    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(all.len(), 19);
    assert_eq!(unique.len(), all.len());
  }

  #[test]
  fn gifts_point_at_their_wishlist() {
    for w in demo_wishlists() {
      assert!(w.gifts.iter().all(|g| g.wishlist_id == w.id), "wishlist {}", w.id);
      assert!(w.gifts.iter().all(|g| g.owner_name == w.owner_name));
    }
  }

  #[test]
  fn seeded_reservations_name_a_claimant() {
    let reserved: Vec<_> = demo_wishlists()
      .into_iter()
      .flat_map(|w| w.gifts)
      .filter(|g| g.status.is_reserved())
      .map(|g| (g.id, g.status.reserved_by().map(str::to_owned)))
      .collect();
    assert_eq!(reserved, vec![
      (GiftId(2), Some(KATE.to_owned())),
      (GiftId(4), Some(KATE.to_owned())),
    ]);
  }
}
