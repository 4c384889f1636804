use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use wishlist_core::{
  gift::GiftId,
  seed::{ALEKSANDRA, KATE},
  store::WishlistStore,
  wishlist::WishlistId,
};
use wishlist_store_memory::MemoryStore;

use crate::{Caller, api_router};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn seeded() -> Arc<MemoryStore> { Arc::new(MemoryStore::seeded().unwrap()) }

fn caller(login: &str) -> Caller {
  Caller { user_id: 1, login: login.to_owned() }
}

async fn send(
  router: Router,
  method: &str,
  uri: &str,
  who: Option<&str>,
  body: Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(login) = who {
    builder = builder.extension(caller(login));
  }
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  router.oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

// ─── Wishlists ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_wishlists_anonymously() {
  let resp = send(api_router(seeded()), "GET", "/wishlists", None, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  let ids: Vec<i64> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|w| w["id"].as_i64().unwrap())
    .collect();
  assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn list_wishlists_by_owner() {
  let resp = send(
    api_router(seeded()),
    "GET",
    &format!("/wishlists?owner={KATE}"),
    None,
    None,
  )
  .await;
  let body = json_body(resp).await;
  assert_eq!(body.as_array().unwrap().len(), 1);
  assert_eq!(body[0]["owner_name"], KATE);
}

#[tokio::test]
async fn create_requires_caller() {
  let resp = send(
    api_router(seeded()),
    "POST",
    "/wishlists",
    None,
    Some(json!({ "title": "Birthday", "event_date": "2026-05-01" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], "Bearer");
}

#[tokio::test]
async fn create_public_wishlist() {
  let store = seeded();
  let resp = send(
    api_router(store.clone()),
    "POST",
    "/wishlists",
    Some("bob"),
    Some(json!({ "title": "  Birthday  ", "event_date": "2026-05-01" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = json_body(resp).await;
  assert_eq!(body["id"], 5);
  assert_eq!(body["title"], "Birthday");
  assert_eq!(body["owner_name"], "bob");
  assert_eq!(body["visibility"], "public");
  let link = body["public_link"].as_str().unwrap();
  assert!(link.starts_with("https://wishlistapp.com/share/"));

  let found = store.find_wishlist_by_public_link(link).unwrap().unwrap();
  assert_eq!(found.id, WishlistId(5));
}

#[tokio::test]
async fn create_rejects_blank_title() {
  let resp = send(
    api_router(seeded()),
    "POST",
    "/wishlists",
    Some("bob"),
    Some(json!({ "title": "   ", "event_date": "2026-05-01" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await["error"], "title must not be blank");
}

#[tokio::test]
async fn private_wishlist_hidden_from_others() {
  let store = seeded();
  let resp = send(
    api_router(store.clone()),
    "POST",
    "/wishlists",
    Some("bob"),
    Some(json!({ "title": "Secret", "event_date": "2026-05-01", "is_private": true })),
  )
  .await;
  let body = json_body(resp).await;
  assert_eq!(body["visibility"], "private");
  assert!(body.get("public_link").is_none());

  let resp = send(api_router(store.clone()), "GET", "/wishlists/5", None, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let resp = send(api_router(store.clone()), "GET", "/wishlists/5", Some(KATE), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let resp = send(api_router(store.clone()), "GET", "/wishlists/5", Some("bob"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = send(api_router(store), "GET", "/wishlists", None, None).await;
  assert_eq!(json_body(resp).await.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn find_by_link() {
  let router = api_router(seeded());
  let resp = send(
    router.clone(),
    "GET",
    "/wishlists/by-link?link=wishlist.app/74291",
    None,
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["id"], 2);

  let resp = send(router, "GET", "/wishlists/by-link?link=nope", None, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_missing_wishlist() {
  let resp = send(api_router(seeded()), "GET", "/wishlists/99", None, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(json_body(resp).await["error"], "wishlist 99 not found");
}

#[tokio::test]
async fn delete_wishlist_owner_only() {
  let store = seeded();
  let resp = send(api_router(store.clone()), "DELETE", "/wishlists/1", Some(KATE), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = send(
    api_router(store.clone()),
    "DELETE",
    "/wishlists/1",
    Some(ALEKSANDRA),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  assert!(store.get_wishlist(WishlistId(1)).unwrap().is_none());
  assert!(store.get_gift(GiftId(1)).unwrap().is_none());
}

#[tokio::test]
async fn wishlist_gifts_in_order() {
  let resp = send(api_router(seeded()), "GET", "/wishlists/2/gifts", None, None).await;
  let body = json_body(resp).await;
  let ids: Vec<i64> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|g| g["id"].as_i64().unwrap())
    .collect();
  assert_eq!(ids, vec![6, 7, 8, 9]);
}

#[tokio::test]
async fn update_wishlist_fields() {
  let store = seeded();
  let resp = send(
    api_router(store.clone()),
    "PUT",
    "/wishlists/1",
    Some(ALEKSANDRA),
    Some(json!({ "title": " Birthday 2026 ", "event_date": "2026-03-08" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body["title"], "Birthday 2026");
  assert_eq!(body["event_date"], "2026-03-08");
  assert_eq!(body["public_link"], "wishlist.app/53291");
  assert_eq!(body["gifts"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn update_wishlist_owner_only() {
  let resp = send(
    api_router(seeded()),
    "PUT",
    "/wishlists/1",
    Some(KATE),
    Some(json!({ "title": "Mine now" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_wishlist_rejects_blank_title() {
  let resp = send(
    api_router(seeded()),
    "PUT",
    "/wishlists/1",
    Some(ALEKSANDRA),
    Some(json!({ "title": "" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn toggling_privacy_drops_and_issues_links() {
  let store = seeded();
  let resp = send(
    api_router(store.clone()),
    "PUT",
    "/wishlists/2",
    Some(ALEKSANDRA),
    Some(json!({ "is_private": true })),
  )
  .await;
  let body = json_body(resp).await;
  assert_eq!(body["visibility"], "private");
  assert!(body.get("public_link").is_none());
  assert!(store.find_wishlist_by_public_link("wishlist.app/74291").unwrap().is_none());

  let resp = send(
    api_router(store.clone()),
    "PUT",
    "/wishlists/2",
    Some(ALEKSANDRA),
    Some(json!({ "is_private": false })),
  )
  .await;
  let body = json_body(resp).await;
  assert_eq!(body["visibility"], "public");
  let link = body["public_link"].as_str().unwrap();
  assert!(link.starts_with("https://wishlistapp.com/share/"));
  assert_eq!(
    store.find_wishlist_by_public_link(link).unwrap().map(|w| w.id),
    Some(WishlistId(2))
  );
}

#[tokio::test]
async fn regenerate_link_replaces_old_link() {
  let store = seeded();
  let resp = send(
    api_router(store.clone()),
    "POST",
    "/wishlists/4/regenerate-link",
    Some(KATE),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let link = json_body(resp).await["public_link"].as_str().unwrap().to_owned();
  assert_ne!(link, "wishlist.app/56739");
  assert!(store.find_wishlist_by_public_link("wishlist.app/56739").unwrap().is_none());
  assert!(store.find_wishlist_by_public_link(&link).unwrap().is_some());
}

#[tokio::test]
async fn regenerate_link_owner_only_and_public_only() {
  let store = seeded();
  let resp = send(
    api_router(store.clone()),
    "POST",
    "/wishlists/4/regenerate-link",
    Some(ALEKSANDRA),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  send(
    api_router(store.clone()),
    "PUT",
    "/wishlists/4",
    Some(KATE),
    Some(json!({ "is_private": true })),
  )
  .await;
  let resp = send(
    api_router(store),
    "POST",
    "/wishlists/4/regenerate-link",
    Some(KATE),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ─── Gifts ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_gifts_by_status() {
  let resp = send(api_router(seeded()), "GET", "/gifts?status=reserved", None, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  let ids: Vec<i64> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|g| g["id"].as_i64().unwrap())
    .collect();
  assert_eq!(ids, vec![2, 4]);
  assert_eq!(body[0]["reserved_by"], KATE);
}

#[tokio::test]
async fn add_gift_to_own_wishlist() {
  let store = seeded();
  let resp = send(
    api_router(store.clone()),
    "POST",
    "/gifts",
    Some(KATE),
    Some(json!({
      "wishlist_id": 4,
      "name": "Scarf",
      "price": "1 500 ₽",
      "link": "https://example.com/scarf",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = json_body(resp).await;
  assert_eq!(body["id"], 20);
  assert_eq!(body["owner_name"], KATE);
  assert_eq!(body["status"], "available");

  let gifts = store.list_gifts_of(WishlistId(4)).unwrap();
  assert_eq!(gifts.last().map(|g| g.id), Some(GiftId(20)));
}

#[tokio::test]
async fn add_gift_to_foreign_wishlist() {
  let resp = send(
    api_router(seeded()),
    "POST",
    "/gifts",
    Some(KATE),
    Some(json!({ "wishlist_id": 1, "name": "Scarf" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn add_gift_rejects_bad_link() {
  let resp = send(
    api_router(seeded()),
    "POST",
    "/gifts",
    Some(KATE),
    Some(json!({ "wishlist_id": 4, "name": "Scarf", "link": "ftp://x" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_gift_owner_only() {
  let store = seeded();
  let resp = send(api_router(store.clone()), "DELETE", "/gifts/6", Some(KATE), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = send(api_router(store.clone()), "DELETE", "/gifts/6", Some(ALEKSANDRA), None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  assert!(store.get_gift(GiftId(6)).unwrap().is_none());

  let resp = send(api_router(store), "DELETE", "/gifts/6", Some(ALEKSANDRA), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_gift_keeps_reservation() {
  let store = seeded();
  let resp = send(
    api_router(store.clone()),
    "PUT",
    "/gifts/2",
    Some(ALEKSANDRA),
    Some(json!({ "name": "Bigger mug", "price": "2 000 ₽", "link": "" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body["name"], "Bigger mug");
  assert_eq!(body["price"], "2 000 ₽");
  assert!(body["link"].is_null());
  assert_eq!(body["reserved_by"], KATE);

  let gift = store.get_gift(GiftId(2)).unwrap().unwrap();
  assert_eq!(gift.name, "Bigger mug");
  assert_eq!(gift.link, None);
}

#[tokio::test]
async fn update_gift_owner_only_and_validated() {
  let store = seeded();
  let resp = send(
    api_router(store.clone()),
    "PUT",
    "/gifts/2",
    Some(KATE),
    Some(json!({ "name": "Hijacked" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = send(
    api_router(store),
    "PUT",
    "/gifts/2",
    Some(ALEKSANDRA),
    Some(json!({ "link": "https://[" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ─── Reservations ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reserve_then_conflict() {
  let store = seeded();
  let resp = send(
    api_router(store.clone()),
    "POST",
    "/wishlists/2/gifts/7/reserve",
    Some(KATE),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body["status"], "reserved");
  assert_eq!(body["reserved_by"], KATE);

  let resp = send(
    api_router(store),
    "POST",
    "/wishlists/2/gifts/7/reserve",
    Some("bob"),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn reserve_own_gift_forbidden() {
  let resp = send(
    api_router(seeded()),
    "POST",
    "/wishlists/2/gifts/7/reserve",
    Some(ALEKSANDRA),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn reserve_gift_of_other_wishlist() {
  let resp = send(
    api_router(seeded()),
    "POST",
    "/wishlists/1/gifts/7/reserve",
    Some(KATE),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(json_body(resp).await["error"], "gift 7 not found");
}

#[tokio::test]
async fn cancel_by_stranger_forbidden() {
  let resp = send(api_router(seeded()), "POST", "/gifts/2/cancel", Some("bob"), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn cancel_by_reserver_and_again() {
  let store = seeded();
  let resp = send(api_router(store.clone()), "POST", "/gifts/2/cancel", Some(KATE), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["status"], "available");

  let resp = send(api_router(store), "POST", "/gifts/2/cancel", Some("bob"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn cancel_by_owner() {
  let resp = send(
    api_router(seeded()),
    "POST",
    "/gifts/4/cancel",
    Some(ALEKSANDRA),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn my_reservations() {
  let resp = send(api_router(seeded()), "GET", "/reservations", Some(KATE), None).await;
  let body = json_body(resp).await;
  let ids: Vec<i64> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|g| g["id"].as_i64().unwrap())
    .collect();
  assert_eq!(ids, vec![2, 4]);

  let resp = send(api_router(seeded()), "GET", "/reservations", None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
