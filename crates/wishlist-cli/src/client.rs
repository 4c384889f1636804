//! Async HTTP client wrapping the wishlist JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use reqwest::{Client, Method, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;
use wishlist_core::{
  account::{AccessToken, User},
  gift::{Gift, GiftId, StatusKind},
  wishlist::{Wishlist, WishlistId},
};

/// Connection settings for the wishlist server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Bearer token from a previous `login`, if any.
  pub token:    Option<String>,
}

/// Body of `POST /api/wishlists`.
#[derive(Debug, Serialize)]
pub struct NewWishlist {
  pub title:       String,
  pub description: String,
  pub event_date:  NaiveDate,
  pub is_private:  bool,
}

/// Body of `POST /api/gifts`.
#[derive(Debug, Serialize)]
pub struct NewGift {
  pub wishlist_id: WishlistId,
  pub name:        String,
  pub price:       String,
  pub description: String,
  pub link:        Option<String>,
}

/// Body of `PUT /api/wishlists/<id>`. Unset fields are left unchanged.
#[derive(Debug, Default, Serialize)]
pub struct WishlistChanges {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub event_date:  Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub is_private:  Option<bool>,
}

/// Body of `PUT /api/gifts/<id>`. An empty `link` clears it.
#[derive(Debug, Default, Serialize)]
pub struct GiftChanges {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub price:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub link:        Option<String>,
}

/// Async HTTP client for the wishlist server.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.config.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  /// Fail with the server's `{"error": ...}` message on a non-2xx response.
  async fn check(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<Value>()
      .await
      .ok()
      .and_then(|v| v["error"].as_str().map(str::to_owned))
      .unwrap_or_else(|| status.to_string());
    Err(anyhow!("{what} → {status}: {message}"))
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
    debug!(path, "GET");
    let what = format!("GET {path}");
    let resp = self
      .auth(self.client.get(self.url(path)))
      .query(query)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    Self::check(resp, &what)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising {path}"))
  }

  async fn send_json<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
  where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
  {
    debug!(path, %method, "sending");
    let what = format!("{method} {path}");
    let mut req = self.auth(self.client.request(method, self.url(path)));
    if let Some(body) = body {
      req = req.json(body);
    }
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    Self::check(resp, &what)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising {path}"))
  }

  async fn delete(&self, path: &str) -> Result<()> {
    debug!(path, "DELETE");
    let what = format!("DELETE {path}");
    let resp = self
      .auth(self.client.delete(self.url(path)))
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    Self::check(resp, &what).await?;
    Ok(())
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  /// `POST /users/register` — sent without the saved token, which may have
  /// expired.
  pub async fn register(&self, login: &str, email: &str, password: &str) -> Result<Value> {
    let body = serde_json::json!({ "login": login, "email": email, "password": password });
    let resp = self
      .client
      .post(self.url("/users/register"))
      .json(&body)
      .send()
      .await
      .context("POST /users/register failed")?;
    Self::check(resp, "POST /users/register")
      .await?
      .json()
      .await
      .context("deserialising registration")
  }

  /// `POST /users/token` — returns the bearer token.
  pub async fn login(&self, username: &str, password: &str) -> Result<String> {
    let resp = self
      .client
      .post(self.url("/users/token"))
      .form(&[("username", username), ("password", password)])
      .send()
      .await
      .context("POST /users/token failed")?;
    let token: AccessToken = Self::check(resp, "POST /users/token")
      .await?
      .json()
      .await
      .context("deserialising access token")?;
    if token.access_token.is_empty() {
      bail!("server returned an empty access token");
    }
    Ok(token.access_token)
  }

  /// `POST /users/logout`
  pub async fn logout(&self) -> Result<()> {
    let resp = self
      .auth(self.client.post(self.url("/users/logout")))
      .send()
      .await
      .context("POST /users/logout failed")?;
    Self::check(resp, "POST /users/logout").await?;
    Ok(())
  }

  /// `GET /users/me`
  pub async fn me(&self) -> Result<User> { self.get_json("/users/me", &[]).await }

  // ── Wishlists ─────────────────────────────────────────────────────────────

  /// `GET /api/wishlists[?owner=<login>]`
  pub async fn list_wishlists(&self, owner: Option<&str>) -> Result<Vec<Wishlist>> {
    let query: Vec<_> = owner.map(|o| ("owner", o.to_owned())).into_iter().collect();
    self.get_json("/api/wishlists", &query).await
  }

  /// `GET /api/wishlists/<id>`
  pub async fn get_wishlist(&self, id: WishlistId) -> Result<Wishlist> {
    self.get_json(&format!("/api/wishlists/{id}"), &[]).await
  }

  /// `GET /api/wishlists/by-link?link=<link>`
  pub async fn find_by_link(&self, link: &str) -> Result<Wishlist> {
    self
      .get_json("/api/wishlists/by-link", &[("link", link.to_owned())])
      .await
  }

  /// `POST /api/wishlists`
  pub async fn create_wishlist(&self, input: &NewWishlist) -> Result<Wishlist> {
    self.send_json(Method::POST, "/api/wishlists", Some(input)).await
  }

  /// `PUT /api/wishlists/<id>`
  pub async fn update_wishlist(&self, id: WishlistId, changes: &WishlistChanges) -> Result<Wishlist> {
    self
      .send_json(Method::PUT, &format!("/api/wishlists/{id}"), Some(changes))
      .await
  }

  /// `POST /api/wishlists/<id>/regenerate-link`
  pub async fn regenerate_link(&self, id: WishlistId) -> Result<Wishlist> {
    self
      .send_json::<(), _>(Method::POST, &format!("/api/wishlists/{id}/regenerate-link"), None)
      .await
  }

  /// `DELETE /api/wishlists/<id>`
  pub async fn delete_wishlist(&self, id: WishlistId) -> Result<()> {
    self.delete(&format!("/api/wishlists/{id}")).await
  }

  // ── Gifts ─────────────────────────────────────────────────────────────────

  /// `GET /api/wishlists/<id>/gifts`, or `GET /api/gifts` without a wishlist.
  pub async fn list_gifts(
    &self,
    wishlist: Option<WishlistId>,
    status: Option<StatusKind>,
  ) -> Result<Vec<Gift>> {
    let mut gifts: Vec<Gift> = match wishlist {
      Some(id) => self.get_json(&format!("/api/wishlists/{id}/gifts"), &[]).await?,
      None => {
        let query: Vec<_> = status.map(|s| ("status", s.to_string())).into_iter().collect();
        self.get_json("/api/gifts", &query).await?
      }
    };
    if let Some(kind) = status {
      gifts.retain(|g| g.status.kind() == kind);
    }
    Ok(gifts)
  }

  /// `POST /api/gifts`
  pub async fn add_gift(&self, input: &NewGift) -> Result<Gift> {
    self.send_json(Method::POST, "/api/gifts", Some(input)).await
  }

  /// `PUT /api/gifts/<id>`
  pub async fn update_gift(&self, id: GiftId, changes: &GiftChanges) -> Result<Gift> {
    self
      .send_json(Method::PUT, &format!("/api/gifts/{id}"), Some(changes))
      .await
  }

  /// `DELETE /api/gifts/<id>`
  pub async fn delete_gift(&self, id: GiftId) -> Result<()> {
    self.delete(&format!("/api/gifts/{id}")).await
  }

  // ── Reservations ──────────────────────────────────────────────────────────

  /// `POST /api/wishlists/<id>/gifts/<gift_id>/reserve`
  pub async fn reserve(&self, wishlist: WishlistId, gift: GiftId) -> Result<Gift> {
    self
      .send_json::<(), _>(
        Method::POST,
        &format!("/api/wishlists/{wishlist}/gifts/{gift}/reserve"),
        None,
      )
      .await
  }

  /// `POST /api/gifts/<id>/cancel`
  pub async fn cancel(&self, gift: GiftId) -> Result<Gift> {
    self
      .send_json::<(), _>(Method::POST, &format!("/api/gifts/{gift}/cancel"), None)
      .await
  }

  /// `GET /api/reservations`
  pub async fn reservations(&self) -> Result<Vec<Gift>> { self.get_json("/api/reservations", &[]).await }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn unset_changes_are_not_sent() {
    let changes = WishlistChanges { is_private: Some(false), ..Default::default() };
    assert_eq!(serde_json::to_value(&changes).unwrap(), json!({ "is_private": false }));

    let changes = GiftChanges { link: Some(String::new()), ..Default::default() };
    assert_eq!(serde_json::to_value(&changes).unwrap(), json!({ "link": "" }));
  }
}
