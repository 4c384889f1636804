//! HTTP server for the wishlist service.
//!
//! Wraps [`wishlist_api`] with bearer-token authentication backed by an
//! [`AccountStore`], plus the `/users` endpoints that issue those tokens.

pub mod auth;
pub mod error;
pub mod users;

pub use error::{ConfigError, Error};

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, middleware, routing::{get, post}};
use chrono::TimeDelta;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use wishlist_core::{account::AccountStore, store::WishlistStore};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `WISHLIST_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  /// SQLite file holding users and tokens.
  pub accounts_path:   PathBuf,
  pub token_ttl_hours: i64,
  /// Start with the demo wishlists instead of an empty store.
  pub seed_demo_data:  bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            "127.0.0.1".into(),
      port:            8000,
      accounts_path:   PathBuf::from("wishlist.db"),
      token_ttl_hours: 12,
      seed_demo_data:  true,
    }
  }
}

impl ServerConfig {
  /// Lifetime of issued bearer tokens. Must be a positive number of hours.
  pub fn token_ttl(&self) -> Result<TimeDelta, ConfigError> {
    let hours = self.token_ttl_hours;
    if hours <= 0 {
      return Err(ConfigError::TokenTtl(hours));
    }
    TimeDelta::try_hours(hours).ok_or(ConfigError::TokenTtl(hours))
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the server's own handlers and middleware.
pub struct AppState<S, A> {
  pub store:    Arc<S>,
  pub accounts: Arc<A>,
}

impl<S, A> Clone for AppState<S, A> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      accounts: self.accounts.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
///
/// Every request passes through the bearer middleware; the wishlist API is
/// nested under `/api`.
pub fn router<S, A>(state: AppState<S, A>) -> Router
where
  S: WishlistStore + 'static,
  A: AccountStore + 'static,
{
  let api = wishlist_api::api_router(state.store.clone());

  Router::new()
    .route("/",               get(banner))
    .route("/health",         get(health))
    .route("/users/register", post(users::register::<S, A>))
    .route("/users/token",    post(users::token::<S, A>))
    .route("/users/me",       get(users::me))
    .route("/users/logout",   post(users::logout::<S, A>))
    .with_state(state.clone())
    .nest("/api", api)
    .layer(middleware::from_fn_with_state(state, auth::bearer::<S, A>))
    .layer(TraceLayer::new_for_http())
}

async fn banner() -> Json<Value> { Json(json!({ "message": "Wishlist API is running" })) }

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }
