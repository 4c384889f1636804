//! JSON REST API over a [`WishlistStore`].
//!
//! Exposes an axum [`Router`] backed by any [`wishlist_core::store::WishlistStore`].
//! Authentication, TLS and transport concerns are the caller's
//! responsibility: an outer layer is expected to insert a [`Caller`] into the
//! request extensions for authenticated requests.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", wishlist_api::api_router(store.clone()))
//! ```

pub mod caller;
pub mod error;
pub mod gifts;
pub mod reservations;
pub mod validate;
pub mod wishlists;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use wishlist_core::store::WishlistStore;

pub use caller::Caller;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: WishlistStore + 'static,
{
  Router::new()
    // Wishlists
    .route(
      "/wishlists",
      get(wishlists::list::<S>).post(wishlists::create::<S>),
    )
    .route("/wishlists/by-link", get(wishlists::by_link::<S>))
    .route(
      "/wishlists/{id}",
      get(wishlists::get_one::<S>)
        .put(wishlists::update::<S>)
        .delete(wishlists::delete_one::<S>),
    )
    .route("/wishlists/{id}/gifts", get(wishlists::gifts::<S>))
    .route(
      "/wishlists/{id}/regenerate-link",
      post(wishlists::regenerate_link::<S>),
    )
    // Gifts
    .route("/gifts", get(gifts::list::<S>).post(gifts::create::<S>))
    .route(
      "/gifts/{id}",
      get(gifts::get_one::<S>)
        .put(gifts::update::<S>)
        .delete(gifts::delete_one::<S>),
    )
    // Reservations
    .route(
      "/wishlists/{id}/gifts/{gift_id}/reserve",
      post(reservations::reserve::<S>),
    )
    .route("/gifts/{id}/cancel", post(reservations::cancel::<S>))
    .route("/reservations", get(reservations::mine::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
