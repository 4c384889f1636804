//! Core types and trait definitions for the wishlist service.
//!
//! Holds the wishlist and gift model, the [`store::WishlistStore`] and
//! [`account::AccountStore`] traits, and the demo data set. No HTTP or
//! database code lives here.

pub mod account;
pub mod error;
pub mod gift;
pub mod seed;
pub mod store;
pub mod wishlist;

pub use error::{Error, Result};
