//! SQLite backend for wishlist user accounts and bearer tokens.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod secret;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteAccounts;
