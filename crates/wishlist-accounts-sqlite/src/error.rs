//! Error type for `wishlist-accounts-sqlite`.

use thiserror::Error;
use wishlist_core::account::AccountError;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Account(#[from] AccountError),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("password hashing error: {0}")]
  Hash(String),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl From<Error> for AccountError {
  fn from(e: Error) -> Self {
    match e {
      Error::Account(inner) => inner,
      other => AccountError::Backend(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
