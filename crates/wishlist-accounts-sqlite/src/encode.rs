//! Conversions between domain types and the plain-text column values stored
//! in SQLite. Timestamps are RFC 3339 strings.

use chrono::{DateTime, Utc};
use wishlist_core::account::User;

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// A `users` row before timestamp decoding.
#[derive(Debug)]
pub struct RawUser {
  pub user_id:       i64,
  pub login:         String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
}

/// Column list matching [`RawUser::from_row`].
pub const USER_COLUMNS: &str = "user_id, login, email, password_hash, created_at";

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      login:         row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    self.user_id,
      login:      self.login,
      email:      self.email,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_survive_encoding() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)).unwrap(), now);
  }

  #[test]
  fn garbage_timestamp_is_an_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
