//! [`SqliteAccounts`] — the SQLite implementation of [`AccountStore`].

use std::path::Path;

use chrono::{TimeDelta, Utc};
use rusqlite::{OptionalExtension as _, types::Value};
use tracing::{debug, info};

use wishlist_core::account::{
  AccessToken, AccountError, AccountStore, NewUser, User,
};

use crate::{
  Result,
  encode::{RawUser, USER_COLUMNS, decode_dt, encode_dt},
  schema::SCHEMA,
  secret::{generate_token, hash_password, token_digest, verify_password},
};

/// Joins a token digest to its user; columns match [`RawUser::from_row`]
/// followed by the expiry.
const TOKEN_LOOKUP: &str = "
SELECT u.user_id, u.login, u.email, u.password_hash, u.created_at, t.expires_at
  FROM tokens t
  JOIN users u ON u.user_id = t.user_id
 WHERE t.token_hash = ?1";

// ─── Store ───────────────────────────────────────────────────────────────────

/// User accounts and bearer tokens backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteAccounts {
  conn:      tokio_rusqlite::Connection,
  token_ttl: TimeDelta,
}

/// Which unique column a lookup goes through.
#[derive(Clone, Copy)]
enum UserKey {
  Id,
  Login,
  Email,
}

impl UserKey {
  fn column(self) -> &'static str {
    match self {
      Self::Id => "user_id",
      Self::Login => "login",
      Self::Email => "email",
    }
  }
}

impl SqliteAccounts {
  /// Open (or create) a store at `path` and run schema initialisation.
  /// Tokens issued by the store stay valid for `token_ttl`.
  pub async fn open(path: impl AsRef<Path>, token_ttl: TimeDelta) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, token_ttl };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory(token_ttl: TimeDelta) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, token_ttl };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a user row (password hash included) by one unique column.
  async fn find_user(&self, key: UserKey, value: Value) -> Result<Option<RawUser>> {
    let sql = format!(
      "SELECT {USER_COLUMNS} FROM users WHERE {} = ?1",
      key.column()
    );
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  async fn register_user(&self, input: NewUser) -> Result<User> {
    input.validate()?;

    let password_hash = hash_password(&input.password)?;
    let created_at = Utc::now();
    let created_str = encode_dt(created_at);
    let (login, email) = (input.login, input.email);
    let (login_col, email_col) = (login.clone(), email.clone());

    // The uniqueness checks and the insert share one closure, so no other
    // statement on this connection can run between them.
    let user_id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let taken = |column: &str, value: &str| -> rusqlite::Result<bool> {
          tx.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM users WHERE {column} = ?1)"),
            rusqlite::params![value],
            |row| row.get(0),
          )
        };
        if taken("login", &login_col)? {
          return Ok(Err(AccountError::LoginTaken));
        }
        if taken("email", &email_col)? {
          return Ok(Err(AccountError::EmailTaken));
        }

        tx.execute(
          "INSERT INTO users (login, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![login_col, email_col, password_hash, created_str],
        )?;
        let user_id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Ok(user_id))
      })
      .await??;

    info!(user_id, %login, "user registered");
    Ok(User { user_id, login, email, created_at })
  }

  async fn authenticate_user(&self, identifier: &str, password: &str) -> Result<User> {
    let raw = match self.find_user(UserKey::Login, Value::Text(identifier.to_owned())).await? {
      Some(raw) => Some(raw),
      None => self.find_user(UserKey::Email, Value::Text(identifier.to_owned())).await?,
    };

    // Unknown users and wrong passwords are indistinguishable to the caller.
    let raw = raw.ok_or(AccountError::InvalidCredentials)?;
    if !verify_password(password, &raw.password_hash) {
      debug!(user_id = raw.user_id, "password rejected");
      return Err(AccountError::InvalidCredentials.into());
    }
    raw.into_user()
  }

  async fn issue(&self, user_id: i64) -> Result<AccessToken> {
    if self.find_user(UserKey::Id, Value::Integer(user_id)).await?.is_none() {
      return Err(AccountError::UserNotFound(user_id).into());
    }

    let token = generate_token();
    let digest = token_digest(&token);
    let issued_at = Utc::now();
    let issued_str = encode_dt(issued_at);
    let expires_str = encode_dt(issued_at + self.token_ttl);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tokens (token_hash, user_id, issued_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![digest, user_id, issued_str, expires_str],
        )?;
        Ok(())
      })
      .await?;

    debug!(user_id, "token issued");
    Ok(AccessToken::bearer(token))
  }

  async fn resolve(&self, token: &str) -> Result<Option<User>> {
    let digest = token_digest(token);
    let row: Option<(RawUser, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(TOKEN_LOOKUP, rusqlite::params![digest], |row| {
              Ok((RawUser::from_row(row)?, row.get(5)?))
            })
            .optional()?,
        )
      })
      .await?;

    let Some((raw, expires_at)) = row else {
      return Ok(None);
    };
    if decode_dt(&expires_at)? <= Utc::now() {
      debug!(user_id = raw.user_id, "expired token presented");
      self.revoke(token).await?;
      return Ok(None);
    }
    raw.into_user().map(Some)
  }

  async fn revoke(&self, token: &str) -> Result<bool> {
    let digest = token_digest(token);
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM tokens WHERE token_hash = ?1",
          rusqlite::params![digest],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteAccounts {
  async fn register(&self, input: NewUser) -> Result<User, AccountError> {
    Ok(self.register_user(input).await?)
  }

  async fn authenticate<'a>(
    &'a self,
    identifier: &'a str,
    password: &'a str,
  ) -> Result<User, AccountError> {
    Ok(self.authenticate_user(identifier, password).await?)
  }

  async fn issue_token(&self, user_id: i64) -> Result<AccessToken, AccountError> {
    Ok(self.issue(user_id).await?)
  }

  async fn resolve_token<'a>(&'a self, token: &'a str) -> Result<Option<User>, AccountError> {
    Ok(self.resolve(token).await?)
  }

  async fn revoke_token<'a>(&'a self, token: &'a str) -> Result<bool, AccountError> {
    Ok(self.revoke(token).await?)
  }
}
