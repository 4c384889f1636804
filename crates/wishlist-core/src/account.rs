//! User accounts and bearer-token sessions.
//!
//! The wishlist store itself knows nothing about users beyond an owner or
//! claimant name. This module describes the contract of the account service
//! that turns credentials into those names.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Types ───────────────────────────────────────────────────────────────────

/// A registered user. The password hash never leaves the account store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    i64,
  pub login:      String,
  pub email:      String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`AccountStore::register`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub login:    String,
  pub email:    String,
  pub password: String,
}

impl NewUser {
  /// Check field lengths and the rough shape of the email address.
  pub fn validate(&self) -> Result<(), AccountError> {
    let login_len = self.login.chars().count();
    if !(3..=50).contains(&login_len) {
      return Err(AccountError::Invalid(
        "login must be between 3 and 50 characters".into(),
      ));
    }
    if self.login.trim() != self.login {
      return Err(AccountError::Invalid(
        "login must not start or end with whitespace".into(),
      ));
    }
    if !looks_like_email(&self.email) {
      return Err(AccountError::Invalid(format!(
        "{:?} is not a valid email address",
        self.email
      )));
    }
    let password_len = self.password.chars().count();
    if !(8..=128).contains(&password_len) {
      return Err(AccountError::Invalid(
        "password must be between 8 and 128 characters".into(),
      ));
    }
    Ok(())
  }
}

fn looks_like_email(s: &str) -> bool {
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !s.chars().any(char::is_whitespace)
    && !domain.contains('@')
    && domain
      .split_once('.')
      .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
    && !domain.ends_with('.')
}

/// A freshly issued bearer token, shaped like an OAuth2 token response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
  pub access_token: String,
  pub token_type:   String,
}

impl AccessToken {
  pub fn bearer(token: String) -> Self {
    Self {
      access_token: token,
      token_type:   "bearer".into(),
    }
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AccountError {
  #[error("invalid input: {0}")]
  Invalid(String),

  #[error("login is already taken")]
  LoginTaken,

  #[error("email is already taken")]
  EmailTaken,

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("user not found: {0}")]
  UserNotFound(i64),

  #[error("backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the account backend (e.g. `wishlist-accounts-sqlite`).
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait AccountStore: Send + Sync {
  /// Create a user. Fails with [`AccountError::LoginTaken`] or
  /// [`AccountError::EmailTaken`] when either is already registered.
  fn register(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, AccountError>> + Send + '_;

  /// Check a password. `identifier` is tried as a login first, then as an
  /// email address.
  fn authenticate<'a>(
    &'a self,
    identifier: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<User, AccountError>> + Send + 'a;

  /// Issue a new bearer token for an existing user.
  fn issue_token(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<AccessToken, AccountError>> + Send + '_;

  /// Resolve a bearer token. Unknown, revoked, and expired tokens all resolve
  /// to `None`.
  fn resolve_token<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<Option<User>, AccountError>> + Send + 'a;

  /// Revoke a token. Returns `false` if it was not known.
  fn revoke_token<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<bool, AccountError>> + Send + 'a;
}
