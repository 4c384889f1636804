//! `/users` endpoints: registration, token issue, and session management.

use axum::{
  Extension, Form, Json,
  extract::State,
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use wishlist_api::Caller;
use wishlist_core::{
  account::{AccessToken, AccountStore, NewUser, User},
  store::WishlistStore,
};

use crate::{AppState, auth::bearer_token, error::Error};

/// Response body of `POST /users/register`.
#[derive(Debug, Serialize)]
pub struct Registered {
  pub login:   String,
  pub email:   String,
  pub user_id: i64,
}

/// `POST /users/register` — JSON `{login, email, password}`, 201 on success.
pub async fn register<S, A>(
  State(state): State<AppState<S, A>>,
  Json(input): Json<NewUser>,
) -> Result<impl IntoResponse, Error>
where
  S: WishlistStore,
  A: AccountStore,
{
  let user = state.accounts.register(input).await?;
  Ok((
    StatusCode::CREATED,
    Json(Registered {
      login:   user.login,
      email:   user.email,
      user_id: user.user_id,
    }),
  ))
}

/// OAuth2 password-grant style form.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
  /// Login or email address.
  pub username: String,
  pub password: String,
}

/// `POST /users/token` — form `username`, `password`.
pub async fn token<S, A>(
  State(state): State<AppState<S, A>>,
  Form(form): Form<TokenForm>,
) -> Result<Json<AccessToken>, Error>
where
  S: WishlistStore,
  A: AccountStore,
{
  let user = state
    .accounts
    .authenticate(&form.username, &form.password)
    .await?;
  let token = state.accounts.issue_token(user.user_id).await?;
  info!(user_id = user.user_id, "token issued");
  Ok(Json(token))
}

/// `GET /users/me`
pub async fn me(_caller: Caller, Extension(user): Extension<User>) -> Json<User> { Json(user) }

/// `POST /users/logout` — revokes the token the request was made with.
pub async fn logout<S, A>(
  State(state): State<AppState<S, A>>,
  caller: Caller,
  headers: HeaderMap,
) -> Result<StatusCode, Error>
where
  S: WishlistStore,
  A: AccountStore,
{
  let token = bearer_token(&headers)?.ok_or(Error::InvalidToken)?;
  state.accounts.revoke_token(token).await?;
  info!(user_id = caller.user_id, "token revoked");
  Ok(StatusCode::NO_CONTENT)
}
