//! Sign-up, sign-in and the bearer-session extractor.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/signup`  | Body: `{"email","password","full_name"?}`; 201 |
//! | `POST` | `/auth/signin`  | Body: `{"email","password"}`; 401 on mismatch |
//! | `POST` | `/auth/signout` | 204 |
//! | `GET`  | `/auth/session` | The signed-in user |
//!
//! Tokens are 32 random bytes, URL-safe base64. The store only ever sees the
//! hex SHA-256 of a token.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, StatusCode, header, request::Parts},
  response::IntoResponse,
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use brainai_core::account::{self, ProfileInput, Session};
use chrono::Utc;
use rand_core::{OsRng, RngCore as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use uuid::Uuid;

use crate::{AppState, Store, error::ApiError};

// ─── Tokens and passwords ────────────────────────────────────────────────────

/// A fresh, unguessable bearer token.
pub fn generate_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  B64.encode(bytes)
}

/// The digest under which a token's session is stored.
pub fn hash_token(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
    .is_ok()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The owner of the current request, resolved from its bearer session.
#[derive(Debug, Clone)]
pub struct CurrentUser {
  pub user_id:    Uuid,
  /// Digest of the presented token, for sign-out.
  pub token_hash: String,
}

impl<S: Store> FromRequestParts<AppState<S>> for CurrentUser {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
    let token_hash = hash_token(token);

    let session = state
      .store
      .get_session(token_hash.clone())
      .await
      .map_err(ApiError::store)?
      .ok_or(ApiError::Unauthorized)?;

    if session.is_expired(Utc::now()) {
      tracing::debug!(user_id = %session.user_id, "rejected expired session");
      state
        .store
        .delete_session(token_hash)
        .await
        .map_err(ApiError::store)?;
      return Err(ApiError::Unauthorized);
    }

    Ok(CurrentUser { user_id: session.user_id, token_hash })
  }
}

// ─── Bodies ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignUpBody {
  pub email:     String,
  pub password:  String,
  pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInBody {
  pub email:    String,
  pub password: String,
}

/// The signed-in user as the client sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
  pub user_id:    Uuid,
  pub email:      String,
  pub full_name:  Option<String>,
  pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
  pub token: String,
  pub user:  SessionUser,
}

async fn session_user<S: Store>(store: &S, user_id: Uuid) -> Result<SessionUser, ApiError> {
  let account = store
    .get_account(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;
  let profile = store.get_profile(user_id).await.map_err(ApiError::store)?;

  Ok(SessionUser {
    user_id,
    email: account.email,
    full_name: profile.as_ref().and_then(|p| p.full_name.clone()),
    avatar_url: profile.and_then(|p| p.avatar_url),
  })
}

/// Mint a session for `user_id`, pruning expired ones on the way.
async fn issue_session<S: Store>(state: &AppState<S>, user_id: Uuid) -> Result<String, ApiError> {
  let token = generate_token();
  let now = Utc::now();
  state
    .store
    .delete_expired_sessions(now)
    .await
    .map_err(ApiError::store)?;
  state
    .store
    .create_session(Session {
      token_hash: hash_token(&token),
      user_id,
      created_at: now,
      expires_at: now + state.config.session_ttl,
    })
    .await
    .map_err(ApiError::store)?;
  Ok(token)
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `POST /auth/signup`
pub async fn signup<S: Store>(
  State(state): State<AppState<S>>,
  Json(body): Json<SignUpBody>,
) -> Result<impl IntoResponse, ApiError> {
  let email = account::normalize_email(&body.email)?;
  account::validate_password(&body.password)?;

  let hash = hash_password(&body.password)?;
  let account = state
    .store
    .create_account(email.clone(), hash)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::Conflict(format!("{email} is already registered")))?;

  let full_name = body
    .full_name
    .map(|n| n.trim().to_owned())
    .filter(|n| !n.is_empty());
  state
    .store
    .upsert_profile(account.user_id, ProfileInput { full_name, bio: None })
    .await
    .map_err(ApiError::store)?;

  let token = issue_session(&state, account.user_id).await?;
  let user = session_user(&*state.store, account.user_id).await?;
  Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// `POST /auth/signin`
pub async fn signin<S: Store>(
  State(state): State<AppState<S>>,
  Json(body): Json<SignInBody>,
) -> Result<Json<AuthResponse>, ApiError> {
  // A malformed address cannot belong to anyone.
  let email = account::normalize_email(&body.email).map_err(|_| ApiError::Unauthorized)?;

  let account = state
    .store
    .find_account_by_email(email)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  if !verify_password(&body.password, &account.password_hash) {
    tracing::info!(user_id = %account.user_id, "sign-in rejected");
    return Err(ApiError::Unauthorized);
  }

  let token = issue_session(&state, account.user_id).await?;
  let user = session_user(&*state.store, account.user_id).await?;
  Ok(Json(AuthResponse { token, user }))
}

/// `POST /auth/signout`
pub async fn signout<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
) -> Result<StatusCode, ApiError> {
  state
    .store
    .delete_session(user.token_hash)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /auth/session`
pub async fn session<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
) -> Result<Json<SessionUser>, ApiError> {
  Ok(Json(session_user(&*state.store, user.user_id).await?))
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  #[test]
  fn tokens_are_unique_and_url_safe() {
    let a = generate_token();
    let b = generate_token();
    assert_ne!(a, b);
    assert_eq!(a.len(), 43);
    assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
  }

  #[test]
  fn token_hash_is_hex_sha256() {
    let h = hash_token("abc");
    assert_eq!(h, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
  }

  #[test]
  fn password_round_trip() {
    let phc = hash_password("hunter22").unwrap();
    assert!(verify_password("hunter22", &phc));
    assert!(!verify_password("hunter23", &phc));
    assert!(!verify_password("hunter22", "not-a-phc-string"));
  }

  #[test]
  fn bearer_header_parsing() {
    let mut headers = HeaderMap::new();
    assert_eq!(bearer_token(&headers), None);

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
    assert_eq!(bearer_token(&headers), None);

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
    assert_eq!(bearer_token(&headers), Some("tok"));
  }
}
