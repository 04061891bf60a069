//! Profile editing and the public avatar bucket.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/profile` | 404 until a profile exists |
//! | `PUT`  | `/profile` | Body: `{"full_name"?,"bio"?}` |
//! | `PUT`  | `/profile/avatar` | Raw image body; `Content-Type` picks the format |
//! | `GET`  | `/avatars/{user}/{file}` | Public, no session |
//!
//! Avatars are stored content-addressed as
//! `<avatar_dir>/<user_id>/<sha256>.<ext>`.

use std::io::ErrorKind;

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, header},
  response::IntoResponse,
};
use brainai_core::{
  account::{Profile, ProfileInput},
  avatar,
};
use bytes::Bytes;
use sha2::{Digest as _, Sha256};
use uuid::Uuid;

use crate::{AppState, CurrentUser, Store, error::ApiError};

/// `GET /profile`
pub async fn get_one<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
) -> Result<Json<Profile>, ApiError> {
  state
    .store
    .get_profile(user.user_id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound("profile not found".to_string()))
}

/// `PUT /profile`
pub async fn update<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(input): Json<ProfileInput>,
) -> Result<Json<Profile>, ApiError> {
  let input = ProfileInput {
    full_name: trimmed(input.full_name),
    bio:       trimmed(input.bio),
  };
  let profile = state
    .store
    .upsert_profile(user.user_id, input)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(profile))
}

fn trimmed(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

// ─── Avatar bucket ────────────────────────────────────────────────────────────

/// `PUT /profile/avatar`
pub async fn upload_avatar<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<Profile>, ApiError> {
  let media_type = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default();
  let ext = avatar::validate_avatar(media_type, body.len())?;

  let previous = state
    .store
    .get_profile(user.user_id)
    .await
    .map_err(ApiError::store)?
    .and_then(|p| p.avatar_url);

  let file_name = format!("{}.{ext}", hex::encode(Sha256::digest(&body)));
  let dir = state.config.avatar_dir.join(user.user_id.to_string());
  tokio::fs::create_dir_all(&dir).await?;
  tokio::fs::write(dir.join(&file_name), &body).await?;

  let url = format!("/avatars/{}/{file_name}", user.user_id);
  let profile = state
    .store
    .set_avatar_url(user.user_id, url)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(user_id = %user.user_id, bytes = body.len(), "avatar uploaded");

  if let Some(old) = previous
    .as_deref()
    .and_then(|url| stored_file_name(url, user.user_id))
    .filter(|old| *old != file_name)
  {
    match tokio::fs::remove_file(dir.join(old)).await {
      Ok(()) => tracing::debug!(user_id = %user.user_id, file = old, "removed old avatar"),
      Err(e) if e.kind() == ErrorKind::NotFound => {}
      Err(e) => tracing::warn!(user_id = %user.user_id, file = old, error = %e, "could not remove old avatar"),
    }
  }

  Ok(Json(profile))
}

/// The bucket file behind `url`, if it is one of `user_id`'s own avatars.
fn stored_file_name(url: &str, user_id: Uuid) -> Option<&str> {
  url
    .strip_prefix("/avatars/")?
    .strip_prefix(user_id.to_string().as_str())?
    .strip_prefix('/')
    .filter(|name| is_plain_file_name(name))
}

/// Plain file names only; anything path-like never leaves the user's folder.
fn is_plain_file_name(name: &str) -> bool {
  !name.is_empty() && !name.contains(['/', '\\']) && !name.starts_with('.')
}

/// `GET /avatars/{user}/{file}`
pub async fn serve_avatar<S: Store>(
  State(state): State<AppState<S>>,
  Path((user, file)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
  let not_found = || ApiError::NotFound(format!("avatar {user}/{file} not found"));

  if !is_plain_file_name(&file) {
    return Err(not_found());
  }
  let media_type = avatar::media_type_for(&file).ok_or_else(not_found)?;

  let path = state.config.avatar_dir.join(user.to_string()).join(&file);
  let bytes = match tokio::fs::read(&path).await {
    Ok(bytes) => bytes,
    Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
    Err(e) => return Err(e.into()),
  };

  Ok(([(header::CONTENT_TYPE, media_type)], bytes))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stored_file_name_accepts_only_own_plain_files() {
    let me = Uuid::from_u128(7);
    let other = Uuid::from_u128(8);
    let url = format!("/avatars/{me}/abc.png");

    assert_eq!(stored_file_name(&url, me), Some("abc.png"));
    assert_eq!(stored_file_name(&url, other), None);
    assert_eq!(stored_file_name(&format!("/avatars/{me}/../x.png"), me), None);
    assert_eq!(stored_file_name(&format!("/avatars/{me}/"), me), None);
    assert_eq!(stored_file_name("https://cdn.example.com/a.png", me), None);
  }
}
