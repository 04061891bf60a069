//! Handlers for `/preferences` (the settings page).

use axum::{Json, extract::State};
use brainai_core::account::Preferences;

use crate::{AppState, CurrentUser, Store, error::ApiError};

/// `GET /preferences`: defaults until the user saves once.
pub async fn get_one<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
) -> Result<Json<Preferences>, ApiError> {
  let prefs = state
    .store
    .get_preferences(user.user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(prefs))
}

/// `PUT /preferences`: missing fields take their defaults.
pub async fn update<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(prefs): Json<Preferences>,
) -> Result<Json<Preferences>, ApiError> {
  let prefs = state
    .store
    .put_preferences(user.user_id, prefs)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(prefs))
}
