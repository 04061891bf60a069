//! Handlers for `/notes` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/notes` | Optional `?q=<text>&tags=a,b` |
//! | `POST`   | `/notes` | Body: `{"title","content","tags"?}`; 201 |
//! | `GET`    | `/notes/{id}` | 404 if missing or not owned |
//! | `PUT`    | `/notes/{id}` | Full replacement of the editable fields |
//! | `DELETE` | `/notes/{id}` | 204 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use brainai_core::record::{Note, NoteInput};
use uuid::Uuid;

use crate::{AppState, CurrentUser, ListParams, Store, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /notes[?q=<text>&tags=<a,b>]`
pub async fn list<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Note>>, ApiError> {
  let mut notes = state
    .store
    .list_notes(user.user_id)
    .await
    .map_err(ApiError::store)?;

  let filter = params.filter();
  notes.retain(|n| filter.matches(n));
  Ok(Json(notes))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /notes`
pub async fn create<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(input): Json<NoteInput>,
) -> Result<impl IntoResponse, ApiError> {
  input.validate()?;
  let note = state
    .store
    .create_note(user.user_id, input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(note)))
}

// ─── Single note ──────────────────────────────────────────────────────────────

/// `GET /notes/{id}`
pub async fn get_one<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Note>, ApiError> {
  let note = state
    .store
    .get_note(user.user_id, id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("note {id} not found")))?;
  Ok(Json(note))
}

/// `PUT /notes/{id}`
pub async fn update<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
  Json(input): Json<NoteInput>,
) -> Result<Json<Note>, ApiError> {
  input.validate()?;
  let note = state
    .store
    .update_note(user.user_id, id, input)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("note {id} not found")))?;
  Ok(Json(note))
}

/// `DELETE /notes/{id}`
pub async fn remove<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let deleted = state
    .store
    .delete_note(user.user_id, id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("note {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
