//! Handlers for `/events` endpoints.
//!
//! Events are listed in calendar order (date, then time; all-day first).
//! `?q=` matches title, description and location.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use brainai_core::record::{Event, EventInput};
use uuid::Uuid;

use crate::{AppState, CurrentUser, ListParams, Store, error::ApiError};

/// `GET /events[?q=<text>]`
pub async fn list<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Event>>, ApiError> {
  let mut events = state
    .store
    .list_events(user.user_id)
    .await
    .map_err(ApiError::store)?;

  let filter = params.filter();
  events.retain(|e| filter.matches(e));
  Ok(Json(events))
}

/// `POST /events`
pub async fn create<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(input): Json<EventInput>,
) -> Result<impl IntoResponse, ApiError> {
  input.validate()?;
  let event = state
    .store
    .create_event(user.user_id, input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /events/{id}`
pub async fn get_one<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
  state
    .store
    .get_event(user.user_id, id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("event {id} not found")))
}

/// `PUT /events/{id}`
pub async fn update<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
  Json(input): Json<EventInput>,
) -> Result<Json<Event>, ApiError> {
  input.validate()?;
  state
    .store
    .update_event(user.user_id, id, input)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("event {id} not found")))
}

/// `DELETE /events/{id}`
pub async fn remove<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  if state
    .store
    .delete_event(user.user_id, id)
    .await
    .map_err(ApiError::store)?
  {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("event {id} not found")))
  }
}
