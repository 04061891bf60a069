//! Handlers for `/conversations` endpoints.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use brainai_core::record::{Conversation, ConversationInput};
use uuid::Uuid;

use crate::{AppState, CurrentUser, ListParams, Store, error::ApiError};

fn not_found(id: Uuid) -> ApiError { ApiError::NotFound(format!("conversation {id} not found")) }

/// `GET /conversations[?q=<text>]`
pub async fn list<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Conversation>>, ApiError> {
  let mut conversations = state
    .store
    .list_conversations(user.user_id)
    .await
    .map_err(ApiError::store)?;

  let filter = params.filter();
  conversations.retain(|c| filter.matches(c));
  Ok(Json(conversations))
}

/// `POST /conversations`
pub async fn create<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(input): Json<ConversationInput>,
) -> Result<impl IntoResponse, ApiError> {
  input.validate()?;
  let conversation = state
    .store
    .create_conversation(user.user_id, input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(conversation)))
}

/// `GET /conversations/{id}`
pub async fn get_one<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Conversation>, ApiError> {
  state
    .store
    .get_conversation(user.user_id, id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found(id))
}

/// `PUT /conversations/{id}`
pub async fn update<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
  Json(input): Json<ConversationInput>,
) -> Result<Json<Conversation>, ApiError> {
  input.validate()?;
  state
    .store
    .update_conversation(user.user_id, id, input)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found(id))
}

/// `DELETE /conversations/{id}`
pub async fn remove<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let deleted = state
    .store
    .delete_conversation(user.user_id, id)
    .await
    .map_err(ApiError::store)?;
  if deleted { Ok(StatusCode::NO_CONTENT) } else { Err(not_found(id)) }
}
