//! The `RecordStore` trait: create/read/update/delete for the three record
//! kinds, always scoped by the owning user.
//!
//! The trait is implemented by storage backends (e.g. `brainai-store-sqlite`).
//! Higher layers (`brainai-api`, the activity aggregator) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  activity::ActivityItem,
  record::{
    Conversation, ConversationInput, Event, EventInput, Note, NoteInput,
    RecordKind,
  },
};

/// Abstraction over the owner-scoped record collections.
///
/// Every method takes the caller's `owner` id. A record owned by someone else
/// is indistinguishable from a missing one: reads return `None`, updates
/// return `None` and deletes return `false`.
///
/// Creates and updates validate their input and fail without touching the
/// store when it is invalid. Updates replace all editable fields and refresh
/// `updated_at`. Deletes are immediate and irreversible.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Notes ─────────────────────────────────────────────────────────────

  fn create_note(
    &self,
    owner: Uuid,
    input: NoteInput,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + '_;

  /// All notes of `owner`, most recently updated first.
  fn list_notes(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + '_;

  fn get_note(
    &self,
    owner: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Note>, Self::Error>> + Send + '_;

  fn update_note(
    &self,
    owner: Uuid,
    id: Uuid,
    input: NoteInput,
  ) -> impl Future<Output = Result<Option<Note>, Self::Error>> + Send + '_;

  fn delete_note(
    &self,
    owner: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Events ────────────────────────────────────────────────────────────

  fn create_event(
    &self,
    owner: Uuid,
    input: EventInput,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  /// All events of `owner` in calendar order: by date, then time (untimed
  /// events first), then creation.
  fn list_events(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  fn get_event(
    &self,
    owner: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  fn update_event(
    &self,
    owner: Uuid,
    id: Uuid,
    input: EventInput,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  fn delete_event(
    &self,
    owner: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Conversations ─────────────────────────────────────────────────────

  fn create_conversation(
    &self,
    owner: Uuid,
    input: ConversationInput,
  ) -> impl Future<Output = Result<Conversation, Self::Error>> + Send + '_;

  /// All conversations of `owner`, most recently updated first.
  fn list_conversations(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<Conversation>, Self::Error>> + Send + '_;

  fn get_conversation(
    &self,
    owner: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Conversation>, Self::Error>> + Send + '_;

  fn update_conversation(
    &self,
    owner: Uuid,
    id: Uuid,
    input: ConversationInput,
  ) -> impl Future<Output = Result<Option<Conversation>, Self::Error>> + Send + '_;

  fn delete_conversation(
    &self,
    owner: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Aggregates ────────────────────────────────────────────────────────

  /// Number of records of `kind` owned by `owner`.
  fn count(
    &self,
    owner: Uuid,
    kind: RecordKind,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// The `limit` most recently created records of `kind`, newest first,
  /// projected to the activity-feed shape.
  fn recent(
    &self,
    owner: Uuid,
    kind: RecordKind,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ActivityItem>, Self::Error>> + Send + '_;
}
