//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::path::Path;

use brainai_core::{
  activity::ActivityItem,
  record::{
    Conversation, ConversationInput, Event, EventInput, Note, NoteInput,
    RecordKind,
  },
  store::RecordStore,
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    CONVERSATION_COLUMNS, EVENT_COLUMNS, NOTE_COLUMNS, RawActivity,
    RawConversation, RawEvent, RawNote, encode_date, encode_dt, encode_status,
    encode_tags, encode_time, encode_uuid, now, table_for,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A BrainAi store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
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

  /// Delete one owned row from `table`. `false` when nothing matched.
  async fn delete_owned(&self, table: &'static str, owner: Uuid, id: Uuid) -> Result<bool> {
    let id_str    = encode_uuid(id);
    let owner_str = encode_uuid(owner);

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          &format!("DELETE FROM {table} WHERE id = ?1 AND owner_id = ?2"),
          rusqlite::params![id_str, owner_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    if deleted {
      tracing::debug!(%owner, %id, table, "deleted record");
    }
    Ok(deleted)
  }

  async fn fetch_note(&self, sql: String, params: Vec<String>) -> Result<Option<Note>> {
    let raw: Option<RawNote> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), RawNote::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawNote::into_note).transpose()
  }

  async fn fetch_event(&self, sql: String, params: Vec<String>) -> Result<Option<Event>> {
    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), RawEvent::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawEvent::into_event).transpose()
  }

  async fn fetch_conversation(
    &self,
    sql: String,
    params: Vec<String>,
  ) -> Result<Option<Conversation>> {
    let raw: Option<RawConversation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params_from_iter(params),
              RawConversation::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawConversation::into_conversation).transpose()
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  // ── Notes ─────────────────────────────────────────────────────────────────

  async fn create_note(&self, owner: Uuid, input: NoteInput) -> Result<Note> {
    input.validate()?;

    let at = now();
    let note = Note {
      id:         Uuid::new_v4(),
      owner_id:   owner,
      title:      input.title.trim().to_owned(),
      content:    input.content.clone(),
      tags:       input.normalized_tags(),
      created_at: at,
      updated_at: at,
    };

    let id_str    = encode_uuid(note.id);
    let owner_str = encode_uuid(owner);
    let title     = note.title.clone();
    let content   = note.content.clone();
    let tags_str  = encode_tags(&note.tags)?;
    let at_str    = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notes (id, owner_id, title, content, tags, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
          rusqlite::params![id_str, owner_str, title, content, tags_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(note)
  }

  async fn list_notes(&self, owner: Uuid) -> Result<Vec<Note>> {
    let owner_str = encode_uuid(owner);

    let raws: Vec<RawNote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {NOTE_COLUMNS} FROM notes
           WHERE owner_id = ?1
           ORDER BY updated_at DESC, id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], RawNote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNote::into_note).collect()
  }

  async fn get_note(&self, owner: Uuid, id: Uuid) -> Result<Option<Note>> {
    self
      .fetch_note(
        format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1 AND owner_id = ?2"),
        vec![encode_uuid(id), encode_uuid(owner)],
      )
      .await
  }

  async fn update_note(&self, owner: Uuid, id: Uuid, input: NoteInput) -> Result<Option<Note>> {
    input.validate()?;

    let id_str    = encode_uuid(id);
    let owner_str = encode_uuid(owner);
    let title     = input.title.trim().to_owned();
    let tags_str  = encode_tags(&input.normalized_tags())?;
    let content   = input.content;
    let at_str    = encode_dt(now());

    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE notes SET title = ?1, content = ?2, tags = ?3, updated_at = ?4
           WHERE id = ?5 AND owner_id = ?6",
          rusqlite::params![title, content, tags_str, at_str, id_str, owner_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    if !changed {
      return Ok(None);
    }
    self.get_note(owner, id).await
  }

  async fn delete_note(&self, owner: Uuid, id: Uuid) -> Result<bool> {
    self.delete_owned("notes", owner, id).await
  }

  // ── Events ────────────────────────────────────────────────────────────────

  async fn create_event(&self, owner: Uuid, input: EventInput) -> Result<Event> {
    input.validate()?;

    let at = now();
    let event = Event {
      id:          Uuid::new_v4(),
      owner_id:    owner,
      title:       input.title.trim().to_owned(),
      description: input.description.clone(),
      date:        input.date,
      time:        input.time,
      location:    input.normalized_location(),
      status:      input.status,
      created_at:  at,
      updated_at:  at,
    };

    let id_str      = encode_uuid(event.id);
    let owner_str   = encode_uuid(owner);
    let title       = event.title.clone();
    let description = event.description.clone();
    let date_str    = encode_date(event.date);
    let time_str    = event.time.map(encode_time);
    let location    = event.location.clone();
    let status_str  = encode_status(event.status);
    let at_str      = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (
             id, owner_id, title, description, date, time,
             location, status, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
          rusqlite::params![
            id_str,
            owner_str,
            title,
            description,
            date_str,
            time_str,
            location,
            status_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(event)
  }

  async fn list_events(&self, owner: Uuid) -> Result<Vec<Event>> {
    let owner_str = encode_uuid(owner);

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        // `time IS NOT NULL` sorts untimed (all-day) events first.
        let mut stmt = conn.prepare(&format!(
          "SELECT {EVENT_COLUMNS} FROM events
           WHERE owner_id = ?1
           ORDER BY date ASC, time IS NOT NULL, time ASC, created_at ASC, id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn get_event(&self, owner: Uuid, id: Uuid) -> Result<Option<Event>> {
    self
      .fetch_event(
        format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1 AND owner_id = ?2"),
        vec![encode_uuid(id), encode_uuid(owner)],
      )
      .await
  }

  async fn update_event(&self, owner: Uuid, id: Uuid, input: EventInput) -> Result<Option<Event>> {
    input.validate()?;

    let id_str      = encode_uuid(id);
    let owner_str   = encode_uuid(owner);
    let title       = input.title.trim().to_owned();
    let location    = input.normalized_location();
    let description = input.description;
    let date_str    = encode_date(input.date);
    let time_str    = input.time.map(encode_time);
    let status_str  = encode_status(input.status);
    let at_str      = encode_dt(now());

    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE events
           SET title = ?1, description = ?2, date = ?3, time = ?4,
               location = ?5, status = ?6, updated_at = ?7
           WHERE id = ?8 AND owner_id = ?9",
          rusqlite::params![
            title,
            description,
            date_str,
            time_str,
            location,
            status_str,
            at_str,
            id_str,
            owner_str,
          ],
        )?;
        Ok(n > 0)
      })
      .await?;

    if !changed {
      return Ok(None);
    }
    self.get_event(owner, id).await
  }

  async fn delete_event(&self, owner: Uuid, id: Uuid) -> Result<bool> {
    self.delete_owned("events", owner, id).await
  }

  // ── Conversations ─────────────────────────────────────────────────────────

  async fn create_conversation(
    &self,
    owner: Uuid,
    input: ConversationInput,
  ) -> Result<Conversation> {
    input.validate()?;

    let at = now();
    let conversation = Conversation {
      id:         Uuid::new_v4(),
      owner_id:   owner,
      title:      input.title.trim().to_owned(),
      content:    input.content,
      person:     input.person.filter(|p| !p.trim().is_empty()),
      created_at: at,
      updated_at: at,
    };

    let id_str    = encode_uuid(conversation.id);
    let owner_str = encode_uuid(owner);
    let title     = conversation.title.clone();
    let content   = conversation.content.clone();
    let person    = conversation.person.clone();
    let at_str    = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO conversations (id, owner_id, title, content, person, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
          rusqlite::params![id_str, owner_str, title, content, person, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(conversation)
  }

  async fn list_conversations(&self, owner: Uuid) -> Result<Vec<Conversation>> {
    let owner_str = encode_uuid(owner);

    let raws: Vec<RawConversation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CONVERSATION_COLUMNS} FROM conversations
           WHERE owner_id = ?1
           ORDER BY updated_at DESC, id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], RawConversation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawConversation::into_conversation).collect()
  }

  async fn get_conversation(&self, owner: Uuid, id: Uuid) -> Result<Option<Conversation>> {
    self
      .fetch_conversation(
        format!(
          "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = ?1 AND owner_id = ?2"
        ),
        vec![encode_uuid(id), encode_uuid(owner)],
      )
      .await
  }

  async fn update_conversation(
    &self,
    owner: Uuid,
    id: Uuid,
    input: ConversationInput,
  ) -> Result<Option<Conversation>> {
    input.validate()?;

    let id_str    = encode_uuid(id);
    let owner_str = encode_uuid(owner);
    let title     = input.title.trim().to_owned();
    let content   = input.content;
    let person    = input.person.filter(|p| !p.trim().is_empty());
    let at_str    = encode_dt(now());

    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE conversations SET title = ?1, content = ?2, person = ?3, updated_at = ?4
           WHERE id = ?5 AND owner_id = ?6",
          rusqlite::params![title, content, person, at_str, id_str, owner_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    if !changed {
      return Ok(None);
    }
    self.get_conversation(owner, id).await
  }

  async fn delete_conversation(&self, owner: Uuid, id: Uuid) -> Result<bool> {
    self.delete_owned("conversations", owner, id).await
  }

  // ── Aggregates ────────────────────────────────────────────────────────────

  async fn count(&self, owner: Uuid, kind: RecordKind) -> Result<u64> {
    let table     = table_for(kind);
    let owner_str = encode_uuid(owner);

    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!("SELECT COUNT(*) FROM {table} WHERE owner_id = ?1"),
          rusqlite::params![owner_str],
          |r| r.get(0),
        )?)
      })
      .await?;

    Ok(n.max(0) as u64)
  }

  async fn recent(&self, owner: Uuid, kind: RecordKind, limit: usize) -> Result<Vec<ActivityItem>> {
    let table     = table_for(kind);
    let owner_str = encode_uuid(owner);
    let limit_val = limit as i64;

    let raws: Vec<RawActivity> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT id, title, created_at FROM {table}
           WHERE owner_id = ?1
           ORDER BY created_at DESC, id ASC
           LIMIT ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str, limit_val], |row| {
            Ok(RawActivity {
              id:         row.get(0)?,
              title:      row.get(1)?,
              created_at: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(|r| r.into_item(kind)).collect()
  }
}
