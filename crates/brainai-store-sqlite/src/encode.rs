//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond
//! precision and a `Z` suffix, so lexical order equals chronological order.
//! Calendar dates and times of day use ISO 8601. Tags and preferences are
//! compact JSON. UUIDs are hyphenated lowercase strings.

use std::str::FromStr;

use brainai_core::{
  account::{Account, Profile, Session},
  activity::ActivityItem,
  record::{Conversation, Event, EventStatus, Note, RecordKind},
};
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, SubsecRound, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Calendar date / time of day ──────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_time(t: NaiveTime) -> String { t.format(TIME_FORMAT).to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, TIME_FORMAT).map_err(|e| Error::DateParse(e.to_string()))
}

// ─── EventStatus ──────────────────────────────────────────────────────────────

pub fn encode_status(s: EventStatus) -> String { s.as_ref().to_owned() }

pub fn decode_status(s: &str) -> Result<EventStatus> {
  EventStatus::from_str(s).map_err(|_| Error::Decode(format!("event status {s:?}")))
}

// ─── Tags ─────────────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &[String]) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Tables ───────────────────────────────────────────────────────────────────

pub fn table_for(kind: RecordKind) -> &'static str {
  match kind {
    RecordKind::Note => "notes",
    RecordKind::Event => "events",
    RecordKind::Conversation => "conversations",
  }
}

// ─── Row types ────────────────────────────────────────────────────────────────

pub const NOTE_COLUMNS: &str =
  "id, owner_id, title, content, tags, created_at, updated_at";

/// Raw strings read directly from a `notes` row.
pub struct RawNote {
  pub id:         String,
  pub owner_id:   String,
  pub title:      String,
  pub content:    String,
  pub tags:       String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawNote {
  /// Row mapper for `SELECT {NOTE_COLUMNS}`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      owner_id:   row.get(1)?,
      title:      row.get(2)?,
      content:    row.get(3)?,
      tags:       row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      id:         decode_uuid(&self.id)?,
      owner_id:   decode_uuid(&self.owner_id)?,
      title:      self.title,
      content:    self.content,
      tags:       decode_tags(&self.tags)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub const EVENT_COLUMNS: &str = "id, owner_id, title, description, date, time, \
                                 location, status, created_at, updated_at";

/// Raw strings read directly from an `events` row.
pub struct RawEvent {
  pub id:          String,
  pub owner_id:    String,
  pub title:       String,
  pub description: String,
  pub date:        String,
  pub time:        Option<String>,
  pub location:    Option<String>,
  pub status:      String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawEvent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      owner_id:    row.get(1)?,
      title:       row.get(2)?,
      description: row.get(3)?,
      date:        row.get(4)?,
      time:        row.get(5)?,
      location:    row.get(6)?,
      status:      row.get(7)?,
      created_at:  row.get(8)?,
      updated_at:  row.get(9)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      id:          decode_uuid(&self.id)?,
      owner_id:    decode_uuid(&self.owner_id)?,
      title:       self.title,
      description: self.description,
      date:        decode_date(&self.date)?,
      time:        self.time.as_deref().map(decode_time).transpose()?,
      location:    self.location,
      status:      decode_status(&self.status)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

pub const CONVERSATION_COLUMNS: &str =
  "id, owner_id, title, content, person, created_at, updated_at";

/// Raw strings read directly from a `conversations` row.
pub struct RawConversation {
  pub id:         String,
  pub owner_id:   String,
  pub title:      String,
  pub content:    String,
  pub person:     Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawConversation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      owner_id:   row.get(1)?,
      title:      row.get(2)?,
      content:    row.get(3)?,
      person:     row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn into_conversation(self) -> Result<Conversation> {
    Ok(Conversation {
      id:         decode_uuid(&self.id)?,
      owner_id:   decode_uuid(&self.owner_id)?,
      title:      self.title,
      content:    self.content,
      person:     self.person,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// `id, title, created_at` of any record table.
pub struct RawActivity {
  pub id:         String,
  pub title:      String,
  pub created_at: String,
}

impl RawActivity {
  pub fn into_item(self, kind: RecordKind) -> Result<ActivityItem> {
    Ok(ActivityItem {
      id: decode_uuid(&self.id)?,
      kind,
      title: self.title,
      timestamp: decode_dt(&self.created_at)?,
    })
  }
}

// ─── Account rows ─────────────────────────────────────────────────────────────

pub struct RawAccount {
  pub user_id:       String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawAccount {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      email:         row.get(1)?,
      password_hash: row.get(2)?,
      created_at:    row.get(3)?,
    })
  }

  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      user_id:       decode_uuid(&self.user_id)?,
      email:         self.email,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawSession {
  pub token_hash: String,
  pub user_id:    String,
  pub created_at: String,
  pub expires_at: String,
}

impl RawSession {
  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      token_hash: self.token_hash,
      user_id:    decode_uuid(&self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
      expires_at: decode_dt(&self.expires_at)?,
    })
  }
}

pub struct RawProfile {
  pub user_id:    String,
  pub full_name:  Option<String>,
  pub bio:        Option<String>,
  pub avatar_url: Option<String>,
  pub updated_at: String,
}

impl RawProfile {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      full_name:  row.get(1)?,
      bio:        row.get(2)?,
      avatar_url: row.get(3)?,
      updated_at: row.get(4)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      user_id:    decode_uuid(&self.user_id)?,
      full_name:  self.full_name,
      bio:        self.bio,
      avatar_url: self.avatar_url,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let a = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let b = a + chrono::Duration::microseconds(1);
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(decode_dt(&encode_dt(b)).unwrap(), b);
  }

  #[test]
  fn unknown_status_is_a_decode_error() {
    assert!(matches!(decode_status("cancelled"), Err(Error::Decode(_))));
  }

  #[test]
  fn status_column_values_are_lowercase_names() {
    for (status, stored) in [
      (EventStatus::Upcoming, "upcoming"),
      (EventStatus::Ongoing, "ongoing"),
      (EventStatus::Completed, "completed"),
    ] {
      assert_eq!(encode_status(status), stored);
      assert_eq!(decode_status(stored).unwrap(), status);
    }
  }
}
