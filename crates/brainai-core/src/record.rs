//! Record types: the three sibling kinds a user owns.
//!
//! Notes, events and conversations share nothing but the owner id. There are
//! no references between them; each is created, edited and deleted on its
//! own.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Which collection a record lives in. The declaration order is the
/// secondary sort key of the activity feed.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordKind {
  Note,
  Event,
  Conversation,
}

impl RecordKind {
  pub const ALL: [RecordKind; 3] =
    [RecordKind::Note, RecordKind::Event, RecordKind::Conversation];
}

/// Accessors shared by every record kind.
pub trait Record {
  fn kind(&self) -> RecordKind;
  fn id(&self) -> Uuid;
  fn owner_id(&self) -> Uuid;
  fn title(&self) -> &str;
  fn created_at(&self) -> DateTime<Utc>;
  fn updated_at(&self) -> DateTime<Utc>;
}

fn require(field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::EmptyField(field));
  }
  Ok(())
}

// ─── Note ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  pub id:         Uuid,
  pub owner_id:   Uuid,
  pub title:      String,
  pub content:    String,
  #[serde(default)]
  pub tags:       Vec<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// The user-editable part of a note. Used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
  pub title:   String,
  pub content: String,
  #[serde(default)]
  pub tags:    Vec<String>,
}

impl NoteInput {
  pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
    Self { title: title.into(), content: content.into(), tags: Vec::new() }
  }

  pub fn with_tags<I, T>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    self.tags = tags.into_iter().map(Into::into).collect();
    self
  }

  pub fn validate(&self) -> Result<()> {
    require("title", &self.title)?;
    require("content", &self.content)
  }

  /// Tags trimmed, with blanks and repeats dropped. First occurrence wins.
  pub fn normalized_tags(&self) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(self.tags.len());
    for tag in &self.tags {
      let tag = tag.trim();
      if !tag.is_empty() && !out.iter().any(|t| t == tag) {
        out.push(tag.to_owned());
      }
    }
    out
  }
}

impl Record for Note {
  fn kind(&self) -> RecordKind { RecordKind::Note }
  fn id(&self) -> Uuid { self.id }
  fn owner_id(&self) -> Uuid { self.owner_id }
  fn title(&self) -> &str { &self.title }
  fn created_at(&self) -> DateTime<Utc> { self.created_at }
  fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
}

// ─── Event ───────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventStatus {
  #[default]
  Upcoming,
  Ongoing,
  Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub id:          Uuid,
  pub owner_id:    Uuid,
  pub title:       String,
  pub description: String,
  /// Calendar day the event happens on.
  pub date:        NaiveDate,
  pub time:        Option<NaiveTime>,
  pub location:    Option<String>,
  pub status:      EventStatus,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInput {
  pub title:       String,
  #[serde(default)]
  pub description: String,
  pub date:        NaiveDate,
  pub time:        Option<NaiveTime>,
  pub location:    Option<String>,
  #[serde(default)]
  pub status:      EventStatus,
}

impl EventInput {
  pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
    Self {
      title: title.into(),
      description: String::new(),
      date,
      time: None,
      location: None,
      status: EventStatus::default(),
    }
  }

  pub fn validate(&self) -> Result<()> { require("title", &self.title) }

  /// The location with surrounding whitespace removed; blank becomes `None`.
  pub fn normalized_location(&self) -> Option<String> {
    self
      .location
      .as_deref()
      .map(str::trim)
      .filter(|l| !l.is_empty())
      .map(str::to_owned)
  }
}

impl Record for Event {
  fn kind(&self) -> RecordKind { RecordKind::Event }
  fn id(&self) -> Uuid { self.id }
  fn owner_id(&self) -> Uuid { self.owner_id }
  fn title(&self) -> &str { &self.title }
  fn created_at(&self) -> DateTime<Utc> { self.created_at }
  fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
}

// ─── Conversation ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
  pub id:         Uuid,
  pub owner_id:   Uuid,
  pub title:      String,
  pub content:    String,
  /// Name of the other party.
  pub person:     Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationInput {
  pub title:   String,
  #[serde(default)]
  pub content: String,
  pub person:  Option<String>,
}

impl ConversationInput {
  pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
    Self { title: title.into(), content: content.into(), person: None }
  }

  pub fn validate(&self) -> Result<()> { require("title", &self.title) }
}

impl Record for Conversation {
  fn kind(&self) -> RecordKind { RecordKind::Conversation }
  fn id(&self) -> Uuid { self.id }
  fn owner_id(&self) -> Uuid { self.owner_id }
  fn title(&self) -> &str { &self.title }
  fn created_at(&self) -> DateTime<Utc> { self.created_at }
  fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn blank_note_title_is_rejected() {
    let err = NoteInput::new("   ", "body").validate().unwrap_err();
    assert!(matches!(err, Error::EmptyField("title")));
  }

  #[test]
  fn blank_note_content_is_rejected() {
    let err = NoteInput::new("title", "").validate().unwrap_err();
    assert!(matches!(err, Error::EmptyField("content")));
  }

  #[test]
  fn conversation_only_needs_a_title() {
    assert!(ConversationInput::new("Standup", "").validate().is_ok());
    assert!(ConversationInput::new("", "words").validate().is_err());
  }

  #[test]
  fn event_title_is_required() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    assert!(EventInput::new("Launch", date).validate().is_ok());
    assert!(matches!(
      EventInput::new("\t", date).validate(),
      Err(Error::EmptyField("title"))
    ));
  }

  #[test]
  fn tags_are_trimmed_and_deduplicated() {
    let input =
      NoteInput::new("t", "c").with_tags([" work ", "", "ideas", "work"]);
    assert_eq!(input.normalized_tags(), vec!["work", "ideas"]);
  }

  #[test]
  fn blank_location_normalizes_to_none() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let mut input = EventInput::new("Launch", date);
    input.location = Some("  ".into());
    assert_eq!(input.normalized_location(), None);
    input.location = Some(" Berlin ".into());
    assert_eq!(input.normalized_location().as_deref(), Some("Berlin"));
  }

  #[test]
  fn kinds_use_lowercase_names() {
    assert_eq!(RecordKind::Conversation.to_string(), "conversation");
    assert_eq!(RecordKind::from_str("event").unwrap(), RecordKind::Event);
    assert_eq!(
      serde_json::to_string(&EventStatus::Ongoing).unwrap(),
      "\"ongoing\""
    );
  }
}
