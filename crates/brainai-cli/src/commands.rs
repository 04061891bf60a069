//! Subcommand dispatch and plain-text rendering.
//!
//! Lists are fetched whole and filtered here with [`RecordFilter`], the same
//! way the dashboard pages filter in the browser.

use std::fmt::Write as _;

use anyhow::Result;
use brainai_core::{
  activity::ActivityItem,
  filter::{RecordFilter, tag_cloud},
  record::{
    Conversation, ConversationInput, Event, EventInput, Note, NoteInput,
  },
};
use chrono::NaiveTime;

use crate::{
  Command, ConversationsCommand, EventsCommand, NotesCommand,
  client::{ApiClient, AuthResponse, Dashboard},
};

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
  NaiveTime::parse_from_str(s, "%H:%M")
    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
    .map_err(|e| format!("invalid time {s:?}: {e}"))
}

/// Execute `command` and return what should be printed.
pub(crate) async fn run(client: &ApiClient, command: Command) -> Result<String> {
  match command {
    Command::Signup { email, password, full_name } => {
      brainai_core::account::normalize_email(&email)?;
      brainai_core::account::validate_password(&password)?;
      let auth = client.sign_up(&email, &password, full_name.as_deref()).await?;
      Ok(render_auth(&auth))
    }
    Command::Signin { email, password } => {
      let auth = client.sign_in(&email, &password).await?;
      Ok(render_auth(&auth))
    }
    Command::Signout => {
      client.sign_out().await?;
      Ok("signed out".to_string())
    }
    Command::Whoami => {
      let user = client.session().await?;
      let name = user.full_name.as_deref().unwrap_or("-");
      let mut out = format!("{} <{}> ({})", name, user.email, user.user_id);
      if let Some(url) = &user.avatar_url {
        let _ = write!(out, "\navatar: {url}");
      }
      Ok(out)
    }
    Command::Dashboard => Ok(render_dashboard(&client.dashboard().await?)),
    Command::Notes(cmd) => notes(client, cmd).await,
    Command::Events(cmd) => events(client, cmd).await,
    Command::Conversations(cmd) => conversations(client, cmd).await,
    Command::Voice => {
      client.voice().await?;
      Ok(String::new())
    }
  }
}

async fn notes(client: &ApiClient, cmd: NotesCommand) -> Result<String> {
  match cmd {
    NotesCommand::List { search, tags } => {
      let all = client.list_notes().await?;
      let filter = RecordFilter::text(search.unwrap_or_default()).with_tags(tags);
      Ok(render_notes(&filter.apply(&all)))
    }
    NotesCommand::Tags => {
      let all = client.list_notes().await?;
      Ok(tag_cloud(&all).into_iter().collect::<Vec<_>>().join("\n"))
    }
    NotesCommand::Add { title, content, tags } => {
      let input = NoteInput::new(title, content).with_tags(tags);
      input.validate()?;
      let note = client.create_note(&input).await?;
      Ok(format!("created note {}", note.id))
    }
    NotesCommand::Rm { id } => {
      client.delete("notes", id).await?;
      Ok(format!("deleted note {id}"))
    }
  }
}

async fn events(client: &ApiClient, cmd: EventsCommand) -> Result<String> {
  match cmd {
    EventsCommand::List { search } => {
      let all = client.list_events().await?;
      let filter = RecordFilter::text(search.unwrap_or_default());
      Ok(render_events(&filter.apply(&all)))
    }
    EventsCommand::Add { title, date, time, location, description } => {
      let mut input = EventInput::new(title, date);
      input.time = time;
      input.location = location;
      input.description = description;
      input.validate()?;
      let event = client.create_event(&input).await?;
      Ok(format!("created event {}", event.id))
    }
    EventsCommand::Rm { id } => {
      client.delete("events", id).await?;
      Ok(format!("deleted event {id}"))
    }
  }
}

async fn conversations(client: &ApiClient, cmd: ConversationsCommand) -> Result<String> {
  match cmd {
    ConversationsCommand::List { search } => {
      let all = client.list_conversations().await?;
      let filter = RecordFilter::text(search.unwrap_or_default());
      Ok(render_conversations(&filter.apply(&all)))
    }
    ConversationsCommand::Add { title, content, person } => {
      let mut input = ConversationInput::new(title, content);
      input.person = person;
      input.validate()?;
      let conversation = client.create_conversation(&input).await?;
      Ok(format!("created conversation {}", conversation.id))
    }
    ConversationsCommand::Rm { id } => {
      client.delete("conversations", id).await?;
      Ok(format!("deleted conversation {id}"))
    }
  }
}

// ─── Rendering ────────────────────────────────────────────────────────────────

fn render_auth(auth: &AuthResponse) -> String {
  format!("signed in as {}\ntoken: {}", auth.user.email, auth.token)
}

fn render_dashboard(dash: &Dashboard) -> String {
  let mut out = format!(
    "notes: {}  events: {}  conversations: {}\n\nRecent activity",
    dash.stats.notes, dash.stats.events, dash.stats.conversations
  );
  if dash.recent_activity.is_empty() {
    out.push_str("\n  (nothing yet)");
  }
  for item in &dash.recent_activity {
    out.push('\n');
    out.push_str(&render_activity(item));
  }
  out
}

fn render_activity(item: &ActivityItem) -> String {
  format!(
    "  {}  {:<12} {}",
    item.timestamp.format("%Y-%m-%d %H:%M"),
    item.kind.as_ref(),
    item.title
  )
}

fn render_notes(notes: &[&Note]) -> String {
  let mut out = String::new();
  for note in notes {
    let _ = write!(out, "{}  {}", note.id, note.title);
    if !note.tags.is_empty() {
      let _ = write!(out, "  [{}]", note.tags.join(", "));
    }
    out.push('\n');
  }
  out.trim_end().to_string()
}

fn render_events(events: &[&Event]) -> String {
  events
    .iter()
    .map(|e| {
      let when = match e.time {
        Some(t) => format!("{} {}", e.date, t.format("%H:%M")),
        None => format!("{} all-day", e.date),
      };
      let at = e.location.as_deref().map(|l| format!(" @ {l}")).unwrap_or_default();
      format!("{}  {when}  {}{at} ({})", e.id, e.title, e.status.as_ref())
    })
    .collect::<Vec<_>>()
    .join("\n")
}

fn render_conversations(conversations: &[&Conversation]) -> String {
  conversations
    .iter()
    .map(|c| match &c.person {
      Some(p) => format!("{}  {} with {p}", c.id, c.title),
      None => format!("{}  {}", c.id, c.title),
    })
    .collect::<Vec<_>>()
    .join("\n")
}

#[cfg(test)]
mod tests {
  use brainai_core::{activity::DashboardStats, record::RecordKind};
  use chrono::{NaiveDate, TimeZone as _, Utc};
  use uuid::Uuid;

  use super::*;

  #[test]
  fn times_parse_with_or_without_seconds() {
    assert_eq!(parse_time("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    assert_eq!(parse_time("09:30:15").unwrap(), NaiveTime::from_hms_opt(9, 30, 15).unwrap());
    assert!(parse_time("9am").is_err());
  }

  #[test]
  fn empty_dashboard_says_so() {
    let dash = Dashboard { stats: DashboardStats::default(), recent_activity: vec![] };
    let out = render_dashboard(&dash);
    assert!(out.starts_with("notes: 0  events: 0  conversations: 0"));
    assert!(out.ends_with("(nothing yet)"));
  }

  #[test]
  fn activity_line_shows_kind_and_title() {
    let item = ActivityItem {
      id:        Uuid::nil(),
      kind:      RecordKind::Conversation,
      title:     "1:1 with Grace".into(),
      timestamp: Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap(),
    };
    assert_eq!(render_activity(&item), "  2026-03-02 09:30  conversation 1:1 with Grace");
  }

  #[test]
  fn events_render_all_day_and_location() {
    let now = Utc::now();
    let event = Event {
      id:          Uuid::nil(),
      owner_id:    Uuid::nil(),
      title:       "Offsite".into(),
      description: String::new(),
      date:        NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
      time:        None,
      location:    Some("Lisbon".into()),
      status:      Default::default(),
      created_at:  now,
      updated_at:  now,
    };
    let out = render_events(&[&event]);
    assert!(out.contains("2026-07-01 all-day  Offsite @ Lisbon (upcoming)"), "{out}");
  }
}
