//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use brainai_core::{
  account::{AccountStore, Preferences, ProfileInput, Session},
  activity::{self, DashboardStats},
  record::{
    ConversationInput, EventInput, EventStatus, NoteInput, RecordKind,
  },
  store::RecordStore,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// Keep consecutive writes on distinct timestamps.
async fn tick() { tokio::time::sleep(Duration::from_millis(3)).await }

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

// ─── Notes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_note() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let note = s
    .create_note(owner, NoteInput::new("  Groceries ", "milk").with_tags([" home ", "home", ""]))
    .await
    .unwrap();
  assert_eq!(note.title, "Groceries");
  assert_eq!(note.tags, vec!["home".to_string()]);
  assert_eq!(note.created_at, note.updated_at);

  let fetched = s.get_note(owner, note.id).await.unwrap().unwrap();
  assert_eq!(fetched, note);
}

#[tokio::test]
async fn invalid_note_is_rejected_before_writing() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let err = s.create_note(owner, NoteInput::new("   ", "body")).await.unwrap_err();
  assert!(matches!(err, Error::Core(ref e) if e.is_validation()));
  let err = s.create_note(owner, NoteInput::new("Title", "")).await.unwrap_err();
  assert!(matches!(err, Error::Core(_)));

  assert_eq!(s.count(owner, RecordKind::Note).await.unwrap(), 0);
}

#[tokio::test]
async fn notes_are_scoped_by_owner() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  let note = s.create_note(alice, NoteInput::new("Private", "x")).await.unwrap();

  assert!(s.get_note(bob, note.id).await.unwrap().is_none());
  assert!(s.list_notes(bob).await.unwrap().is_empty());
  assert!(s.update_note(bob, note.id, NoteInput::new("Hijack", "y")).await.unwrap().is_none());
  assert!(!s.delete_note(bob, note.id).await.unwrap());

  // Still intact for the real owner.
  let fetched = s.get_note(alice, note.id).await.unwrap().unwrap();
  assert_eq!(fetched.title, "Private");
}

#[tokio::test]
async fn update_note_bumps_updated_at_only() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let note = s.create_note(owner, NoteInput::new("Draft", "v1")).await.unwrap();
  tick().await;

  let updated = s
    .update_note(owner, note.id, NoteInput::new("Final", "v2").with_tags(["done"]))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.title, "Final");
  assert_eq!(updated.tags, vec!["done".to_string()]);
  assert_eq!(updated.created_at, note.created_at);
  assert!(updated.updated_at > note.updated_at);
}

#[tokio::test]
async fn notes_list_most_recently_updated_first() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let a = s.create_note(owner, NoteInput::new("A", "a")).await.unwrap();
  tick().await;
  let b = s.create_note(owner, NoteInput::new("B", "b")).await.unwrap();
  tick().await;
  s.update_note(owner, a.id, NoteInput::new("A2", "a")).await.unwrap();

  let ids: Vec<_> = s.list_notes(owner).await.unwrap().into_iter().map(|n| n.id).collect();
  assert_eq!(ids, vec![a.id, b.id]);
}

#[tokio::test]
async fn delete_note_reports_whether_it_existed() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let note = s.create_note(owner, NoteInput::new("Gone", "soon")).await.unwrap();

  assert!(s.delete_note(owner, note.id).await.unwrap());
  assert!(!s.delete_note(owner, note.id).await.unwrap());
  assert!(s.get_note(owner, note.id).await.unwrap().is_none());
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn event_round_trips_optional_fields() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let mut input = EventInput::new("Standup", date(2026, 3, 2));
  input.time = NaiveTime::from_hms_opt(9, 30, 0);
  input.location = Some("  Room 4 ".into());
  input.status = EventStatus::Ongoing;

  let event = s.create_event(owner, input).await.unwrap();
  assert_eq!(event.location.as_deref(), Some("Room 4"));

  let fetched = s.get_event(owner, event.id).await.unwrap().unwrap();
  assert_eq!(fetched, event);
  assert_eq!(fetched.status, EventStatus::Ongoing);
}

#[tokio::test]
async fn events_list_by_date_with_untimed_first() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let mut late = EventInput::new("Late", date(2026, 3, 2));
  late.time = NaiveTime::from_hms_opt(17, 0, 0);
  let mut early = EventInput::new("Early", date(2026, 3, 2));
  early.time = NaiveTime::from_hms_opt(8, 0, 0);
  let all_day = EventInput::new("All day", date(2026, 3, 2));
  let before = EventInput::new("Yesterday", date(2026, 3, 1));

  for input in [late, early, all_day, before] {
    s.create_event(owner, input).await.unwrap();
  }

  let titles: Vec<_> = s.list_events(owner).await.unwrap().into_iter().map(|e| e.title).collect();
  assert_eq!(titles, vec!["Yesterday", "All day", "Early", "Late"]);
}

#[tokio::test]
async fn update_event_clears_time() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let mut input = EventInput::new("Lunch", date(2026, 4, 1));
  input.time = NaiveTime::from_hms_opt(12, 0, 0);
  let event = s.create_event(owner, input).await.unwrap();

  let mut edit = EventInput::new("Lunch", date(2026, 4, 2));
  edit.status = EventStatus::Completed;
  let updated = s.update_event(owner, event.id, edit).await.unwrap().unwrap();
  assert_eq!(updated.time, None);
  assert_eq!(updated.date, date(2026, 4, 2));
  assert_eq!(updated.status, EventStatus::Completed);
}

// ─── Conversations ───────────────────────────────────────────────────────────

#[tokio::test]
async fn conversation_crud() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let mut input = ConversationInput::new("1:1", "Talked about goals");
  input.person = Some("Grace".into());
  let convo = s.create_conversation(owner, input).await.unwrap();
  assert_eq!(convo.person.as_deref(), Some("Grace"));

  let mut edit = ConversationInput::new("1:1 follow-up", "");
  edit.person = Some("  ".into());
  let updated = s.update_conversation(owner, convo.id, edit).await.unwrap().unwrap();
  assert_eq!(updated.title, "1:1 follow-up");
  assert_eq!(updated.person, None);

  assert_eq!(s.list_conversations(owner).await.unwrap().len(), 1);
  assert!(s.delete_conversation(owner, convo.id).await.unwrap());
  assert!(s.list_conversations(owner).await.unwrap().is_empty());
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn counts_are_per_owner_and_kind() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let other = Uuid::new_v4();

  s.create_note(owner, NoteInput::new("a", "a")).await.unwrap();
  s.create_note(owner, NoteInput::new("b", "b")).await.unwrap();
  s.create_event(owner, EventInput::new("e", date(2026, 1, 1))).await.unwrap();
  s.create_note(other, NoteInput::new("c", "c")).await.unwrap();

  let stats = DashboardStats::collect(&s, owner).await;
  assert_eq!(stats, DashboardStats { notes: 2, events: 1, conversations: 0 });
}

#[tokio::test]
async fn recent_returns_newest_created_first() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let mut ids = Vec::new();
  for title in ["one", "two", "three"] {
    ids.push(s.create_note(owner, NoteInput::new(title, "x")).await.unwrap().id);
    tick().await;
  }

  let recent = s.recent(owner, RecordKind::Note, 2).await.unwrap();
  assert_eq!(recent.len(), 2);
  assert_eq!(recent[0].id, ids[2]);
  assert_eq!(recent[1].id, ids[1]);
  assert!(recent.iter().all(|i| i.kind == RecordKind::Note));
}

#[tokio::test]
async fn activity_feed_takes_two_per_kind() {
  let s = store().await;
  let owner = Uuid::new_v4();

  for title in ["n1", "n2", "n3"] {
    s.create_note(owner, NoteInput::new(title, "x")).await.unwrap();
    tick().await;
  }
  s.create_event(owner, EventInput::new("e1", date(2026, 5, 5))).await.unwrap();

  let feed = activity::collect(&s, owner).await;
  let titles: Vec<_> = feed.iter().map(|i| i.title.as_str()).collect();
  assert_eq!(titles, vec!["e1", "n3", "n2"]);
}

#[tokio::test]
async fn activity_feed_is_empty_for_new_owner() {
  let s = store().await;
  assert!(activity::collect(&s, Uuid::new_v4()).await.is_empty());
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn account_lookup_by_email_and_id() {
  let s = store().await;
  let account = s
    .create_account("ada@example.com".into(), "$argon2id$stub".into())
    .await
    .unwrap()
    .unwrap();

  let by_email = s.find_account_by_email("ada@example.com".into()).await.unwrap().unwrap();
  assert_eq!(by_email.user_id, account.user_id);
  assert_eq!(by_email.password_hash, "$argon2id$stub");

  let by_id = s.get_account(account.user_id).await.unwrap().unwrap();
  assert_eq!(by_id.email, "ada@example.com");

  assert!(s.find_account_by_email("nobody@example.com".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_yields_none() {
  let s = store().await;
  let first = s.create_account("ada@example.com".into(), "h1".into()).await.unwrap().unwrap();
  assert!(s.create_account("ada@example.com".into(), "h2".into()).await.unwrap().is_none());

  let stored = s.find_account_by_email("ada@example.com".into()).await.unwrap().unwrap();
  assert_eq!(stored.user_id, first.user_id);
  assert_eq!(stored.password_hash, "h1");
}

#[tokio::test]
async fn concurrent_signups_for_one_email_create_one_account() {
  let s = store().await;
  let (a, b) = tokio::join!(
    s.create_account("race@example.com".into(), "a".into()),
    s.create_account("race@example.com".into(), "b".into()),
  );
  let created = [a.unwrap(), b.unwrap()].into_iter().flatten().count();
  assert_eq!(created, 1);
}

#[tokio::test]
async fn sessions_round_trip_and_delete() {
  let s = store().await;
  let account = s.create_account("ada@example.com".into(), "h".into()).await.unwrap().unwrap();

  let now = crate::encode::now();
  let session = Session {
    token_hash: "abc123".into(),
    user_id:    account.user_id,
    created_at: now,
    expires_at: now + chrono::Duration::hours(1),
  };
  s.create_session(session.clone()).await.unwrap();

  let fetched = s.get_session("abc123".into()).await.unwrap().unwrap();
  assert_eq!(fetched, session);
  assert!(!fetched.is_expired(Utc::now()));

  assert!(s.delete_session("abc123".into()).await.unwrap());
  assert!(!s.delete_session("abc123".into()).await.unwrap());
  assert!(s.get_session("abc123".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn expired_sessions_are_pruned() {
  let s = store().await;
  let account = s.create_account("ada@example.com".into(), "h".into()).await.unwrap().unwrap();

  let now = crate::encode::now();
  let session = |token: &str, expires_in: chrono::Duration| Session {
    token_hash: token.into(),
    user_id:    account.user_id,
    created_at: now - chrono::Duration::hours(2),
    expires_at: now + expires_in,
  };
  s.create_session(session("stale", -chrono::Duration::hours(1))).await.unwrap();
  s.create_session(session("edge", chrono::Duration::zero())).await.unwrap();
  s.create_session(session("live", chrono::Duration::hours(1))).await.unwrap();

  assert_eq!(s.delete_expired_sessions(now).await.unwrap(), 2);
  assert!(s.get_session("stale".into()).await.unwrap().is_none());
  assert!(s.get_session("edge".into()).await.unwrap().is_none());
  assert!(s.get_session("live".into()).await.unwrap().is_some());

  assert_eq!(s.delete_expired_sessions(now).await.unwrap(), 0);
}

#[tokio::test]
async fn profile_upsert_keeps_avatar() {
  let s = store().await;
  let account = s.create_account("ada@example.com".into(), "h".into()).await.unwrap().unwrap();
  let uid = account.user_id;

  assert!(s.get_profile(uid).await.unwrap().is_none());

  let with_avatar = s.set_avatar_url(uid, "/avatars/x/y.png".into()).await.unwrap();
  assert_eq!(with_avatar.full_name, None);

  let profile = s
    .upsert_profile(uid, ProfileInput { full_name: Some("Ada".into()), bio: None })
    .await
    .unwrap();
  assert_eq!(profile.full_name.as_deref(), Some("Ada"));
  assert_eq!(profile.avatar_url.as_deref(), Some("/avatars/x/y.png"));
}

#[tokio::test]
async fn preferences_default_until_saved() {
  let s = store().await;
  let account = s.create_account("ada@example.com".into(), "h".into()).await.unwrap().unwrap();
  let uid = account.user_id;

  assert_eq!(s.get_preferences(uid).await.unwrap(), Preferences::default());

  let prefs = Preferences { theme: "dark".into(), auto_save: false, ..Preferences::default() };
  s.put_preferences(uid, prefs.clone()).await.unwrap();
  assert_eq!(s.get_preferences(uid).await.unwrap(), prefs);
}
