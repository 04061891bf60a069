//! Search and tag filtering over records that are already in memory.
//!
//! A linear scan; no index. Callers re-run it whenever the query changes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::{Conversation, Event, Note};

/// Something the filter can look into.
pub trait Searchable {
  /// Text fields matched against the query.
  fn search_fields(&self) -> Vec<&str>;

  /// Tags matched against the selected tags. Kinds without tags never match a
  /// non-empty selection.
  fn tags(&self) -> &[String] { &[] }
}

impl Searchable for Note {
  fn search_fields(&self) -> Vec<&str> { vec![self.title.as_str(), self.content.as_str()] }

  fn tags(&self) -> &[String] { &self.tags }
}

impl Searchable for Conversation {
  fn search_fields(&self) -> Vec<&str> {
    let mut fields = vec![self.title.as_str(), self.content.as_str()];
    fields.extend(self.person.as_deref());
    fields
  }
}

impl Searchable for Event {
  fn search_fields(&self) -> Vec<&str> {
    let mut fields = vec![self.title.as_str(), self.description.as_str()];
    fields.extend(self.location.as_deref());
    fields
  }
}

/// A free-text query plus a tag selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
  /// Case-insensitive substring; blank matches everything.
  pub text: Option<String>,
  /// A record must carry at least one of these. Empty selects everything.
  #[serde(default)]
  pub tags: Vec<String>,
}

impl RecordFilter {
  pub fn text(query: impl Into<String>) -> Self {
    Self { text: Some(query.into()), tags: Vec::new() }
  }

  pub fn with_tags<I, T>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    self.tags = tags.into_iter().map(Into::into).collect();
    self
  }

  /// Whether the filter lets every record through.
  pub fn is_empty(&self) -> bool { self.needle().is_none() && self.tags.is_empty() }

  fn needle(&self) -> Option<String> {
    self
      .text
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(str::to_lowercase)
  }

  pub fn matches(&self, record: &impl Searchable) -> bool {
    self.matches_text(record, self.needle().as_deref()) && self.matches_tags(record)
  }

  fn matches_text(&self, record: &impl Searchable, needle: Option<&str>) -> bool {
    let Some(needle) = needle else { return true };
    record
      .search_fields()
      .iter()
      .any(|field| field.to_lowercase().contains(needle))
  }

  fn matches_tags(&self, record: &impl Searchable) -> bool {
    self.tags.is_empty()
      || record.tags().iter().any(|t| self.tags.iter().any(|s| s == t))
  }

  /// The records that pass, in their original order.
  pub fn apply<'a, T: Searchable>(&self, records: &'a [T]) -> Vec<&'a T> {
    let needle = self.needle();
    records
      .iter()
      .filter(|r| self.matches_text(*r, needle.as_deref()) && self.matches_tags(*r))
      .collect()
  }
}

/// Every distinct tag used by `notes`, sorted.
pub fn tag_cloud(notes: &[Note]) -> BTreeSet<String> {
  notes.iter().flat_map(|n| n.tags.iter().cloned()).collect()
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::record::EventStatus;

  fn note(title: &str, content: &str, tags: &[&str]) -> Note {
    let now = Utc::now();
    Note {
      id:         Uuid::new_v4(),
      owner_id:   Uuid::nil(),
      title:      title.into(),
      content:    content.into(),
      tags:       tags.iter().map(|t| t.to_string()).collect(),
      created_at: now,
      updated_at: now,
    }
  }

  fn conversation(title: &str, person: Option<&str>) -> Conversation {
    let now = Utc::now();
    Conversation {
      id:         Uuid::new_v4(),
      owner_id:   Uuid::nil(),
      title:      title.into(),
      content:    String::new(),
      person:     person.map(str::to_owned),
      created_at: now,
      updated_at: now,
    }
  }

  fn notes() -> Vec<Note> {
    vec![
      note("Startup idea", "A brain for your notes", &["ideas", "work"]),
      note("Groceries", "milk, eggs", &["home"]),
      note("Quarterly report", "Review numbers", &["work"]),
      note("Untagged", "nothing here", &[]),
    ]
  }

  #[test]
  fn empty_query_returns_everything() {
    let all = notes();
    assert_eq!(RecordFilter::default().apply(&all).len(), all.len());
    assert_eq!(RecordFilter::text("").apply(&all).len(), all.len());
    assert_eq!(RecordFilter::text("   ").apply(&all).len(), all.len());
  }

  #[test]
  fn query_is_case_insensitive_over_title_and_content() {
    let all = notes();
    let hits = RecordFilter::text("BRAIN").apply(&all);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Startup idea");

    let hits = RecordFilter::text("report").apply(&all);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Quarterly report");
  }

  #[test]
  fn tag_selection_keeps_records_with_any_selected_tag() {
    let all = notes();
    let hits = RecordFilter::default().with_tags(["home", "ideas"]).apply(&all);
    let titles: Vec<_> = hits.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Startup idea", "Groceries"]);
    for hit in hits {
      assert!(hit.tags.iter().any(|t| t == "home" || t == "ideas"));
    }
  }

  #[test]
  fn query_and_tags_intersect() {
    let all = notes();
    let hits = RecordFilter::text("q").with_tags(["work"]).apply(&all);
    let titles: Vec<_> = hits.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Quarterly report"]);
  }

  #[test]
  fn unknown_tag_selects_nothing() {
    assert!(
      RecordFilter::default()
        .with_tags(["missing"])
        .apply(&notes())
        .is_empty()
    );
  }

  #[test]
  fn conversation_matches_on_person() {
    let all = vec![
      conversation("Weekly sync", Some("Sarah Johnson")),
      conversation("Retro", None),
    ];
    let hits = RecordFilter::text("sarah").apply(&all);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Weekly sync");
  }

  #[test]
  fn events_match_on_location_and_never_on_tags() {
    let now = Utc::now();
    let event = Event {
      id:          Uuid::new_v4(),
      owner_id:    Uuid::nil(),
      title:       "Offsite".into(),
      description: "Planning".into(),
      date:        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
      time:        None,
      location:    Some("Lisbon".into()),
      status:      EventStatus::Upcoming,
      created_at:  now,
      updated_at:  now,
    };
    assert!(RecordFilter::text("lisbon").matches(&event));
    assert!(!RecordFilter::default().with_tags(["work"]).matches(&event));
  }

  #[test]
  fn tag_cloud_is_sorted_and_distinct() {
    let cloud: Vec<_> = tag_cloud(&notes()).into_iter().collect();
    assert_eq!(cloud, vec!["home", "ideas", "work"]);
  }
}
