//! The dashboard read model: per-kind counts and the recent-activity feed.
//!
//! The feed is a one-shot snapshot. Each kind contributes its
//! [`PER_KIND_LIMIT`] newest records; the union is sorted newest first and cut
//! to [`FEED_LIMIT`]. A kind whose fetch fails is logged and skipped so the
//! dashboard always renders.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  record::{Record, RecordKind},
  store::RecordStore,
};

/// How many records each kind contributes to the feed.
pub const PER_KIND_LIMIT: usize = 2;

/// Maximum length of the merged feed.
pub const FEED_LIMIT: usize = 5;

/// One line of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityItem {
  pub id:        Uuid,
  #[serde(rename = "type")]
  pub kind:      RecordKind,
  pub title:     String,
  /// Creation time of the underlying record.
  pub timestamp: DateTime<Utc>,
}

impl ActivityItem {
  pub fn from_record(record: &impl Record) -> Self {
    Self {
      id:        record.id(),
      kind:      record.kind(),
      title:     record.title().to_owned(),
      timestamp: record.created_at(),
    }
  }
}

/// Newest first; equal timestamps fall back to kind order, then id.
fn newest_first(a: &ActivityItem, b: &ActivityItem) -> Ordering {
  b.timestamp
    .cmp(&a.timestamp)
    .then_with(|| a.kind.cmp(&b.kind))
    .then_with(|| a.id.cmp(&b.id))
}

/// Merge per-kind sources (one `Vec` per kind) into the feed.
pub fn merge<I>(sources: I) -> Vec<ActivityItem>
where
  I: IntoIterator<Item = Vec<ActivityItem>>,
{
  let mut feed: Vec<ActivityItem> = sources
    .into_iter()
    .flat_map(|mut items| {
      items.sort_by(newest_first);
      items.truncate(PER_KIND_LIMIT);
      items
    })
    .collect();

  feed.sort_by(newest_first);
  feed.truncate(FEED_LIMIT);
  feed
}

/// Fetch the newest records of every kind for `owner` and merge them.
pub async fn collect<S: RecordStore>(store: &S, owner: Uuid) -> Vec<ActivityItem> {
  let mut sources = Vec::with_capacity(RecordKind::ALL.len());
  for kind in RecordKind::ALL {
    match store.recent(owner, kind, PER_KIND_LIMIT).await {
      Ok(items) => sources.push(items),
      Err(e) => {
        tracing::warn!(%owner, %kind, error = %e, "recent activity fetch failed");
      }
    }
  }
  merge(sources)
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Record counts shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
  pub notes:         u64,
  pub events:        u64,
  pub conversations: u64,
}

impl DashboardStats {
  /// Count every kind for `owner`. A failed count reads as zero.
  pub async fn collect<S: RecordStore>(store: &S, owner: Uuid) -> Self {
    let mut stats = Self::default();
    for kind in RecordKind::ALL {
      let n = match store.count(owner, kind).await {
        Ok(n) => n,
        Err(e) => {
          tracing::warn!(%owner, %kind, error = %e, "record count failed");
          0
        }
      };
      match kind {
        RecordKind::Note => stats.notes = n,
        RecordKind::Event => stats.events = n,
        RecordKind::Conversation => stats.conversations = n,
      }
    }
    stats
  }
}
