//! `GET /dashboard`: stats cards plus the recent-activity feed.

use axum::{Json, extract::State};
use brainai_core::activity::{self, ActivityItem, DashboardStats};
use serde::{Deserialize, Serialize};

use crate::{AppState, CurrentUser, Store};

#[derive(Debug, Serialize, Deserialize)]
pub struct Dashboard {
  pub stats:           DashboardStats,
  pub recent_activity: Vec<ActivityItem>,
}

/// Never fails on a store error: failed kinds are logged and left out.
pub async fn handler<S: Store>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
) -> Json<Dashboard> {
  let store = &*state.store;
  let stats = DashboardStats::collect(store, user.user_id).await;
  let recent_activity = activity::collect(store, user.user_id).await;
  Json(Dashboard { stats, recent_activity })
}
