//! JSON REST API for BrainAi.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`RecordStore`] and [`AccountStore`]. Every route except sign-up,
//! sign-in and avatar reads requires a bearer session.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = brainai_api::api_router(AppState { store, config });
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod conversations;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod notes;
pub mod preferences;
pub mod profile;
pub mod voice;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post, put},
};
use brainai_core::{
  account::AccountStore, avatar::MAX_AVATAR_BYTES, filter::RecordFilter,
  store::RecordStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use auth::CurrentUser;
pub use error::ApiError;

// ─── Store bound ──────────────────────────────────────────────────────────────

/// Everything the API needs from a backing store: the record and account
/// traits sharing one error type.
pub trait Store:
  RecordStore + AccountStore<Error = <Self as RecordStore>::Error> + Clone + Send + Sync + 'static
{
}

impl<T> Store for T where
  T: RecordStore + AccountStore<Error = <T as RecordStore>::Error> + Clone + Send + Sync + 'static
{
}

// ─── Application state ────────────────────────────────────────────────────────

/// Runtime settings the handlers need.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Root of the public avatar bucket.
  pub avatar_dir:  PathBuf,
  /// How long a freshly issued session stays valid.
  pub session_ttl: chrono::Duration,
}

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ApiConfig>,
}

// ─── Query parameters ─────────────────────────────────────────────────────────

/// `?q=<text>&tags=a,b` on the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub q:    Option<String>,
  /// Comma-separated tag names.
  pub tags: Option<String>,
}

impl ListParams {
  pub fn filter(&self) -> RecordFilter {
    let tags = self
      .tags
      .as_deref()
      .unwrap_or_default()
      .split(',')
      .map(str::trim)
      .filter(|t| !t.is_empty());
    RecordFilter::text(self.q.clone().unwrap_or_default()).with_tags(tags)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
pub fn api_router<S: Store>(state: AppState<S>) -> Router {
  Router::new()
    // Auth
    .route("/auth/signup", post(auth::signup::<S>))
    .route("/auth/signin", post(auth::signin::<S>))
    .route("/auth/signout", post(auth::signout::<S>))
    .route("/auth/session", get(auth::session::<S>))
    // Records
    .route("/notes", get(notes::list::<S>).post(notes::create::<S>))
    .route(
      "/notes/{id}",
      get(notes::get_one::<S>).put(notes::update::<S>).delete(notes::remove::<S>),
    )
    .route("/events", get(events::list::<S>).post(events::create::<S>))
    .route(
      "/events/{id}",
      get(events::get_one::<S>).put(events::update::<S>).delete(events::remove::<S>),
    )
    .route(
      "/conversations",
      get(conversations::list::<S>).post(conversations::create::<S>),
    )
    .route(
      "/conversations/{id}",
      get(conversations::get_one::<S>)
        .put(conversations::update::<S>)
        .delete(conversations::remove::<S>),
    )
    // Dashboard
    .route("/dashboard", get(dashboard::handler::<S>))
    // Profile, avatar bucket, settings
    .route("/profile", get(profile::get_one::<S>).put(profile::update::<S>))
    .route(
      "/profile/avatar",
      put(profile::upload_avatar::<S>)
        // Leave headroom so oversized uploads reach our own size check.
        .layer(DefaultBodyLimit::max(MAX_AVATAR_BYTES + 64 * 1024)),
    )
    .route("/avatars/{user}/{file}", get(profile::serve_avatar::<S>))
    .route(
      "/preferences",
      get(preferences::get_one::<S>).put(preferences::update::<S>),
    )
    // Voice
    .route("/voice", post(voice::handler))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
