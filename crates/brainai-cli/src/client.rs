//! Async HTTP client wrapping the BrainAi JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use brainai_core::{
  activity::{ActivityItem, DashboardStats},
  record::{
    Conversation, ConversationInput, Event, EventInput, Note, NoteInput,
  },
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use uuid::Uuid;

/// Connection settings for the BrainAi API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Bearer token from a previous sign-in; empty when signed out.
  pub token:    String,
}

/// The signed-in user as reported by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionUser {
  pub user_id:    Uuid,
  pub email:      String,
  pub full_name:  Option<String>,
  pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
  pub token: String,
  pub user:  SessionUser,
}

#[derive(Debug, Deserialize)]
pub struct Dashboard {
  pub stats:           DashboardStats,
  pub recent_activity: Vec<ActivityItem>,
}

/// Async HTTP client for the BrainAi JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.token.is_empty() {
      req
    } else {
      req.bearer_auth(&self.config.token)
    }
  }

  /// Send `req`, turning non-2xx answers into errors carrying the server's
  /// `{"error": ...}` message.
  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
    let resp = self.auth(req).send().await.with_context(|| format!("{what} failed"))?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }

    let message = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|v| v.get("error").and_then(|m| m.as_str()).map(str::to_owned))
      .unwrap_or_default();
    Err(anyhow!("{what} → {status} {message}").context(hint(status)))
  }

  async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    self
      .send(req, what)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising {what} response"))
  }

  // ── Auth ──────────────────────────────────────────────────────────────────

  /// `POST /auth/signup`
  pub async fn sign_up(
    &self,
    email: &str,
    password: &str,
    full_name: Option<&str>,
  ) -> Result<AuthResponse> {
    let body = json!({ "email": email, "password": password, "full_name": full_name });
    self
      .fetch(self.client.post(self.url("/auth/signup")).json(&body), "POST /auth/signup")
      .await
  }

  /// `POST /auth/signin`
  pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse> {
    let body = json!({ "email": email, "password": password });
    self
      .fetch(self.client.post(self.url("/auth/signin")).json(&body), "POST /auth/signin")
      .await
  }

  /// `POST /auth/signout`
  pub async fn sign_out(&self) -> Result<()> {
    self
      .send(self.client.post(self.url("/auth/signout")), "POST /auth/signout")
      .await?;
    Ok(())
  }

  /// `GET /auth/session`
  pub async fn session(&self) -> Result<SessionUser> {
    self
      .fetch(self.client.get(self.url("/auth/session")), "GET /auth/session")
      .await
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  /// `GET /dashboard`
  pub async fn dashboard(&self) -> Result<Dashboard> {
    self
      .fetch(self.client.get(self.url("/dashboard")), "GET /dashboard")
      .await
  }

  // ── Records ───────────────────────────────────────────────────────────────

  /// `GET /notes`, unfiltered. Searching happens locally.
  pub async fn list_notes(&self) -> Result<Vec<Note>> {
    self.fetch(self.client.get(self.url("/notes")), "GET /notes").await
  }

  /// `POST /notes`
  pub async fn create_note(&self, input: &NoteInput) -> Result<Note> {
    self
      .fetch(self.client.post(self.url("/notes")).json(input), "POST /notes")
      .await
  }

  /// `GET /events`
  pub async fn list_events(&self) -> Result<Vec<Event>> {
    self.fetch(self.client.get(self.url("/events")), "GET /events").await
  }

  /// `POST /events`
  pub async fn create_event(&self, input: &EventInput) -> Result<Event> {
    self
      .fetch(self.client.post(self.url("/events")).json(input), "POST /events")
      .await
  }

  /// `GET /conversations`
  pub async fn list_conversations(&self) -> Result<Vec<Conversation>> {
    self
      .fetch(self.client.get(self.url("/conversations")), "GET /conversations")
      .await
  }

  /// `POST /conversations`
  pub async fn create_conversation(&self, input: &ConversationInput) -> Result<Conversation> {
    self
      .fetch(
        self.client.post(self.url("/conversations")).json(input),
        "POST /conversations",
      )
      .await
  }

  /// `DELETE /{collection}/{id}`
  pub async fn delete(&self, collection: &str, id: Uuid) -> Result<()> {
    let path = format!("/{collection}/{id}");
    self
      .send(self.client.delete(self.url(&path)), &format!("DELETE {path}"))
      .await?;
    Ok(())
  }

  // ── Voice ─────────────────────────────────────────────────────────────────

  /// `POST /voice`
  pub async fn voice(&self) -> Result<()> {
    self.send(self.client.post(self.url("/voice")), "POST /voice").await?;
    Ok(())
  }
}

/// A next step for the user, keyed on the failing status.
fn hint(status: reqwest::StatusCode) -> &'static str {
  match status.as_u16() {
    401 => "not signed in: run `brainai signin` and export BRAINAI_TOKEN",
    404 => "no such record",
    501 => "the server does not support this feature",
    _ => "request rejected by the server",
  }
}
