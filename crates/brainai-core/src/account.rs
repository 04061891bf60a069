//! Accounts, sessions, profiles and preferences: the identity side of the
//! backend, and the `AccountStore` trait that persists them.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

// ─── Account ─────────────────────────────────────────────────────────────────

/// A registered user. The id doubles as the owner id of every record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
  pub user_id:       Uuid,
  pub email:         String,
  /// argon2 PHC string, e.g. `$argon2id$v=19$…`
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

/// Trim and lowercase an email address, rejecting obviously malformed ones.
pub fn normalize_email(raw: &str) -> Result<String> {
  let email = raw.trim().to_lowercase();
  let valid = match email.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
    }
    None => false,
  };
  if !valid || email.chars().any(char::is_whitespace) {
    return Err(Error::InvalidEmail(raw.to_owned()));
  }
  Ok(email)
}

pub fn validate_password(password: &str) -> Result<()> {
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(Error::PasswordTooShort { min: MIN_PASSWORD_LEN });
  }
  Ok(())
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// A signed-in session. Only a digest of the bearer token is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  /// Hex SHA-256 of the bearer token.
  pub token_hash: String,
  pub user_id:    Uuid,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool { now >= self.expires_at }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub user_id:    Uuid,
  pub full_name:  Option<String>,
  pub bio:        Option<String>,
  /// Public URL of the current avatar in the avatar bucket.
  pub avatar_url: Option<String>,
  pub updated_at: DateTime<Utc>,
}

/// Editable profile fields. The avatar is changed through its own upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInput {
  pub full_name: Option<String>,
  pub bio:       Option<String>,
}

// ─── Preferences ─────────────────────────────────────────────────────────────

/// Settings-page preferences. Missing fields take their defaults, so older
/// stored documents keep deserialising.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
  pub theme:               String,
  pub notifications:       bool,
  pub email_notifications: bool,
  pub two_factor_auth:     bool,
  pub language:            String,
  pub auto_save:           bool,
}

impl Default for Preferences {
  fn default() -> Self {
    Self {
      theme:               "light".into(),
      notifications:       true,
      email_notifications: false,
      two_factor_auth:     false,
      language:            "en".into(),
      auto_save:           true,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Persistence for accounts, sessions, profiles and preferences.
pub trait AccountStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Create an account. `email` must already be normalised.
  ///
  /// Returns `None` when the address is already registered. The uniqueness
  /// check and the insert are one atomic step, so concurrent sign-ups for
  /// the same address yield exactly one account.
  fn create_account(
    &self,
    email: String,
    password_hash: String,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  fn find_account_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  fn get_account(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  fn create_session(
    &self,
    session: Session,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Look a session up by token digest. Expired sessions are returned as-is;
  /// the caller decides.
  fn get_session(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + '_;

  /// Returns `false` when no such session existed.
  fn delete_session(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Remove every session that expired at or before `now`; returns how many
  /// were removed.
  fn delete_expired_sessions(
    &self,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  fn get_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Insert or replace the editable profile fields, keeping the avatar.
  fn upsert_profile(
    &self,
    user_id: Uuid,
    input: ProfileInput,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Point the profile at a new avatar, creating the profile if needed.
  fn set_avatar_url(
    &self,
    user_id: Uuid,
    avatar_url: String,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  // ── Preferences ───────────────────────────────────────────────────────

  /// Stored preferences, or the defaults when none were saved.
  fn get_preferences(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Preferences, Self::Error>> + Send + '_;

  fn put_preferences(
    &self,
    user_id: Uuid,
    preferences: Preferences,
  ) -> impl Future<Output = Result<Preferences, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;

  #[test]
  fn emails_are_trimmed_and_lowercased() {
    assert_eq!(normalize_email("  Ada@Example.COM ").unwrap(), "ada@example.com");
  }

  #[test]
  fn malformed_emails_are_rejected() {
    for raw in ["", "ada", "@example.com", "ada@example", "ada@.com", "a b@example.com", "a@b@c.com"] {
      assert!(normalize_email(raw).is_err(), "{raw:?} accepted");
    }
  }

  #[test]
  fn short_passwords_are_rejected() {
    assert!(validate_password("12345").is_err());
    assert!(validate_password("123456").is_ok());
  }

  #[test]
  fn session_expiry_is_exclusive_of_the_deadline() {
    let now = Utc::now();
    let session = Session {
      token_hash: "x".into(),
      user_id:    Uuid::new_v4(),
      created_at: now,
      expires_at: now + Duration::hours(1),
    };
    assert!(!session.is_expired(now));
    assert!(session.is_expired(now + Duration::hours(1)));
  }

  #[test]
  fn partial_preferences_fill_in_defaults() {
    let prefs: Preferences = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
    assert_eq!(prefs.theme, "dark");
    assert!(prefs.auto_save);
    assert_eq!(prefs.language, "en");
  }
}
