//! [`AccountStore`] for [`SqliteStore`].

use brainai_core::account::{
  Account, AccountStore, Preferences, Profile, ProfileInput, Session,
};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Result, SqliteStore,
  encode::{RawAccount, RawProfile, RawSession, encode_dt, encode_uuid, now},
};

const ACCOUNT_COLUMNS: &str = "user_id, email, password_hash, created_at";
const PROFILE_COLUMNS: &str = "user_id, full_name, bio, avatar_url, updated_at";

impl SqliteStore {
  /// Fetch one account where `column` equals `key`.
  async fn fetch_account(&self, column: &'static str, key: String) -> Result<Option<Account>> {
    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {column} = ?1"),
              rusqlite::params![key],
              RawAccount::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawAccount::into_account).transpose()
  }
}

impl AccountStore for SqliteStore {
  type Error = crate::Error;

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn create_account(
    &self,
    email: String,
    password_hash: String,
  ) -> Result<Option<Account>> {
    let account = Account {
      user_id: Uuid::new_v4(),
      email,
      password_hash,
      created_at: now(),
    };

    let id_str     = encode_uuid(account.user_id);
    let email      = account.email.clone();
    let hash       = account.password_hash.clone();
    let created_at = encode_dt(account.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT INTO accounts (user_id, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(email) DO NOTHING",
          rusqlite::params![id_str, email, hash, created_at],
        )?;
        Ok(n > 0)
      })
      .await?;

    if !inserted {
      tracing::debug!(email = %account.email, "email already registered");
      return Ok(None);
    }
    tracing::info!(user_id = %account.user_id, "account created");
    Ok(Some(account))
  }

  async fn find_account_by_email(&self, email: String) -> Result<Option<Account>> {
    self.fetch_account("email", email).await
  }

  async fn get_account(&self, user_id: Uuid) -> Result<Option<Account>> {
    self.fetch_account("user_id", encode_uuid(user_id)).await
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(&self, session: Session) -> Result<()> {
    let token_hash = session.token_hash;
    let user_str   = encode_uuid(session.user_id);
    let created_at = encode_dt(session.created_at);
    let expires_at = encode_dt(session.expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![token_hash, user_str, created_at, expires_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_session(&self, token_hash: String) -> Result<Option<Session>> {
    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT token_hash, user_id, created_at, expires_at
               FROM sessions WHERE token_hash = ?1",
              rusqlite::params![token_hash],
              |row| {
                Ok(RawSession {
                  token_hash: row.get(0)?,
                  user_id:    row.get(1)?,
                  created_at: row.get(2)?,
                  expires_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawSession::into_session).transpose()
  }

  async fn delete_session(&self, token_hash: String) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          rusqlite::params![token_hash],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }

  async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
    let now_str = encode_dt(now);

    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM sessions WHERE expires_at <= ?1",
          rusqlite::params![now_str],
        )?;
        Ok(n as u64)
      })
      .await?;

    if removed > 0 {
      tracing::debug!(removed, "pruned expired sessions");
    }
    Ok(removed)
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    let user_str = encode_uuid(user_id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?1"),
              rusqlite::params![user_str],
              RawProfile::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawProfile::into_profile).transpose()
  }

  async fn upsert_profile(&self, user_id: Uuid, input: ProfileInput) -> Result<Profile> {
    let user_str  = encode_uuid(user_id);
    let full_name = input.full_name;
    let bio       = input.bio;
    let at_str    = encode_dt(now());

    let raw: RawProfile = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (user_id, full_name, bio, updated_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(user_id) DO UPDATE SET
             full_name  = excluded.full_name,
             bio        = excluded.bio,
             updated_at = excluded.updated_at",
          rusqlite::params![user_str, full_name, bio, at_str],
        )?;
        Ok(conn.query_row(
          &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?1"),
          rusqlite::params![user_str],
          RawProfile::from_row,
        )?)
      })
      .await?;
    raw.into_profile()
  }

  async fn set_avatar_url(&self, user_id: Uuid, avatar_url: String) -> Result<Profile> {
    let user_str = encode_uuid(user_id);
    let at_str   = encode_dt(now());

    let raw: RawProfile = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (user_id, avatar_url, updated_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(user_id) DO UPDATE SET
             avatar_url = excluded.avatar_url,
             updated_at = excluded.updated_at",
          rusqlite::params![user_str, avatar_url, at_str],
        )?;
        Ok(conn.query_row(
          &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?1"),
          rusqlite::params![user_str],
          RawProfile::from_row,
        )?)
      })
      .await?;

    tracing::debug!(%user_id, "avatar updated");
    raw.into_profile()
  }

  // ── Preferences ───────────────────────────────────────────────────────────

  async fn get_preferences(&self, user_id: Uuid) -> Result<Preferences> {
    let user_str = encode_uuid(user_id);

    let json: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT preferences FROM preferences WHERE user_id = ?1",
              rusqlite::params![user_str],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    match json {
      Some(s) => Ok(serde_json::from_str(&s)?),
      None => Ok(Preferences::default()),
    }
  }

  async fn put_preferences(&self, user_id: Uuid, preferences: Preferences) -> Result<Preferences> {
    let user_str = encode_uuid(user_id);
    let json     = serde_json::to_string(&preferences)?;
    let at_str   = encode_dt(now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO preferences (user_id, preferences, updated_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(user_id) DO UPDATE SET
             preferences = excluded.preferences,
             updated_at  = excluded.updated_at",
          rusqlite::params![user_str, json, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(preferences)
  }
}
