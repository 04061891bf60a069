//! SQL schema for the BrainAi SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,   -- trimmed + lowercased
    password_hash TEXT NOT NULL,          -- argon2 PHC string
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,          -- hex SHA-256 of the bearer token
    user_id    TEXT NOT NULL REFERENCES accounts(user_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    user_id    TEXT PRIMARY KEY REFERENCES accounts(user_id) ON DELETE CASCADE,
    full_name  TEXT,
    bio        TEXT,
    avatar_url TEXT,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS preferences (
    user_id     TEXT PRIMARY KEY REFERENCES accounts(user_id) ON DELETE CASCADE,
    preferences TEXT NOT NULL,            -- JSON document
    updated_at  TEXT NOT NULL
);

-- Record tables. Rows are scoped by owner_id on every statement.
CREATE TABLE IF NOT EXISTS notes (
    id         TEXT PRIMARY KEY,
    owner_id   TEXT NOT NULL,
    title      TEXT NOT NULL CHECK (length(trim(title)) > 0),
    content    TEXT NOT NULL,
    tags       TEXT NOT NULL DEFAULT '[]', -- JSON array of strings
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS events (
    id          TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    title       TEXT NOT NULL CHECK (length(trim(title)) > 0),
    description TEXT NOT NULL DEFAULT '',
    date        TEXT NOT NULL,            -- YYYY-MM-DD
    time        TEXT,                     -- HH:MM:SS or NULL
    location    TEXT,
    status      TEXT NOT NULL DEFAULT 'upcoming', -- 'upcoming' | 'ongoing' | 'completed'
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS conversations (
    id         TEXT PRIMARY KEY,
    owner_id   TEXT NOT NULL,
    title      TEXT NOT NULL CHECK (length(trim(title)) > 0),
    content    TEXT NOT NULL DEFAULT '',
    person     TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS notes_owner_idx         ON notes(owner_id, created_at);
CREATE INDEX IF NOT EXISTS events_owner_idx        ON events(owner_id, date);
CREATE INDEX IF NOT EXISTS conversations_owner_idx ON conversations(owner_id, created_at);
CREATE INDEX IF NOT EXISTS sessions_user_idx       ON sessions(user_id);
CREATE INDEX IF NOT EXISTS sessions_expiry_idx     ON sessions(expires_at);

PRAGMA user_version = 1;
";
