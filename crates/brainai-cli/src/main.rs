//! `brainai`: command-line client for the BrainAi server.
//!
//! # Usage
//!
//! ```text
//! brainai signin --email ada@example.com --password secret
//! export BRAINAI_TOKEN=<token>
//! brainai dashboard
//! brainai notes list --search groceries --tag home
//! brainai events add --title "Standup" --date 2026-03-02 --time 09:30
//! ```

mod client;
mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "brainai", about = "Notes, events and conversations from the terminal")]
struct Args {
  /// Path to a TOML config file (url, token).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the BrainAi server (default: http://localhost:8080).
  #[arg(long, env = "BRAINAI_URL")]
  url: Option<String>,

  /// Session token printed by `signin` / `signup`.
  #[arg(long, env = "BRAINAI_TOKEN", hide_env_values = true)]
  token: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create an account and print its session token.
  Signup {
    #[arg(long)]
    email:     String,
    #[arg(long)]
    password:  String,
    #[arg(long)]
    full_name: Option<String>,
  },
  /// Sign in and print a session token.
  Signin {
    #[arg(long)]
    email:    String,
    #[arg(long)]
    password: String,
  },
  /// End the current session.
  Signout,
  /// Show the signed-in user.
  Whoami,
  /// Record counts and the recent-activity feed.
  Dashboard,
  /// Manage notes.
  #[command(subcommand)]
  Notes(NotesCommand),
  /// Manage calendar events.
  #[command(subcommand)]
  Events(EventsCommand),
  /// Manage conversation logs.
  #[command(subcommand)]
  Conversations(ConversationsCommand),
  /// Voice commands (not supported by the server).
  Voice,
}

#[derive(Subcommand, Debug)]
enum NotesCommand {
  /// List notes, optionally filtered.
  List {
    /// Case-insensitive text to look for in title and content.
    #[arg(short, long)]
    search: Option<String>,
    /// Only notes carrying one of these tags. Repeatable.
    #[arg(short, long = "tag")]
    tags:   Vec<String>,
  },
  /// Every tag in use.
  Tags,
  /// Create a note.
  Add {
    #[arg(long)]
    title:   String,
    #[arg(long)]
    content: String,
    #[arg(short, long = "tag")]
    tags:    Vec<String>,
  },
  /// Delete a note.
  Rm { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum EventsCommand {
  List {
    #[arg(short, long)]
    search: Option<String>,
  },
  Add {
    #[arg(long)]
    title:       String,
    /// Calendar date, `YYYY-MM-DD`.
    #[arg(long)]
    date:        chrono::NaiveDate,
    /// Time of day, `HH:MM`.
    #[arg(long, value_parser = commands::parse_time)]
    time:        Option<chrono::NaiveTime>,
    #[arg(long)]
    location:    Option<String>,
    #[arg(long, default_value = "")]
    description: String,
  },
  Rm { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum ConversationsCommand {
  List {
    #[arg(short, long)]
    search: Option<String>,
  },
  Add {
    #[arg(long)]
    title:   String,
    #[arg(long, default_value = "")]
    content: String,
    #[arg(long)]
    person:  Option<String>,
  },
  Rm { id: Uuid },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:   String,
  #[serde(default)]
  token: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    token:    args
      .token
      .or_else(|| (!file_cfg.token.is_empty()).then(|| file_cfg.token.clone()))
      .unwrap_or_default(),
  };
  tracing::debug!(base_url = %api_config.base_url, "using server");

  let client = ApiClient::new(api_config)?;
  let out = commands::run(&client, args.command).await?;
  if !out.is_empty() {
    println!("{out}");
  }
  Ok(())
}
