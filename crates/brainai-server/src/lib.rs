//! Configuration for the BrainAi server binary.
//!
//! Settings come from an optional TOML file layered under `BRAINAI_*`
//! environment variables, e.g. `BRAINAI_PORT=9000`.

use std::path::{Path, PathBuf};

use brainai_api::ApiConfig;
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:              String,
  #[serde(default = "default_port")]
  pub port:              u16,
  #[serde(default = "default_store_path")]
  pub store_path:        PathBuf,
  #[serde(default = "default_avatar_dir")]
  pub avatar_dir:        PathBuf,
  #[serde(default = "default_session_ttl_hours")]
  pub session_ttl_hours: i64,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/brainai/brainai.db") }
fn default_avatar_dir() -> PathBuf { PathBuf::from("~/.local/share/brainai/avatars") }
fn default_session_ttl_hours() -> i64 { 168 }

impl ServerConfig {
  /// Load from `path` (skipped when absent) and `BRAINAI_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("BRAINAI"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The handler-facing subset, with `~` expanded.
  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      avatar_dir:  expand_tilde(&self.avatar_dir),
      session_ttl: chrono::Duration::hours(self.session_ttl_hours.max(1)),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/brainai.toml")).unwrap();
    assert_eq!(cfg.session_ttl_hours, 168);
    assert_eq!(cfg.api_config().session_ttl, chrono::Duration::hours(168));
  }

  #[test]
  fn file_values_override_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "port = 9100\navatar_dir = \"/srv/avatars\"\nsession_ttl_hours = 2").unwrap();

    let cfg = ServerConfig::load(file.path()).unwrap();
    assert_eq!(cfg.port, 9100);
    assert_eq!(cfg.address(), "127.0.0.1:9100");
    assert_eq!(cfg.api_config().avatar_dir, PathBuf::from("/srv/avatars"));
    assert_eq!(cfg.api_config().session_ttl, chrono::Duration::hours(2));
  }

  #[test]
  fn tilde_expands_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/x/y")), PathBuf::from(home).join("x/y"));
    assert_eq!(expand_tilde(Path::new("/abs")), PathBuf::from("/abs"));
  }
}
