//! Error types for `brainai-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} must not be empty")]
  EmptyField(&'static str),

  #[error("invalid email address: {0:?}")]
  InvalidEmail(String),

  #[error("password must be at least {min} characters")]
  PasswordTooShort { min: usize },

  #[error("avatar is {size} bytes; the limit is {max}")]
  AvatarTooLarge { size: usize, max: usize },

  #[error("unsupported avatar media type: {0:?}")]
  UnsupportedMediaType(String),

  #[error("upload is empty")]
  EmptyUpload,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Whether the error was caused by caller input rather than by the
  /// environment. Validation errors are raised before any store access.
  pub fn is_validation(&self) -> bool { !matches!(self, Self::Serialization(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
