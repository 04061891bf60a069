//! `POST /voice`: placeholder for voice commands and trigger words.

use crate::error::ApiError;

/// Always `501 Not Implemented`.
pub async fn handler() -> ApiError {
  ApiError::NotImplemented("voice commands and trigger words are not supported".to_string())
}
