//! Upload rules for the public avatar bucket.

use crate::{Error, Result};

/// Uploads larger than this are rejected.
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

/// Accepted media types and the file extension each is stored under.
pub const ALLOWED_MEDIA_TYPES: [(&str, &str); 4] = [
  ("image/png", "png"),
  ("image/jpeg", "jpg"),
  ("image/gif", "gif"),
  ("image/webp", "webp"),
];

/// Check an upload against the bucket limits and return the extension the
/// file should be stored with.
///
/// Parameters such as `; charset=...` on the media type are ignored.
pub fn validate_avatar(media_type: &str, len: usize) -> Result<&'static str> {
  if len == 0 {
    return Err(Error::EmptyUpload);
  }
  if len > MAX_AVATAR_BYTES {
    return Err(Error::AvatarTooLarge { size: len, max: MAX_AVATAR_BYTES });
  }

  let essence = media_type
    .split(';')
    .next()
    .unwrap_or_default()
    .trim()
    .to_ascii_lowercase();

  ALLOWED_MEDIA_TYPES
    .iter()
    .find(|(mt, _)| *mt == essence)
    .map(|(_, ext)| *ext)
    .ok_or_else(|| Error::UnsupportedMediaType(media_type.to_owned()))
}

/// Reverse of [`validate_avatar`]'s mapping, for serving stored files.
pub fn media_type_for(file_name: &str) -> Option<&'static str> {
  let ext = file_name.rsplit_once('.')?.1;
  ALLOWED_MEDIA_TYPES
    .iter()
    .find(|(_, e)| e.eq_ignore_ascii_case(ext))
    .map(|(mt, _)| *mt)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_each_allowed_type() {
    assert_eq!(validate_avatar("image/png", 10).unwrap(), "png");
    assert_eq!(validate_avatar("image/jpeg", 10).unwrap(), "jpg");
    assert_eq!(validate_avatar("IMAGE/GIF", 10).unwrap(), "gif");
    assert_eq!(validate_avatar("image/webp; q=1", 10).unwrap(), "webp");
  }

  #[test]
  fn rejects_other_types() {
    assert!(matches!(
      validate_avatar("image/svg+xml", 10),
      Err(Error::UnsupportedMediaType(_))
    ));
  }

  #[test]
  fn size_limit_is_inclusive() {
    assert!(validate_avatar("image/png", MAX_AVATAR_BYTES).is_ok());
    assert!(matches!(
      validate_avatar("image/png", MAX_AVATAR_BYTES + 1),
      Err(Error::AvatarTooLarge { .. })
    ));
  }

  #[test]
  fn empty_upload_is_rejected() {
    assert!(matches!(validate_avatar("image/png", 0), Err(Error::EmptyUpload)));
  }

  #[test]
  fn media_type_lookup_by_extension() {
    assert_eq!(media_type_for("abc.JPG"), Some("image/jpeg"));
    assert_eq!(media_type_for("abc.txt"), None);
    assert_eq!(media_type_for("noext"), None);
  }
}
