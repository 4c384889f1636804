//! Field checks applied to request bodies before anything reaches the store.

use url::Url;

use crate::error::ApiError;

/// `value`, trimmed, must hold between `min` and `max` characters.
pub fn length(field: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
  let len = value.trim().chars().count();
  if len < min {
    return Err(ApiError::BadRequest(if min == 1 {
      format!("{field} must not be blank")
    } else {
      format!("{field} must be at least {min} characters")
    }));
  }
  if len > max {
    return Err(ApiError::BadRequest(format!(
      "{field} must be at most {max} characters"
    )));
  }
  Ok(())
}

/// An optional store link must parse as an absolute http(s) URL with a host.
pub fn link(value: Option<&str>) -> Result<(), ApiError> {
  let Some(raw) = value.map(str::trim) else {
    return Ok(());
  };
  let invalid = || ApiError::BadRequest(format!("{raw:?} is not an http(s) link"));

  let url = Url::parse(raw).map_err(|_| invalid())?;
  if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
    return Err(invalid());
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_is_rejected() {
    assert!(length("title", "   ", 1, 100).is_err());
    assert!(length("title", "Birthday", 1, 100).is_ok());
  }

  #[test]
  fn length_counts_characters_not_bytes() {
    assert!(length("title", "Годовщина", 1, 9).is_ok());
    assert!(length("title", "Годовщина!", 1, 9).is_err());
  }

  #[test]
  fn links() {
    assert!(link(None).is_ok());
    assert!(link(Some("https://www.wildberries.ru/catalog/123456789/detail.aspx")).is_ok());
    assert!(link(Some("http://example.com")).is_ok());
    assert!(link(Some("ftp://example.com")).is_err());
    assert!(link(Some("https://")).is_err());
    assert!(link(Some("example.com")).is_err());
  }

  #[test]
  fn unparsable_links_are_rejected() {
    for bad in ["https://[", "https://exa%mple:99999999", "http://?", "https:// example.com"] {
      assert!(link(Some(bad)).is_err(), "accepted {bad:?}");
    }
  }
}
