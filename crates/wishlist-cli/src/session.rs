//! The on-disk session: the bearer token saved by `wishlist login`.

use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Shape of the session file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  token: Option<String>,
}

/// A TOML file holding at most one bearer token.
#[derive(Debug, Clone)]
pub struct Session {
  path: PathBuf,
}

impl Session {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  /// `$HOME/.config/wishlist/session.toml`, or `./session.toml` without a home.
  pub fn default_path() -> PathBuf {
    match std::env::var_os("HOME") {
      Some(home) => PathBuf::from(home).join(".config/wishlist/session.toml"),
      None => PathBuf::from("session.toml"),
    }
  }

  pub fn path(&self) -> &Path { &self.path }

  /// The saved token; `None` when the file is missing or holds no token.
  pub fn token(&self) -> Result<Option<String>> {
    let raw = match fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => {
        return Err(e).with_context(|| format!("reading session {}", self.path.display()));
      }
    };
    let file: SessionFile = toml::from_str(&raw)
      .with_context(|| format!("parsing session {}", self.path.display()))?;
    Ok(file.token.filter(|t| !t.is_empty()))
  }

  pub fn save_token(&self, token: &str) -> Result<()> {
    if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
      fs::create_dir_all(dir)
        .with_context(|| format!("creating {}", dir.display()))?;
    }
    let raw = toml::to_string(&SessionFile { token: Some(token.to_owned()) })
      .context("serialising session")?;
    fs::write(&self.path, raw)
      .with_context(|| format!("writing session {}", self.path.display()))?;
    restrict_to_owner(&self.path)
  }

  /// Forget the token. Clearing an absent session is not an error.
  pub fn clear(&self) -> Result<()> {
    match fs::remove_file(&self.path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e).with_context(|| format!("removing session {}", self.path.display())),
    }
  }
}

/// The token is a credential: only the owning user may read the file.
#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;
  fs::set_permissions(path, fs::Permissions::from_mode(0o600))
    .with_context(|| format!("restricting permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> Result<()> { Ok(()) }

#[cfg(test)]
mod tests {
  use super::*;

  fn temp_session(name: &str) -> Session {
    let dir = std::env::temp_dir().join(format!(
      "wishlist-session-{}-{name}",
      std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    Session::new(dir.join("nested/session.toml"))
  }

  #[test]
  fn missing_file_has_no_token() {
    let session = temp_session("missing");
    assert_eq!(session.token().unwrap(), None);
  }

  #[test]
  fn save_then_read_then_clear() {
    let session = temp_session("roundtrip");
    session.save_token("abc123").unwrap();
    assert_eq!(session.token().unwrap().as_deref(), Some("abc123"));

    session.save_token("def456").unwrap();
    assert_eq!(session.token().unwrap().as_deref(), Some("def456"));

    session.clear().unwrap();
    assert_eq!(session.token().unwrap(), None);
    session.clear().unwrap();
  }

  #[test]
  fn empty_token_reads_as_none() {
    let session = temp_session("empty");
    session.save_token("").unwrap();
    assert_eq!(session.token().unwrap(), None);
  }

  #[test]
  fn garbage_file_is_an_error() {
    let session = temp_session("garbage");
    fs::create_dir_all(session.path().parent().unwrap()).unwrap();
    fs::write(session.path(), "token = [").unwrap();
    assert!(session.token().is_err());
  }

  #[cfg(unix)]
  #[test]
  fn saved_session_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let session = temp_session("mode");
    fs::create_dir_all(session.path().parent().unwrap()).unwrap();
    fs::write(session.path(), "").unwrap();
    fs::set_permissions(session.path(), fs::Permissions::from_mode(0o644)).unwrap();

    session.save_token("abc123").unwrap();
    let mode = fs::metadata(session.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
  }
}
