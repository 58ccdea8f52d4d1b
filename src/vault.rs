//! Note persistence under a root directory ("vault").
//!
//! Notes are written with create-new semantics: an existing file is never
//! overwritten. Callers hand over fully assembled text, so a failed import
//! leaves no partial file behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
  #[error("File already exists: {0}")]
  AlreadyExists(String),
  #[error("{0}")]
  Io(#[from] std::io::Error),
}

#[derive(Clone, Debug)]
pub struct Vault {
  root: PathBuf,
}

impl Vault {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Write `content` to `<root>/<folder>/<filename>`, creating folders as needed.
  #[instrument(level = "info", skip(self, content), fields(root = %self.root.display(), bytes = content.len()))]
  pub async fn write_note(&self, folder: &str, filename: &str, content: &str) -> Result<PathBuf, VaultError> {
    let dir = self.root.join(folder);
    tokio::fs::create_dir_all(&dir).await?;
    debug!(dir = %dir.display(), "Note folder ready");

    let path = dir.join(filename);
    let mut file = match tokio::fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
      Ok(f) => f,
      Err(e) if e.kind() == ErrorKind::AlreadyExists => {
        return Err(VaultError::AlreadyExists(filename.to_string()));
      }
      Err(e) => return Err(e.into()),
    };
    fill_or_remove(&path, &mut file, content).await?;

    info!(path = %path.display(), "Note created");
    Ok(path)
  }
}

/// Write `content` through `out`. If writing fails, the freshly created file at `path` is removed.
async fn fill_or_remove<W>(path: &Path, out: &mut W, content: &str) -> Result<(), VaultError>
where
  W: AsyncWrite + Unpin,
{
  let written = match out.write_all(content.as_bytes()).await {
    Ok(()) => out.flush().await,
    Err(e) => Err(e),
  };
  if let Err(e) = written {
    match tokio::fs::remove_file(path).await {
      Ok(()) => warn!(path = %path.display(), error = %e, "Write failed; partial note removed"),
      Err(rm) => warn!(path = %path.display(), error = %e, remove_error = %rm, "Write failed; partial note left behind"),
    }
    return Err(e.into());
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::pin::Pin;
  use std::task::{Context, Poll};

  /// Accepts nothing; every write reports a full disk.
  struct FullDisk;

  impl AsyncWrite for FullDisk {
    fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, _: &[u8]) -> Poll<std::io::Result<usize>> {
      Poll::Ready(Err(std::io::Error::other("no space left on device")))
    }
    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<std::io::Result<()>> {
      Poll::Ready(Ok(()))
    }
    fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<std::io::Result<()>> {
      Poll::Ready(Ok(()))
    }
  }

  #[tokio::test]
  async fn failed_write_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("1. Two Sum.md");
    std::fs::write(&path, "").unwrap();

    let err = fill_or_remove(&path, &mut FullDisk, "# 1. Two Sum\n").await.unwrap_err();
    assert!(matches!(err, VaultError::Io(_)));
    assert!(!path.exists());

    // The same note can be written afterwards.
    let vault = Vault::new(dir.path());
    vault.write_note("", "1. Two Sum.md", "# 1. Two Sum\n").await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# 1. Two Sum\n");
  }

  #[tokio::test]
  async fn creates_nested_folders_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let vault = Vault::new(dir.path());
    let path = vault.write_note("Practice/LeetCode", "1. Two Sum.md", "# 1. Two Sum\n").await.unwrap();
    assert_eq!(path, dir.path().join("Practice/LeetCode/1. Two Sum.md"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# 1. Two Sum\n");
  }

  #[tokio::test]
  async fn never_overwrites_existing_note() {
    let dir = tempfile::tempdir().unwrap();
    let vault = Vault::new(dir.path());
    vault.write_note("LeetCode", "1. Two Sum.md", "original").await.unwrap();

    let err = vault.write_note("LeetCode", "1. Two Sum.md", "replacement").await.unwrap_err();
    assert!(matches!(err, VaultError::AlreadyExists(ref name) if name == "1. Two Sum.md"));
    assert_eq!(err.to_string(), "File already exists: 1. Two Sum.md");

    let kept = std::fs::read_to_string(dir.path().join("LeetCode/1. Two Sum.md")).unwrap();
    assert_eq!(kept, "original");
  }
}
