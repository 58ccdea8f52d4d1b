//! The import flow shared by the HTTP, WebSocket and CLI surfaces:
//! URL -> slug -> fetch -> convert + assemble -> write to the vault.
//!
//! Every failure becomes an `ImportError` whose `Display` is the short message
//! shown to the user. Nothing here panics or leaves a partial note behind.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::config::Settings;
use crate::leetcode::{FetchError, ProblemSource};
use crate::note::{assemble, note_filename};
use crate::slug::extract_slug;
use crate::vault::{Vault, VaultError};

#[derive(Clone, Debug, Serialize)]
pub struct ImportOutcome {
  pub title: String,
  pub filename: String,
  pub path: PathBuf,
}

impl ImportOutcome {
  pub fn message(&self) -> String {
    format!("Successfully imported: {}", self.title)
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
  #[error("Please enter a LeetCode URL")]
  EmptyUrl,
  #[error("Invalid LeetCode URL")]
  InvalidUrl,
  #[error("Failed to import problem: {0}")]
  Fetch(#[from] FetchError),
  #[error("File already exists: {0}")]
  AlreadyExists(String),
  #[error("Failed to create note: {0}")]
  Storage(String),
}

impl From<VaultError> for ImportError {
  fn from(e: VaultError) -> Self {
    match e {
      VaultError::AlreadyExists(name) => ImportError::AlreadyExists(name),
      VaultError::Io(io) => ImportError::Storage(io.to_string()),
    }
  }
}

/// Import one problem into `<vault_dir>/<folder_path>/`. `settings` is a snapshot
/// taken by the caller; `today` stamps `date_created`.
#[instrument(level = "info", skip(source, settings), fields(folder = %settings.folder_path))]
pub async fn import_problem(
  source: &dyn ProblemSource,
  settings: &Settings,
  url: &str,
  today: NaiveDate,
) -> Result<ImportOutcome, ImportError> {
  let url = url.trim();
  if url.is_empty() {
    return Err(ImportError::EmptyUrl);
  }
  let slug = extract_slug(url).ok_or_else(|| {
    warn!(target: "import", %url, "No problem slug in URL");
    ImportError::InvalidUrl
  })?;

  let record = source.fetch_problem(&slug).await.map_err(|e| {
    error!(target: "import", %slug, error = %e, "Fetch failed");
    ImportError::from(e)
  })?;
  info!(target: "import", %slug, id = %record.display_id, title = %record.title, "Problem fetched");

  let content = assemble(&record, url, today, &settings.note_options());
  let filename = note_filename(&record);

  let vault = Vault::new(&settings.vault_dir);
  let path = vault
    .write_note(&settings.folder_path, &filename, &content)
    .await
    .map_err(|e| {
      error!(target: "import", %filename, error = %e, "Writing note failed");
      ImportError::from(e)
    })?;

  info!(target: "import", %slug, path = %path.display(), "Import complete");
  Ok(ImportOutcome { title: record.title, filename, path })
}
