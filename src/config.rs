//! Settings: where notes go, what they contain, and which API endpoint to ask.
//!
//! Loaded from a TOML file (`--config` / LEETNOTE_CONFIG_PATH); every key is optional.
//!
//! ```toml
//! folder_path = "LeetCode"
//! include_hints = true
//! default_status = "todo"
//! preferred_language = "python3"
//! vault_dir = "/home/me/notes"
//!
//! [api]
//! endpoint = "https://leetcode.com/graphql"
//! timeout_secs = 20
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::note::NoteOptions;

pub const DEFAULT_FOLDER: &str = "LeetCode";
pub const DEFAULT_STATUS: &str = "todo";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
  pub folder_path: String,
  pub include_hints: bool,
  pub default_status: String,
  pub preferred_language: String,
  pub vault_dir: PathBuf,
  pub api: ApiSettings,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      folder_path: DEFAULT_FOLDER.into(),
      include_hints: true,
      default_status: DEFAULT_STATUS.into(),
      preferred_language: "python3".into(),
      vault_dir: PathBuf::from("."),
      api: ApiSettings::default(),
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiSettings {
  pub endpoint: String,
  pub timeout_secs: u64,
}

impl Default for ApiSettings {
  fn default() -> Self {
    Self { endpoint: "https://leetcode.com/graphql".into(), timeout_secs: 20 }
  }
}

/// The user-editable subset, as sent by a settings form. Absent keys are left alone.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SettingsPatch {
  #[serde(default)] pub folder_path: Option<String>,
  #[serde(default)] pub include_hints: Option<bool>,
  #[serde(default)] pub default_status: Option<String>,
  #[serde(default)] pub preferred_language: Option<String>,
}

impl Settings {
  /// Blank folder/status fall back to their defaults. The folder is kept relative to
  /// `vault_dir`: `.`/`..` segments and empty segments are dropped.
  pub fn normalized(mut self) -> Self {
    let folder = self.folder_path
      .split(['/', '\\'])
      .map(str::trim)
      .filter(|seg| !matches!(*seg, "" | "." | ".."))
      .collect::<Vec<_>>()
      .join("/");
    self.folder_path = if folder.is_empty() { DEFAULT_FOLDER.into() } else { folder };
    let status = self.default_status.trim();
    self.default_status = if status.is_empty() { DEFAULT_STATUS.into() } else { status.to_string() };
    let lang = self.preferred_language.trim();
    self.preferred_language = if lang.is_empty() { "python3".into() } else { lang.to_string() };
    self
  }

  pub fn apply(&self, patch: SettingsPatch) -> Self {
    let mut next = self.clone();
    if let Some(v) = patch.folder_path { next.folder_path = v; }
    if let Some(v) = patch.include_hints { next.include_hints = v; }
    if let Some(v) = patch.default_status { next.default_status = v; }
    if let Some(v) = patch.preferred_language { next.preferred_language = v; }
    next.normalized()
  }

  pub fn note_options(&self) -> NoteOptions {
    NoteOptions {
      include_hints: self.include_hints,
      default_status: self.default_status.clone(),
      preferred_language: self.preferred_language.clone(),
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Read { path: PathBuf, source: std::io::Error },
  #[error("failed to parse {path}: {source}")]
  Parse { path: PathBuf, source: toml::de::Error },
  #[error("failed to encode settings: {0}")]
  Encode(#[from] toml::ser::Error),
  #[error("failed to write {path}: {source}")]
  Write { path: PathBuf, source: std::io::Error },
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
  let raw = std::fs::read_to_string(path)
    .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
  let settings = toml::from_str::<Settings>(&raw)
    .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
  Ok(settings.normalized())
}

/// Load settings from `path` if given. On any read/parse error, log and use defaults.
pub fn load_settings_or_default(path: Option<&Path>) -> Settings {
  let Some(path) = path else {
    info!(target: "leetnote", "No config path given; using default settings");
    return Settings::default();
  };
  if !path.exists() {
    info!(target: "leetnote", path = %path.display(), "Config file not found yet; using default settings");
    return Settings::default();
  }
  match load_settings(path) {
    Ok(s) => {
      info!(target: "leetnote", path = %path.display(), "Loaded settings (TOML)");
      s
    }
    Err(e) => {
      error!(target: "leetnote", error = %e, "Failed to load settings; using defaults");
      Settings::default()
    }
  }
}

pub async fn save_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
  let raw = toml::to_string_pretty(settings)?;
  if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
    tokio::fs::create_dir_all(dir)
      .await
      .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })?;
  }
  tokio::fs::write(path, raw)
    .await
    .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_keys_take_defaults() {
    let s: Settings = toml::from_str("include_hints = false\n[api]\ntimeout_secs = 5\n").unwrap();
    assert_eq!(s.folder_path, "LeetCode");
    assert!(!s.include_hints);
    assert_eq!(s.default_status, "todo");
    assert_eq!(s.api.endpoint, "https://leetcode.com/graphql");
    assert_eq!(s.api.timeout_secs, 5);
  }

  #[test]
  fn blank_values_normalize_to_defaults() {
    let s = Settings {
      folder_path: "  ".into(),
      default_status: "".into(),
      ..Settings::default()
    }
    .normalized();
    assert_eq!(s.folder_path, DEFAULT_FOLDER);
    assert_eq!(s.default_status, DEFAULT_STATUS);

    let s = Settings { folder_path: "/Practice/LC/".into(), ..Settings::default() }.normalized();
    assert_eq!(s.folder_path, "Practice/LC");
  }

  #[test]
  fn folder_cannot_escape_vault() {
    let s = Settings { folder_path: "../../etc/./notes".into(), ..Settings::default() }.normalized();
    assert_eq!(s.folder_path, "etc/notes");

    let s = Settings { folder_path: "..\\..".into(), ..Settings::default() }.normalized();
    assert_eq!(s.folder_path, DEFAULT_FOLDER);
  }

  #[test]
  fn patch_touches_only_given_keys() {
    let base = Settings { vault_dir: PathBuf::from("/notes"), ..Settings::default() };
    let next = base.apply(SettingsPatch {
      include_hints: Some(false),
      default_status: Some("".into()),
      ..SettingsPatch::default()
    });
    assert!(!next.include_hints);
    assert_eq!(next.default_status, "todo");
    assert_eq!(next.folder_path, "LeetCode");
    assert_eq!(next.vault_dir, PathBuf::from("/notes"));
  }

  #[test]
  fn note_options_mirror_settings() {
    let s = Settings { preferred_language: "golang".into(), ..Settings::default() };
    let o = s.note_options();
    assert_eq!(o.preferred_language, "golang");
    assert!(o.include_hints);
  }

  #[test]
  fn bad_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leetnote.toml");
    std::fs::write(&path, "include_hints = \"maybe\"").unwrap();
    assert!(matches!(load_settings(&path), Err(ConfigError::Parse { .. })));
    assert_eq!(load_settings_or_default(Some(&path)), Settings::default());
    assert_eq!(load_settings_or_default(Some(&dir.path().join("absent.toml"))), Settings::default());
  }

  #[tokio::test]
  async fn saved_settings_load_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg").join("leetnote.toml");
    let s = Settings { folder_path: "Algo".into(), include_hints: false, ..Settings::default() };
    save_settings(&path, &s).await.unwrap();
    assert_eq!(load_settings(&path).unwrap(), s);
  }
}
