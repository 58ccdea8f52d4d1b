//! Application state shared by the HTTP, WebSocket and CLI entry points.
//!
//! This module owns:
//!   - the current settings (behind a RwLock, editable through the API)
//!   - the config file path settings are persisted to, if any
//!   - the problem source (LeetCode GraphQL client, or a stub in tests)
//!
//! Each import works on a settings snapshot taken when it starts.

use std::{path::PathBuf, sync::Arc};

use chrono::Local;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::config::{save_settings, ConfigError, Settings, SettingsPatch};
use crate::import::{import_problem, ImportError, ImportOutcome};
use crate::leetcode::{FetchError, LeetCodeClient, ProblemSource};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<RwLock<Settings>>,
    pub config_path: Option<PathBuf>,
    pub source: Arc<dyn ProblemSource>,
}

impl AppState {
    /// Build state around the real LeetCode client configured by `settings.api`.
    #[instrument(level = "info", skip_all)]
    pub fn new(settings: Settings, config_path: Option<PathBuf>) -> Result<Self, FetchError> {
        let client = LeetCodeClient::new(&settings.api)?;
        info!(
            target: "leetnote",
            endpoint = %client.endpoint,
            vault_dir = %settings.vault_dir.display(),
            folder = %settings.folder_path,
            "LeetCode client ready"
        );
        Ok(Self::with_source(settings, config_path, Arc::new(client)))
    }

    pub fn with_source(
        settings: Settings,
        config_path: Option<PathBuf>,
        source: Arc<dyn ProblemSource>,
    ) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            config_path,
            source,
        }
    }

    pub async fn settings_snapshot(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Apply a settings patch, persist it when a config file is configured, then publish it.
    #[instrument(level = "info", skip(self))]
    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<Settings, ConfigError> {
        let mut guard = self.settings.write().await;
        let next = guard.apply(patch);
        if let Some(path) = &self.config_path {
            save_settings(path, &next).await?;
            info!(target: "leetnote", path = %path.display(), "Settings saved");
        }
        *guard = next.clone();
        Ok(next)
    }

    /// Run one import with today's local date.
    pub async fn import(&self, url: &str) -> Result<ImportOutcome, ImportError> {
        let settings = self.settings_snapshot().await;
        let today = Local::now().date_naive();
        import_problem(self.source.as_ref(), &settings, url, today).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::two_sum;
    use crate::leetcode::stub::StubSource;

    #[tokio::test]
    async fn settings_update_is_persisted_and_published() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leetnote.toml");
        let state = AppState::with_source(
            Settings::default(),
            Some(path.clone()),
            Arc::new(StubSource::serving(two_sum())),
        );

        let next = state
            .update_settings(SettingsPatch {
                folder_path: Some("Interview".into()),
                ..SettingsPatch::default()
            })
            .await
            .unwrap();

        assert_eq!(next.folder_path, "Interview");
        assert_eq!(state.settings_snapshot().await.folder_path, "Interview");
        assert_eq!(crate::config::load_settings(&path).unwrap(), next);
    }

    #[tokio::test]
    async fn import_uses_current_settings() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            vault_dir: dir.path().to_path_buf(),
            folder_path: "Algo".into(),
            ..Settings::default()
        };
        let state = AppState::with_source(settings, None, Arc::new(StubSource::serving(two_sum())));
        let out = state.import("https://leetcode.com/problems/two-sum/").await.unwrap();
        assert_eq!(out.path, dir.path().join("Algo").join("1. Two Sum.md"));
    }
}
