pub mod auth;
pub mod clear;
pub mod config;
pub mod prompts;
pub mod sync;
pub mod sync_ui;

use anisync_config::{Config, CredentialStore, PathManager};
use color_eyre::Result;
use std::path::PathBuf;

/// Resolved file locations shared by every command
pub struct Context {
    pub paths: PathManager,
    pub config_file: PathBuf,
}

impl Context {
    /// `--config` wins; otherwise the container base path when running in
    /// Docker, else the platform config directory
    pub fn new(config_override: Option<PathBuf>) -> Self {
        if let Some(config_file) = config_override {
            let dir = config_file
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            return Self {
                paths: PathManager::with_config_dir(dir),
                config_file,
            };
        }

        let paths = PathManager::default();
        let config_file = paths.config_file();
        Self { paths, config_file }
    }

    pub fn load_config(&self) -> Result<Config> {
        if !self.config_file.exists() {
            return Err(color_eyre::eyre::eyre!(
                "Configuration file not found at {}. See config.example.toml for the expected layout.",
                self.config_file.display()
            ));
        }
        Config::load_from_file(&self.config_file).map_err(|e| {
            color_eyre::eyre::eyre!("Failed to load config from {}: {}", self.config_file.display(), e)
        })
    }

    pub fn credential_store(&self) -> Result<CredentialStore> {
        let path = self.paths.credentials_file();
        let mut store = CredentialStore::new(path.clone());
        store
            .load()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", path.display(), e))?;
        Ok(store)
    }
}
