use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ANILIST_AUTH_URL: &str = "https://anilist.co/api/v2/oauth/authorize";
pub const ANILIST_TOKEN_URL: &str = "https://anilist.co/api/v2/oauth/token";
pub const MYANIMELIST_AUTH_URL: &str = "https://myanimelist.net/v1/oauth2/authorize";
pub const MYANIMELIST_TOKEN_URL: &str = "https://myanimelist.net/v1/oauth2/token";

const PLACEHOLDER_CLIENT_ID: &str = "YOUR_CLIENT_ID";

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub oauth: OAuthConfig,
    pub anilist: SiteConfig,
    pub myanimelist: SiteConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Redirect URI registered with both applications. The authorization code
    /// is copied from this URL after consent.
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            redirect_uri: default_redirect_uri(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SiteConfig {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    pub username: String,
}

impl SiteConfig {
    pub fn auth_url_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.auth_url.as_deref().unwrap_or(default)
    }

    pub fn token_url_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.token_url.as_deref().unwrap_or(default)
    }

    fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && self.client_id != PLACEHOLDER_CLIENT_ID && !self.username.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SyncConfig {
    /// Display titles that are never synced (compared case-insensitively)
    #[serde(default)]
    pub ignore_titles: Vec<String>,
    /// Number of candidates requested when searching the target by title
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            ignore_titles: Vec::new(),
            search_limit: default_search_limit(),
        }
    }
}

fn default_redirect_uri() -> String {
    "http://localhost:18080/callback".to_string()
}

fn default_search_limit() -> usize {
    3
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Client secrets may be supplied through the environment instead of the file
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup("CLIENT_SECRET_ANILIST").filter(|s| !s.is_empty()) {
            self.anilist.client_secret = secret;
        }
        if let Some(secret) = lookup("CLIENT_SECRET_MYANIMELIST").filter(|s| !s.is_empty()) {
            self.myanimelist.client_secret = secret;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.anilist.is_configured() {
            return Err(anyhow::anyhow!("anilist client_id and username must be configured"));
        }
        if !self.myanimelist.is_configured() {
            return Err(anyhow::anyhow!("myanimelist client_id and username must be configured"));
        }
        if self.sync.search_limit == 0 {
            return Err(anyhow::anyhow!("sync.search_limit must be greater than zero"));
        }
        Ok(())
    }

    /// Ignore list normalized for lookups by lower-cased display title
    pub fn ignored_titles_lowercase(&self) -> std::collections::HashSet<String> {
        self.sync
            .ignore_titles
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}
