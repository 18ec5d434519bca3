use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Persisted OAuth tokens, keyed per site ("anilist", "myanimelist")
pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    pub fn get_access_token(&self, site: &str) -> Option<&String> {
        self.get(&format!("{}_access_token", site))
    }

    pub fn set_access_token(&mut self, site: &str, token: String) {
        self.set(format!("{}_access_token", site), token);
    }

    pub fn get_refresh_token(&self, site: &str) -> Option<&String> {
        self.get(&format!("{}_refresh_token", site))
    }

    pub fn set_refresh_token(&mut self, site: &str, token: String) {
        self.set(format!("{}_refresh_token", site), token);
    }

    pub fn get_token_expires(&self, site: &str) -> Option<DateTime<Utc>> {
        self.get(&format!("{}_token_expires", site))
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn set_token_expires(&mut self, site: &str, expires: DateTime<Utc>) {
        self.set(format!("{}_token_expires", site), expires.to_rfc3339());
    }

    /// Drop every stored value for a site
    pub fn clear_site(&mut self, site: &str) {
        let prefix = format!("{}_", site);
        self.credentials.retain(|key, _| !key.starts_with(&prefix));
    }

    pub fn clear_all(&mut self) {
        self.credentials.clear();
    }

    pub fn get_all_keys(&self) -> Vec<String> {
        self.credentials.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_credential_store_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = CredentialStore::new(path.clone());
        store.set_access_token("anilist", "anilist_token".to_string());
        store.set_access_token("myanimelist", "mal_token".to_string());
        store.set_refresh_token("myanimelist", "mal_refresh".to_string());
        store.save().unwrap();

        let mut loaded_store = CredentialStore::new(path);
        loaded_store.load().unwrap();
        assert_eq!(loaded_store.get_access_token("anilist"), Some(&"anilist_token".to_string()));
        assert_eq!(loaded_store.get_access_token("myanimelist"), Some(&"mal_token".to_string()));
        assert_eq!(loaded_store.get_refresh_token("myanimelist"), Some(&"mal_refresh".to_string()));
        assert_eq!(loaded_store.get_refresh_token("anilist"), None);
    }

    #[test]
    fn test_credential_store_token_expires() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = CredentialStore::new(path.clone());
        let expires = Utc::now() + chrono::Duration::hours(1);
        store.set_token_expires("myanimelist", expires);
        store.save().unwrap();

        let mut loaded_store = CredentialStore::new(path);
        loaded_store.load().unwrap();
        let loaded_expires = loaded_store.get_token_expires("myanimelist").unwrap();
        // Allow 1 second difference for serialization
        assert!((loaded_expires - expires).num_seconds().abs() < 2);
    }

    #[test]
    fn test_clear_site_keeps_other_sites() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/anisync-credentials-test"));
        store.set_access_token("anilist", "a".to_string());
        store.set_access_token("myanimelist", "m".to_string());
        store.set_refresh_token("myanimelist", "r".to_string());

        store.clear_site("myanimelist");
        assert_eq!(store.get_access_token("anilist"), Some(&"a".to_string()));
        assert_eq!(store.get_access_token("myanimelist"), None);
        assert_eq!(store.get_refresh_token("myanimelist"), None);

        store.clear_all();
        assert!(store.get_all_keys().is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CredentialStore::new(dir.path().join("missing.toml"));
        store.load().unwrap();
        assert!(store.get_all_keys().is_empty());
    }
}
