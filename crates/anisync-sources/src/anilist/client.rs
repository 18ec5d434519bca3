use crate::anilist::api;
use crate::error::SourceError;
use crate::oauth::create_http_client;
use crate::traits::SourceCatalog;
use anisync_models::{Anime, Manga, MediaKind};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

/// Read-only access to a user's AniList lists
#[derive(Clone)]
pub struct AniListClient {
    client: Arc<Client>,
    access_token: Option<String>,
    username: String,
}

impl AniListClient {
    pub fn new(username: String) -> Self {
        Self {
            client: Arc::new(create_http_client()),
            access_token: None,
            username,
        }
    }

    pub fn with_access_token(mut self, token: String) -> Self {
        self.access_token = Some(token);
        self
    }

    async fn fetch_groups(&self, kind: MediaKind) -> Result<Vec<api::MediaListGroup>, SourceError> {
        info!("Fetching {} list for {} from AniList", kind, self.username);
        api::get_list_collection(&self.client, self.access_token.as_deref(), &self.username, kind).await
    }
}

#[async_trait]
impl SourceCatalog<Anime> for AniListClient {
    fn catalog_name(&self) -> &str {
        "anilist"
    }

    async fn fetch_all(&self) -> Result<Vec<Anime>, SourceError> {
        let groups = self.fetch_groups(MediaKind::Anime).await?;
        let records = api::records_from_groups(&groups, api::anime_from_entry);
        info!("Fetched {} anime from AniList", records.len());
        Ok(records)
    }
}

#[async_trait]
impl SourceCatalog<Manga> for AniListClient {
    fn catalog_name(&self) -> &str {
        "anilist"
    }

    async fn fetch_all(&self) -> Result<Vec<Manga>, SourceError> {
        let groups = self.fetch_groups(MediaKind::Manga).await?;
        let records = api::records_from_groups(&groups, api::manga_from_entry);
        info!("Fetched {} manga from AniList", records.len());
        Ok(records)
    }
}
