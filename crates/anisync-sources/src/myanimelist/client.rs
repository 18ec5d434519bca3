use crate::error::SourceError;
use crate::myanimelist::api;
use crate::oauth::create_http_client;
use crate::traits::TargetCatalog;
use anisync_models::{Anime, ListUpdate, Manga, MediaKind, TargetId};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

/// Read/write access to a user's MyAnimeList lists
#[derive(Clone)]
pub struct MyAnimeListClient {
    client: Arc<Client>,
    access_token: String,
    username: String,
}

impl MyAnimeListClient {
    pub fn new(username: String, access_token: String) -> Self {
        Self {
            client: Arc::new(create_http_client()),
            access_token,
            username,
        }
    }

    async fn user_list(&self, kind: MediaKind) -> Result<Vec<api::NodeEntry>, SourceError> {
        info!("Fetching {} list for {} from MyAnimeList", kind, self.username);
        api::get_user_list(&self.client, &self.access_token, &self.username, kind).await
    }

    async fn update(&self, id: TargetId, update: &ListUpdate) -> Result<(), SourceError> {
        api::update_list_status(&self.client, &self.access_token, id, update).await
    }
}

#[async_trait]
impl TargetCatalog<Anime> for MyAnimeListClient {
    fn catalog_name(&self) -> &str {
        "myanimelist"
    }

    async fn fetch_all(&self) -> Result<Vec<Anime>, SourceError> {
        let entries = self.user_list(MediaKind::Anime).await?;
        let records = api::records_from_entries(&entries, api::anime_from_node);
        info!("Fetched {} anime from MyAnimeList", records.len());
        Ok(records)
    }

    async fn get_by_id(&self, id: TargetId) -> Result<Anime, SourceError> {
        let node = api::get_details(&self.client, &self.access_token, MediaKind::Anime, id).await?;
        Ok(api::anime_from_node(&node, None)?)
    }

    async fn search_by_title(&self, title: &str, limit: usize) -> Result<Vec<Anime>, SourceError> {
        let nodes = api::search(&self.client, &self.access_token, MediaKind::Anime, title, limit).await?;
        Ok(api::records_from_nodes(&nodes, api::anime_from_node))
    }

    async fn apply_update(&self, id: TargetId, update: &ListUpdate) -> Result<(), SourceError> {
        self.update(id, update).await
    }
}

#[async_trait]
impl TargetCatalog<Manga> for MyAnimeListClient {
    fn catalog_name(&self) -> &str {
        "myanimelist"
    }

    async fn fetch_all(&self) -> Result<Vec<Manga>, SourceError> {
        let entries = self.user_list(MediaKind::Manga).await?;
        let records = api::records_from_entries(&entries, api::manga_from_node);
        info!("Fetched {} manga from MyAnimeList", records.len());
        Ok(records)
    }

    async fn get_by_id(&self, id: TargetId) -> Result<Manga, SourceError> {
        let node = api::get_details(&self.client, &self.access_token, MediaKind::Manga, id).await?;
        Ok(api::manga_from_node(&node, None)?)
    }

    async fn search_by_title(&self, title: &str, limit: usize) -> Result<Vec<Manga>, SourceError> {
        let nodes = api::search(&self.client, &self.access_token, MediaKind::Manga, title, limit).await?;
        Ok(api::records_from_nodes(&nodes, api::manga_from_node))
    }

    async fn apply_update(&self, id: TargetId, update: &ListUpdate) -> Result<(), SourceError> {
        self.update(id, update).await
    }
}
