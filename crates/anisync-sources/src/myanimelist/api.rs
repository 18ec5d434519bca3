use anisync_models::{
    Anime, ConversionError, ListStatus, ListUpdate, Manga, MediaKind, SourceId, TargetId, Titles,
};
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SourceError;

// MyAnimeList API v2 base URL
const API_BASE: &str = "https://api.myanimelist.net/v2";

const PAGE_LIMIT: usize = 100;

const ANIME_FIELDS: &str = "alternative_titles,num_episodes,start_season,my_list_status";
const MANGA_FIELDS: &str = "alternative_titles,num_chapters,num_volumes,my_list_status";

#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub paging: Paging,
}

#[derive(Debug, Default, Deserialize)]
pub struct Paging {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NodeEntry {
    pub node: MalNode,
    /// Present on user list pages; detail and search responses carry
    /// `my_list_status` on the node instead
    pub list_status: Option<MalListStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MalNode {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub alternative_titles: Option<AlternativeTitles>,
    pub num_episodes: Option<u32>,
    pub num_chapters: Option<u32>,
    pub num_volumes: Option<u32>,
    pub start_season: Option<StartSeason>,
    pub my_list_status: Option<MalListStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlternativeTitles {
    pub en: Option<String>,
    pub ja: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StartSeason {
    pub year: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MalListStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub num_episodes_watched: u32,
    #[serde(default)]
    pub num_chapters_read: u32,
    #[serde(default)]
    pub num_volumes_read: u32,
    pub start_date: Option<String>,
    pub finish_date: Option<String>,
}

fn kind_path(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Anime => "anime",
        MediaKind::Manga => "manga",
    }
}

fn fields(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Anime => ANIME_FIELDS,
        MediaKind::Manga => MANGA_FIELDS,
    }
}

async fn get_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    access_token: &str,
    url: &str,
    endpoint: &str,
) -> Result<T, SourceError> {
    let response = client.get(url).bearer_auth(access_token).send().await?;
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound(endpoint.to_string()));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Api {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Fetch the user's whole list, following `paging.next` until exhausted
pub async fn get_user_list(
    client: &Client,
    access_token: &str,
    username: &str,
    kind: MediaKind,
) -> Result<Vec<NodeEntry>, SourceError> {
    let mut entries = Vec::new();
    let mut offset = 0;

    loop {
        let url = format!(
            "{}/users/{}/{}list?fields={},list_status&limit={}&offset={}&nsfw=true",
            API_BASE,
            urlencoding::encode(username),
            kind_path(kind),
            fields(kind),
            PAGE_LIMIT,
            offset
        );
        let page: Page<NodeEntry> = get_json(client, access_token, &url, "myanimelist user list").await?;
        debug!(offset, count = page.data.len(), "Fetched MyAnimeList list page");

        let fetched = page.data.len();
        entries.extend(page.data);

        if page.paging.next.is_none() || fetched == 0 {
            break;
        }
        offset += fetched;
    }

    Ok(entries)
}

pub async fn get_details(
    client: &Client,
    access_token: &str,
    kind: MediaKind,
    id: TargetId,
) -> Result<MalNode, SourceError> {
    if !id.is_known() {
        return Err(SourceError::InvalidId(id));
    }
    let url = format!("{}/{}/{}?fields={}", API_BASE, kind_path(kind), id, fields(kind));
    get_json(client, access_token, &url, &format!("myanimelist {} {}", kind, id)).await
}

pub async fn search(
    client: &Client,
    access_token: &str,
    kind: MediaKind,
    query: &str,
    limit: usize,
) -> Result<Vec<MalNode>, SourceError> {
    let url = format!(
        "{}/{}?q={}&limit={}&fields={}&nsfw=true",
        API_BASE,
        kind_path(kind),
        urlencoding::encode(query),
        limit,
        fields(kind)
    );
    let page: Page<NodeEntry> = get_json(client, access_token, &url, "myanimelist search").await?;
    Ok(page.data.into_iter().map(|entry| entry.node).collect())
}

/// PATCH the user's list status for one title with the full field set
pub async fn update_list_status(
    client: &Client,
    access_token: &str,
    id: TargetId,
    update: &ListUpdate,
) -> Result<(), SourceError> {
    if !id.is_known() {
        return Err(SourceError::InvalidId(id));
    }
    let url = format!("{}/{}/{}/my_list_status", API_BASE, kind_path(update.kind), id);
    let response = client
        .patch(&url)
        .bearer_auth(access_token)
        .form(&update_form(update))
        .send()
        .await?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound(format!("myanimelist {} {}", update.kind, id)));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Api {
            endpoint: format!("myanimelist update {}", id),
            status: status.as_u16(),
            body,
        });
    }
    Ok(())
}

/// Form body for a list status update. Dates are always sent; an empty value
/// clears the stored date.
pub fn update_form(update: &ListUpdate) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("status", update.status.to_string()),
        ("score", (update.score.round() as i64).to_string()),
    ];

    match update.kind {
        MediaKind::Anime => {
            form.push(("num_watched_episodes", update.progress.to_string()));
        }
        MediaKind::Manga => {
            form.push(("num_chapters_read", update.progress.to_string()));
            form.push(("num_volumes_read", update.progress_secondary.unwrap_or(0).to_string()));
        }
    }

    form.push(("start_date", update.start_date.to_form_value()));
    form.push(("finish_date", update.finish_date.to_form_value()));
    form
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn titles_from_node(node: &MalNode) -> Titles {
    let alternative = node.alternative_titles.as_ref();
    let pick = |value: Option<&String>| match value {
        Some(s) if !s.is_empty() => s.clone(),
        _ => node.title.clone(),
    };

    Titles::new(
        pick(alternative.and_then(|a| a.en.as_ref())),
        pick(alternative.and_then(|a| a.ja.as_ref())),
        node.title.clone(),
    )
}

pub fn anime_from_node(node: &MalNode, list_status: Option<&MalListStatus>) -> Result<Anime, ConversionError> {
    if node.id == 0 {
        return Err(ConversionError::MissingId);
    }
    let default_status = MalListStatus::default();
    let list = list_status.or(node.my_list_status.as_ref()).unwrap_or(&default_status);

    Ok(Anime {
        anilist_id: SourceId::UNKNOWN,
        mal_id: TargetId(node.id),
        titles: titles_from_node(node),
        status: list
            .status
            .as_deref()
            .map(|s| ListStatus::from_myanimelist(s, MediaKind::Anime))
            .unwrap_or(ListStatus::Unknown),
        score: list.score,
        progress: list.num_episodes_watched,
        num_episodes: node.num_episodes.unwrap_or(0),
        season_year: node.start_season.as_ref().and_then(|s| s.year),
        started_at: parse_date(list.start_date.as_deref()),
        finished_at: parse_date(list.finish_date.as_deref()),
    })
}

pub fn manga_from_node(node: &MalNode, list_status: Option<&MalListStatus>) -> Result<Manga, ConversionError> {
    if node.id == 0 {
        return Err(ConversionError::MissingId);
    }
    let default_status = MalListStatus::default();
    let list = list_status.or(node.my_list_status.as_ref()).unwrap_or(&default_status);

    Ok(Manga {
        anilist_id: SourceId::UNKNOWN,
        mal_id: TargetId(node.id),
        titles: titles_from_node(node),
        status: list
            .status
            .as_deref()
            .map(|s| ListStatus::from_myanimelist(s, MediaKind::Manga))
            .unwrap_or(ListStatus::Unknown),
        score: list.score,
        progress: list.num_chapters_read,
        progress_volumes: list.num_volumes_read,
        chapters: node.num_chapters.unwrap_or(0),
        volumes: node.num_volumes.unwrap_or(0),
        started_at: parse_date(list.start_date.as_deref()),
        finished_at: parse_date(list.finish_date.as_deref()),
    })
}

/// Convert list entries, dropping and logging those that fail conversion
pub fn records_from_entries<R, F>(entries: &[NodeEntry], convert: F) -> Vec<R>
where
    F: Fn(&MalNode, Option<&MalListStatus>) -> Result<R, ConversionError>,
{
    entries
        .iter()
        .filter_map(|entry| match convert(&entry.node, entry.list_status.as_ref()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(title = %entry.node.title, error = %e, "Dropping MyAnimeList entry that failed conversion");
                None
            }
        })
        .collect()
}

/// Convert search candidates; a node that fails conversion is logged and
/// never offered to the matcher
pub fn records_from_nodes<R, F>(nodes: &[MalNode], convert: F) -> Vec<R>
where
    F: Fn(&MalNode, Option<&MalListStatus>) -> Result<R, ConversionError>,
{
    nodes
        .iter()
        .filter_map(|node| match convert(node, None) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(title = %node.title, id = node.id, error = %e, "Dropping MyAnimeList search result that failed conversion");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests;
