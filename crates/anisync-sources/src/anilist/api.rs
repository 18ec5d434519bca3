use anisync_models::{Anime, ConversionError, ListStatus, Manga, MediaKind, SourceId, TargetId, Titles};
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SourceError;

// AniList GraphQL endpoint
const API_URL: &str = "https://graphql.anilist.co";

const PER_CHUNK: u32 = 500;

const LIST_QUERY: &str = r#"
query ($userName: String, $type: MediaType, $chunk: Int, $perChunk: Int) {
  MediaListCollection(userName: $userName, type: $type, chunk: $chunk, perChunk: $perChunk) {
    hasNextChunk
    lists {
      name
      status
      isCustomList
      entries {
        id
        status
        score(format: POINT_10)
        progress
        progressVolumes
        startedAt { year month day }
        completedAt { year month day }
        media {
          id
          idMal
          episodes
          chapters
          volumes
          seasonYear
          title { romaji english native }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListVariables<'a> {
    user_name: &'a str,
    #[serde(rename = "type")]
    media_type: &'static str,
    chunk: u32,
    per_chunk: u32,
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    status: Option<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CollectionData {
    media_list_collection: Option<MediaListCollection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListCollection {
    #[serde(default)]
    pub has_next_chunk: bool,
    #[serde(default)]
    pub lists: Vec<MediaListGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListGroup {
    pub name: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub is_custom_list: bool,
    #[serde(default)]
    pub entries: Vec<MediaListEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListEntry {
    pub id: i64,
    pub status: Option<String>,
    pub score: Option<f64>,
    pub progress: Option<u32>,
    pub progress_volumes: Option<u32>,
    pub started_at: Option<FuzzyDate>,
    pub completed_at: Option<FuzzyDate>,
    pub media: Option<Media>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i64,
    pub id_mal: Option<i64>,
    pub episodes: Option<u32>,
    pub chapters: Option<u32>,
    pub volumes: Option<u32>,
    pub season_year: Option<u32>,
    pub title: Option<MediaTitle>,
}

#[derive(Debug, Deserialize)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FuzzyDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl FuzzyDate {
    /// Only complete dates are kept; partial or invalid ones become `None`
    pub fn to_date(&self) -> Option<NaiveDate> {
        match (self.year, self.month, self.day) {
            (Some(year), Some(month), Some(day)) => NaiveDate::from_ymd_opt(year, month, day),
            _ => None,
        }
    }
}

fn media_type(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Anime => "ANIME",
        MediaKind::Manga => "MANGA",
    }
}

/// Fetch every chunk of the user's list collection for one media kind
pub async fn get_list_collection(
    client: &Client,
    access_token: Option<&str>,
    username: &str,
    kind: MediaKind,
) -> Result<Vec<MediaListGroup>, SourceError> {
    let mut groups = Vec::new();
    let mut chunk = 1;

    loop {
        let request = GraphQlRequest {
            query: LIST_QUERY,
            variables: ListVariables {
                user_name: username,
                media_type: media_type(kind),
                chunk,
                per_chunk: PER_CHUNK,
            },
        };

        let mut builder = client
            .post(API_URL)
            .header("Accept", "application/json")
            .json(&request);
        if let Some(token) = access_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SourceError::Api {
                endpoint: "anilist MediaListCollection".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let collection = parse_collection_response(&body)?;
        debug!(chunk, lists = collection.lists.len(), "Fetched AniList list chunk");

        let has_next = collection.has_next_chunk;
        groups.extend(collection.lists);

        if !has_next {
            break;
        }
        chunk += 1;
    }

    Ok(groups)
}

fn parse_collection_response(body: &str) -> Result<MediaListCollection, SourceError> {
    let response: GraphQlResponse<CollectionData> = serde_json::from_str(body)?;

    if let Some(error) = response.errors.first() {
        return Err(SourceError::Api {
            endpoint: "anilist MediaListCollection".to_string(),
            status: error.status.unwrap_or(200),
            body: error.message.clone(),
        });
    }

    response
        .data
        .and_then(|d| d.media_list_collection)
        .ok_or_else(|| SourceError::NotFound("anilist list collection".to_string()))
}

fn titles_from_media(media: &Media) -> Result<Titles, ConversionError> {
    let title = media.title.as_ref().ok_or(ConversionError::MissingTitle)?;
    Ok(Titles::new(
        title.english.clone().unwrap_or_default(),
        title.native.clone().unwrap_or_default(),
        title.romaji.clone().unwrap_or_default(),
    ))
}

pub fn anime_from_entry(entry: &MediaListEntry) -> Result<Anime, ConversionError> {
    let media = entry.media.as_ref().ok_or(ConversionError::MissingMedia)?;
    let status = entry.status.as_deref().ok_or(ConversionError::MissingStatus)?;
    let titles = titles_from_media(media)?;

    Ok(Anime {
        anilist_id: SourceId(media.id),
        mal_id: TargetId(media.id_mal.unwrap_or(0)),
        titles,
        status: ListStatus::from_anilist(status),
        score: entry.score.unwrap_or(0.0),
        progress: entry.progress.unwrap_or(0),
        num_episodes: media.episodes.unwrap_or(0),
        season_year: media.season_year,
        started_at: entry.started_at.as_ref().and_then(FuzzyDate::to_date),
        finished_at: entry.completed_at.as_ref().and_then(FuzzyDate::to_date),
    })
}

pub fn manga_from_entry(entry: &MediaListEntry) -> Result<Manga, ConversionError> {
    let media = entry.media.as_ref().ok_or(ConversionError::MissingMedia)?;
    let status = entry.status.as_deref().ok_or(ConversionError::MissingStatus)?;
    let titles = titles_from_media(media)?;

    Ok(Manga {
        anilist_id: SourceId(media.id),
        mal_id: TargetId(media.id_mal.unwrap_or(0)),
        titles,
        status: ListStatus::from_anilist(status),
        score: entry.score.unwrap_or(0.0),
        progress: entry.progress.unwrap_or(0),
        progress_volumes: entry.progress_volumes.unwrap_or(0),
        chapters: media.chapters.unwrap_or(0),
        volumes: media.volumes.unwrap_or(0),
        started_at: entry.started_at.as_ref().and_then(FuzzyDate::to_date),
        finished_at: entry.completed_at.as_ref().and_then(FuzzyDate::to_date),
    })
}

/// Flatten status groups into records, dropping entries that fail conversion.
///
/// Custom lists repeat entries already present in their status list and are skipped.
pub fn records_from_groups<R, F>(groups: &[MediaListGroup], convert: F) -> Vec<R>
where
    F: Fn(&MediaListEntry) -> Result<R, ConversionError>,
{
    let mut records = Vec::new();
    for group in groups.iter().filter(|g| !g.is_custom_list) {
        for entry in &group.entries {
            match convert(entry) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(entry_id = entry.id, error = %e, "Dropping AniList entry that failed conversion");
                }
            }
        }
    }
    records
}
