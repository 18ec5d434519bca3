//! Client construction from configuration and stored credentials.
//!
//! Both catalogs need an authorized token. The MyAnimeList token is refreshed
//! here when it is close to expiry, and the refreshed token is written back.

use anisync_config::{Config, CredentialStore};
use chrono::Duration;
use tracing::{info, warn};

use crate::anilist::AniListClient;
use crate::error::SourceError;
use crate::myanimelist::MyAnimeListClient;
use crate::oauth::{create_http_client, OAuthSite};

const REFRESH_MARGIN_MINUTES: i64 = 5;

pub fn anilist_client(config: &Config, store: &CredentialStore) -> Result<AniListClient, SourceError> {
    let site = OAuthSite::anilist(config);
    let token = site
        .load_token(store)
        .ok_or_else(|| SourceError::NotAuthenticated(site.name.to_string()))?;

    if token.expires_within(Duration::zero()) {
        return Err(SourceError::NotAuthenticated(site.name.to_string()));
    }

    Ok(AniListClient::new(config.anilist.username.clone()).with_access_token(token.access_token))
}

/// Build the MyAnimeList client, refreshing the token when it expires within
/// five minutes. The store is saved after a successful refresh.
pub async fn myanimelist_client(
    config: &Config,
    store: &mut CredentialStore,
) -> Result<MyAnimeListClient, SourceError> {
    let site = OAuthSite::myanimelist(config);
    let mut token = site
        .load_token(store)
        .ok_or_else(|| SourceError::NotAuthenticated(site.name.to_string()))?;

    if token.expires_within(Duration::minutes(REFRESH_MARGIN_MINUTES)) {
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or_else(|| SourceError::NotAuthenticated(site.name.to_string()))?;

        info!("MyAnimeList access token expired or expiring soon, refreshing");
        token = site.refresh(&create_http_client(), &refresh_token).await?;
        site.store_token(store, &token);
        if let Err(e) = store.save() {
            warn!("Failed to save refreshed MyAnimeList token: {}", e);
        }
    }

    Ok(MyAnimeListClient::new(config.myanimelist.username.clone(), token.access_token))
}
