use anisync_config::{
    Config, CredentialStore, SiteConfig, ANILIST_AUTH_URL, ANILIST_TOKEN_URL, MYANIMELIST_AUTH_URL,
    MYANIMELIST_TOKEN_URL,
};
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration as StdDuration;

use crate::error::SourceError;

pub const ANILIST: &str = "anilist";
pub const MYANIMELIST: &str = "myanimelist";

const USER_AGENT: &str = concat!("anisync/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(600);
const VERIFIER_LENGTH: usize = 64;

/// Shared HTTP client for both catalogs
pub fn create_http_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenInfo {
    /// True when the token is gone or expires within `margin`
    pub fn expires_within(&self, margin: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= Utc::now() + margin,
            None => false,
        }
    }
}

impl From<TokenResponse> for TokenInfo {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: response.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }
}

/// URL the user visits to grant access, and the PKCE verifier to send back
/// with the resulting code
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub code_verifier: Option<String>,
}

/// OAuth authorization-code settings for one catalog
#[derive(Debug, Clone)]
pub struct OAuthSite {
    pub name: &'static str,
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    /// MyAnimeList requires PKCE with the `plain` challenge method
    pub pkce: bool,
}

impl OAuthSite {
    fn from_site(name: &'static str, site: &SiteConfig, redirect_uri: &str, auth: &str, token: &str, pkce: bool) -> Self {
        Self {
            name,
            client_id: site.client_id.clone(),
            client_secret: site.client_secret.clone(),
            auth_url: site.auth_url_or(auth).to_string(),
            token_url: site.token_url_or(token).to_string(),
            redirect_uri: redirect_uri.to_string(),
            pkce,
        }
    }

    pub fn anilist(config: &Config) -> Self {
        Self::from_site(
            ANILIST,
            &config.anilist,
            &config.oauth.redirect_uri,
            ANILIST_AUTH_URL,
            ANILIST_TOKEN_URL,
            false,
        )
    }

    pub fn myanimelist(config: &Config) -> Self {
        Self::from_site(
            MYANIMELIST,
            &config.myanimelist,
            &config.oauth.redirect_uri,
            MYANIMELIST_AUTH_URL,
            MYANIMELIST_TOKEN_URL,
            true,
        )
    }

    pub fn authorization_request(&self) -> AuthorizationRequest {
        let mut url = format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&state=state",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri)
        );

        let code_verifier = if self.pkce {
            let verifier = generate_code_verifier();
            // With the plain method the challenge is the verifier itself
            url.push_str(&format!(
                "&code_challenge={}&code_challenge_method=plain",
                urlencoding::encode(&verifier)
            ));
            Some(verifier)
        } else {
            None
        };

        AuthorizationRequest { url, code_verifier }
    }

    pub async fn exchange_code(
        &self,
        client: &Client,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenInfo, SourceError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(SourceError::Auth("authorization code cannot be empty".to_string()));
        }

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code", code),
        ];
        if let Some(verifier) = code_verifier {
            form.push(("code_verifier", verifier));
        }

        self.request_token(client, &form).await
    }

    pub async fn refresh(&self, client: &Client, refresh_token: &str) -> Result<TokenInfo, SourceError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];
        let mut token = self.request_token(client, &form).await?;
        // Some servers omit the refresh token when it is unchanged
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }
        Ok(token)
    }

    async fn request_token(&self, client: &Client, form: &[(&str, &str)]) -> Result<TokenInfo, SourceError> {
        let response = client
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::Auth(format!(
                "{} token request failed: {} - {}",
                self.name, status, error_text
            )));
        }

        let token_response: TokenResponse = response.json().await?;
        Ok(token_response.into())
    }

    pub fn load_token(&self, store: &CredentialStore) -> Option<TokenInfo> {
        let access_token = store.get_access_token(self.name)?.clone();
        Some(TokenInfo {
            access_token,
            refresh_token: store.get_refresh_token(self.name).cloned(),
            expires_at: store.get_token_expires(self.name),
        })
    }

    /// Replace this site's stored token. Does not persist the store.
    pub fn store_token(&self, store: &mut CredentialStore, token: &TokenInfo) {
        store.clear_site(self.name);
        store.set_access_token(self.name, token.access_token.clone());
        if let Some(refresh_token) = &token.refresh_token {
            store.set_refresh_token(self.name, refresh_token.clone());
        }
        if let Some(expires_at) = token.expires_at {
            store.set_token_expires(self.name, expires_at);
        }
    }
}

fn generate_code_verifier() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(VERIFIER_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config() -> Config {
        toml::from_str(
            r#"
            [anilist]
            client_id = "111"
            username = "someone"

            [myanimelist]
            client_id = "abc def"
            client_secret = "secret"
            username = "someone"
            token_url = "http://localhost:9999/token"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_anilist_authorization_url_has_no_pkce() {
        let site = OAuthSite::anilist(&config());
        let request = site.authorization_request();

        assert!(request.url.starts_with(ANILIST_AUTH_URL));
        assert!(request.url.contains("client_id=111"));
        assert!(request.url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A18080%2Fcallback"));
        assert!(!request.url.contains("code_challenge"));
        assert!(request.code_verifier.is_none());
    }

    #[test]
    fn test_myanimelist_authorization_url_uses_plain_pkce() {
        let site = OAuthSite::myanimelist(&config());
        assert_eq!(site.token_url, "http://localhost:9999/token");
        assert_eq!(site.auth_url, MYANIMELIST_AUTH_URL);

        let request = site.authorization_request();
        let verifier = request.code_verifier.unwrap();

        assert_eq!(verifier.len(), VERIFIER_LENGTH);
        assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(request.url.contains("client_id=abc%20def"));
        assert!(request.url.contains(&format!("code_challenge={}", verifier)));
        assert!(request.url.contains("code_challenge_method=plain"));
    }

    #[test]
    fn test_verifiers_differ_between_requests() {
        let site = OAuthSite::myanimelist(&config());
        let first = site.authorization_request().code_verifier;
        let second = site.authorization_request().code_verifier;
        assert_ne!(first, second);
    }

    #[test]
    fn test_store_and_load_token() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = CredentialStore::new(temp_dir.path().join("credentials.toml"));
        let site = OAuthSite::myanimelist(&config());

        assert!(site.load_token(&store).is_none());

        let expires_at = Utc::now() + Duration::hours(1);
        site.store_token(
            &mut store,
            &TokenInfo {
                access_token: "access".to_string(),
                refresh_token: Some("refresh".to_string()),
                expires_at: Some(expires_at),
            },
        );

        let loaded = site.load_token(&store).unwrap();
        assert_eq!(loaded.access_token, "access");
        assert_eq!(loaded.refresh_token.as_deref(), Some("refresh"));
        assert!(!loaded.expires_within(Duration::minutes(5)));

        // Other sites are untouched
        assert!(OAuthSite::anilist(&config()).load_token(&store).is_none());
    }

    #[test]
    fn test_token_expiry_window() {
        let token = TokenInfo {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_at: Some(Utc::now() + Duration::minutes(2)),
        };
        assert!(token.expires_within(Duration::minutes(5)));

        let no_expiry = TokenInfo { expires_at: None, ..token };
        assert!(!no_expiry.expires_within(Duration::minutes(5)));
    }

    #[test]
    fn test_token_response_without_expiry() {
        let response: TokenResponse = serde_json::from_str(r#"{ "access_token": "abc", "token_type": "Bearer" }"#).unwrap();
        let token: TokenInfo = response.into();
        assert_eq!(token.access_token, "abc");
        assert!(token.refresh_token.is_none());
        assert!(token.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_empty_code_is_rejected_before_request() {
        let site = OAuthSite::anilist(&config());
        let result = site.exchange_code(&create_http_client(), "  ", None).await;
        assert!(matches!(result, Err(SourceError::Auth(_))));
    }
}
