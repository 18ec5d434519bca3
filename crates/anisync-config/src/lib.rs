pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{
    Config, OAuthConfig, SiteConfig, SyncConfig, ANILIST_AUTH_URL, ANILIST_TOKEN_URL, MYANIMELIST_AUTH_URL,
    MYANIMELIST_TOKEN_URL,
};
pub use credentials::CredentialStore;
pub use paths::{container_base_path, PathManager};
