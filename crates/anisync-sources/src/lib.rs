pub mod anilist;
pub mod error;
pub mod factory;
pub mod myanimelist;
pub mod oauth;
pub mod traits;

pub use anilist::AniListClient;
pub use error::SourceError;
pub use factory::{anilist_client, myanimelist_client};
pub use myanimelist::MyAnimeListClient;
pub use oauth::{create_http_client, AuthorizationRequest, OAuthSite, TokenInfo, ANILIST, MYANIMELIST};
pub use traits::{SourceCatalog, TargetCatalog};
