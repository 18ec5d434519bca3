pub mod anime;
pub mod error;
pub mod ids;
pub mod manga;
pub mod record;
pub mod status;
pub mod titles;
pub mod update;

pub use anime::Anime;
pub use error::{ConversionError, StatusMappingError};
pub use ids::{SourceId, TargetId};
pub use manga::Manga;
pub use record::{MediaKind, Record};
pub use status::ListStatus;
pub use titles::Titles;
pub use update::{DateField, ListUpdate};
