//! News engine: reads list records from a site and turns them into
//! display items for the carousel.
mod classify;
mod discovery;
mod engine;
mod fetch;
mod image;
mod normalize;
mod record;
mod text;
mod types;

pub use discovery::{
    candidate_identifiers, default_strategies, DiscoveryStrategy, ListIdentifier, ListInfo,
    ListQuery, FALLBACK_LIST_TITLES, PAGE_LIBRARY_TEMPLATES, SITE_PAGES_TEMPLATE,
};
pub use engine::EngineHandle;
pub use fetch::{FetchSettings, NewsSource, SharePointSource};
pub use image::{ensure_preview_resolution, image_from_content, resolve_banner, SiteBase};
pub use normalize::{
    Clock, NewsNormalizer, NormalizerSettings, ARTICLE_CONTENT_TYPE_PREFIX, DEFAULT_CATEGORY,
    DEFAULT_MAX_DESCRIPTION_LEN, UNKNOWN_AUTHOR,
};
pub use record::{ContentTypeId, ContentTypeRef, FileEntry, ListItem, PersonRef, RawRecord};
pub use text::{collapse_whitespace, html_to_text, truncate_with_ellipsis, ELLIPSIS};
pub use types::{EngineEvent, FailureKind, FetchError};
