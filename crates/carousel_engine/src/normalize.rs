use std::sync::Arc;

use carousel_core::{DisplayItem, ItemId};
use chrono::{DateTime, NaiveDateTime, Utc};
use engine_logging::{engine_debug, engine_info, engine_warn};
use url::Url;

use crate::classify;
use crate::image::{self, SiteBase};
use crate::record::{ListItem, RawRecord};
use crate::text;

pub const ARTICLE_CONTENT_TYPE_PREFIX: &str = "0x0101009D1CB255DA76424F860D91F20E6C4118";
pub const DEFAULT_MAX_DESCRIPTION_LEN: usize = 200;
pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const DEFAULT_CATEGORY: &str = "Page";

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerSettings {
    pub site: SiteBase,
    /// Library folder that holds the pages, relative to the site.
    pub site_pages_segment: String,
    pub article_content_type_prefix: String,
    /// Lowercase tokens; a content type name containing one counts as news.
    pub news_tokens: Vec<String>,
    pub home_titles: Vec<String>,
    pub home_filenames: Vec<String>,
    pub home_filename_prefixes: Vec<String>,
    /// Deployment-specific substrings excluding an item by title or filename.
    pub denylist: Vec<String>,
    pub max_description_len: usize,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            site: SiteBase::new(""),
            site_pages_segment: "SitePages".to_string(),
            article_content_type_prefix: ARTICLE_CONTENT_TYPE_PREFIX.to_string(),
            news_tokens: strings(&[
                "article",
                "news",
                "artikel",
                "artikelseite",
                "nachricht",
                "neuigkeit",
            ]),
            home_titles: strings(&["home", "startseite", "homepage"]),
            home_filenames: strings(&["home.aspx", "startseite.aspx", "homepage.aspx"]),
            home_filename_prefixes: strings(&["home.", "startseite."]),
            denylist: Vec::new(),
            max_description_len: DEFAULT_MAX_DESCRIPTION_LEN,
        }
    }
}

impl NormalizerSettings {
    pub fn for_site(site_url: &str) -> Self {
        Self {
            site: SiteBase::new(site_url),
            ..Self::default()
        }
    }

    pub fn with_denylist(mut self, denylist: Vec<String>) -> Self {
        self.denylist = denylist;
        self
    }
}

/// Turns raw list records into display items.
///
/// Pure and synchronous. Every failure inside a record degrades to that
/// field's next fallback; records without an id are dropped.
#[derive(Clone)]
pub struct NewsNormalizer {
    settings: NormalizerSettings,
    clock: Clock,
}

impl std::fmt::Debug for NewsNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsNormalizer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl NewsNormalizer {
    pub fn new(settings: NormalizerSettings) -> Self {
        Self::with_clock(settings, Arc::new(Utc::now))
    }

    pub fn with_clock(settings: NormalizerSettings, clock: Clock) -> Self {
        Self { settings, clock }
    }

    pub fn settings(&self) -> &NormalizerSettings {
        &self.settings
    }

    pub fn normalize(&self, records: Vec<RawRecord>) -> Vec<DisplayItem> {
        let items: Vec<(ItemId, ListItem)> = records
            .into_iter()
            .map(RawRecord::into_list_item)
            .filter_map(|item| item.id.map(|id| (id, item)))
            .collect();
        let total = items.len();

        let candidates: Vec<(ItemId, ListItem)> = items
            .into_iter()
            .filter(|(id, item)| {
                let excluded = classify::is_always_excluded(item, &self.settings);
                if excluded {
                    engine_debug!("Excluding home or access-request item {}", id);
                }
                !excluded
            })
            .collect();

        let classified = candidates
            .iter()
            .filter(|(_, item)| classify::is_news(item, &self.settings))
            .count();

        let selected: Vec<(ItemId, ListItem)> = if classified > 0 {
            candidates
                .into_iter()
                .filter(|(_, item)| classify::is_news(item, &self.settings))
                .collect()
        } else if total > 0 {
            // Content-type metadata is unreliable across deployments; degrade
            // to every non-home page that can at least be named.
            engine_warn!(
                "No item matched the news classification; using all {} pages",
                candidates.len()
            );
            candidates
                .into_iter()
                .filter(|(id, item)| {
                    let nameable = !item.title_text().is_empty()
                        || !item.file_leaf().is_empty()
                        || item.file_ref.as_deref().is_some_and(|r| !r.trim().is_empty());
                    if !nameable {
                        engine_debug!("Skipping item {} without title or file reference", id);
                    }
                    nameable
                })
                .collect()
        } else {
            Vec::new()
        };

        let display: Vec<DisplayItem> = selected
            .into_iter()
            .filter_map(|(id, item)| {
                let title = self.resolve_title(id, &item);
                if classify::is_denied(&title, item.file_leaf(), &self.settings.denylist) {
                    engine_debug!("Excluding denylisted item {}: {}", id, title);
                    return None;
                }
                Some(self.to_display_item(id, title, &item))
            })
            .collect();

        engine_info!(
            "Normalized {} of {} records into news items",
            display.len(),
            total
        );
        display
    }

    fn to_display_item(&self, id: ItemId, title: String, item: &ListItem) -> DisplayItem {
        DisplayItem {
            id,
            title,
            description: self.resolve_description(item),
            image_url: self.resolve_image_url(item),
            page_url: self.resolve_page_url(id, item),
            published_date: self.resolve_published(item),
            author: resolve_author(item),
            category: non_empty(item.content_type_name())
                .unwrap_or(DEFAULT_CATEGORY)
                .to_string(),
        }
    }

    fn resolve_title(&self, id: ItemId, item: &ListItem) -> String {
        non_empty(item.title_text())
            .or_else(|| non_empty(item.file_leaf()))
            .map(str::to_string)
            .or_else(|| item.file_ref.as_deref().and_then(last_path_segment))
            .unwrap_or_else(|| format!("Item {id}"))
    }

    fn resolve_description(&self, item: &ListItem) -> String {
        let mut plain = item
            .description
            .as_deref()
            .map(text::html_to_text)
            .unwrap_or_default();
        if plain.is_empty() {
            if let Some(canvas) = item.canvas_content1.as_deref() {
                plain = text::html_to_text(canvas);
            }
        }
        text::truncate_with_ellipsis(&plain, self.settings.max_description_len)
    }

    fn resolve_image_url(&self, item: &ListItem) -> String {
        let site = &self.settings.site;
        if let Some(url) = image::resolve_banner(item.banner_image_url.as_ref(), site) {
            return url;
        }
        if let Some(url) = item
            .canvas_content1
            .as_deref()
            .and_then(|html| image::image_from_content(html, site))
        {
            return url;
        }
        match non_empty(item.file_leaf()) {
            Some(file_name) => site.page_preview_url(&self.settings.site_pages_segment, file_name),
            None => site.default_thumbnail_url(),
        }
    }

    fn resolve_page_url(&self, id: ItemId, item: &ListItem) -> String {
        let file_name = non_empty(item.file_leaf())
            .map(str::to_string)
            .or_else(|| item.file_ref.as_deref().and_then(last_path_segment))
            .unwrap_or_else(|| format!("item-{id}.aspx"));
        format!(
            "{}/{}/{}",
            self.settings.site.site_url, self.settings.site_pages_segment, file_name
        )
    }

    fn resolve_published(&self, item: &ListItem) -> DateTime<Utc> {
        item.modified
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(|| (self.clock)())
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Last path segment of a server-relative or absolute file reference.
fn last_path_segment(reference: &str) -> Option<String> {
    let trimmed = reference.trim();
    let path = match Url::parse(trimmed) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => trimmed.to_string(),
    };
    path.rsplit('/')
        .next()
        .and_then(non_empty)
        .map(str::to_string)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn resolve_author(item: &ListItem) -> String {
    [&item.created_by, &item.author]
        .into_iter()
        .flatten()
        .filter_map(|person| person.title.as_deref())
        .find_map(non_empty)
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string()
}
