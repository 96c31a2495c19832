//! Rules deciding which list items count as news.

use crate::normalize::NormalizerSettings;
use crate::record::ListItem;

/// Content types of access-request lists, which share list shapes with page
/// libraries but never hold news.
pub(crate) const ACCESS_REQUEST_TOKENS: [&str; 2] = ["zugriffsanforderung", "access request"];

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|needle| !needle.is_empty() && haystack.contains(&needle.to_lowercase()))
}

pub(crate) fn is_home_page(item: &ListItem, settings: &NormalizerSettings) -> bool {
    let title = item.title_text().to_lowercase();
    let file_leaf = item.file_leaf().to_lowercase();

    settings
        .home_titles
        .iter()
        .any(|home| home.eq_ignore_ascii_case(&title))
        || settings
            .home_filenames
            .iter()
            .any(|home| home.eq_ignore_ascii_case(&file_leaf))
        || settings
            .home_filename_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && file_leaf.starts_with(&prefix.to_lowercase()))
}

pub(crate) fn is_access_request(content_type_name: &str) -> bool {
    let name = content_type_name.to_lowercase();
    ACCESS_REQUEST_TOKENS.iter().any(|token| name.contains(token))
}

/// Items that are dropped in every mode, including the degraded fallback.
pub(crate) fn is_always_excluded(item: &ListItem, settings: &NormalizerSettings) -> bool {
    is_home_page(item, settings) || is_access_request(item.content_type_name())
}

/// Classification by content type id prefix or by a localized name token.
pub(crate) fn is_news(item: &ListItem, settings: &NormalizerSettings) -> bool {
    let prefix = settings.article_content_type_prefix.as_str();
    if !prefix.is_empty()
        && item
            .content_type_id()
            .to_ascii_uppercase()
            .starts_with(&prefix.to_ascii_uppercase())
    {
        return true;
    }
    contains_any(&item.content_type_name().to_lowercase(), &settings.news_tokens)
}

pub(crate) fn is_denied(title: &str, file_leaf: &str, denylist: &[String]) -> bool {
    let title = title.trim().to_lowercase();
    let file_leaf = file_leaf.trim().to_lowercase();
    contains_any(&title, denylist) || contains_any(&file_leaf, denylist)
}

/// Heuristic for lists that answer like a page library but hold access
/// requests ("Zugriff für X von Y").
pub(crate) fn looks_like_access_requests(first: &ListItem) -> bool {
    let title = first.title_text().to_lowercase();
    is_access_request(first.content_type_name()) || (title.contains("für") && title.contains("von"))
}
